//! Slice command handlers.

use tabled::Tabled;

use slicewatch_core::{
    Command as CoreCommand, CommandOutcome, CreateSliceRequest, Dashboard, DashboardConfig,
    SliceDetail, SliceId, SliceSummary,
};

use crate::cli::{GlobalOpts, SlicesArgs, SlicesCommand};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct SliceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Tenant")]
    tenant: String,
    #[tabled(rename = "QoS")]
    qos: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Devices")]
    devices: usize,
    #[tabled(rename = "Mbps")]
    throughput: String,
}

fn row(s: &SliceSummary, color: bool) -> SliceRow {
    let throughput = s
        .metrics
        .last()
        .map_or_else(|| "-".into(), |m| format!("{:.1}", m.throughput_mbps));
    SliceRow {
        id: s.id.to_string(),
        name: s.name.clone(),
        tenant: s.tenant.clone(),
        qos: s.qos_class.to_string(),
        status: output::status_cell(s.status, color),
        devices: s.devices.len(),
        throughput,
    }
}

fn detail(d: &SliceDetail) -> String {
    let mut lines = vec![
        format!("ID:      {}", d.id),
        format!("Name:    {}", d.name),
        format!("Tenant:  {}", d.tenant),
        format!("QoS:     {}", d.qos_class),
        format!("Status:  {}", d.status),
        format!(
            "Devices: {}",
            if d.devices.is_empty() {
                "-".into()
            } else {
                d.devices.join(", ")
            }
        ),
    ];
    if let Some(m) = d.latest_sample() {
        lines.push(format!(
            "Latest:  {:.1} Mbps, {:.1} ms, {:.2}% loss",
            m.throughput_mbps, m.latency_ms, m.packet_loss
        ));
        if let Some(score) = m.energy_score {
            lines.push(format!("Energy:  {score:.2}"));
        }
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    config: DashboardConfig,
    args: SlicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let url = config.base_url.clone();
    let color = output::should_color(&global.color);

    match args.command {
        SlicesCommand::List => {
            let slices = Dashboard::oneshot(config, |dash| async move {
                Ok(dash.state().slices.clone())
            })
            .await
            .map_err(|e| CliError::from_core(e, &url))?;

            let rendered = output::render_list(
                &global.output,
                &slices,
                |s| row(s, color),
                |s| s.id.to_string(),
            );
            output::print_output(&rendered, global.quiet);
        }

        SlicesCommand::Show { id } => {
            let slice_id = SliceId::new(id);
            let state = Dashboard::oneshot(config, |dash| async move {
                dash.select_slice(slice_id.clone());
                dash.refresh_selected(&slice_id).await?;
                Ok(dash.state())
            })
            .await
            .map_err(|e| CliError::from_core(e, &url))?;

            if let Some(d) = &state.selected_detail {
                let rendered =
                    output::render_single(&global.output, d, detail, |d| d.id.to_string());
                output::print_output(&rendered, global.quiet);
            }
            if !state.selected_alerts.is_empty() {
                let rendered = output::render_list(
                    &global.output,
                    &state.selected_alerts,
                    |a| super::alerts::row(a, color),
                    |a| a.id.to_string(),
                );
                output::print_output(&rendered, global.quiet);
            }
        }

        SlicesCommand::Create {
            name,
            tenant,
            qos,
            devices,
        } => {
            let request = CreateSliceRequest {
                name,
                tenant,
                qos_class: qos.into(),
                devices: CreateSliceRequest::parse_devices(&devices),
            };
            let outcome = Dashboard::oneshot(config, |dash| async move {
                dash.execute(CoreCommand::CreateSlice(request)).await
            })
            .await
            .map_err(|e| CliError::from_core(e, &url))?;

            if let CommandOutcome::Slice(d) = outcome {
                let rendered =
                    output::render_single(&global.output, &*d, detail, |d| d.id.to_string());
                output::print_output(&rendered, global.quiet);
            }
        }

        SlicesCommand::AddDevice { id, device_id } => {
            let slice_id = SliceId::new(id);
            let (outcome, state) = Dashboard::oneshot(config, |dash| async move {
                // Writes only apply to the selected slice.
                dash.select_slice(slice_id.clone());
                let outcome = dash
                    .execute(CoreCommand::AddDevice {
                        slice_id,
                        device_id,
                    })
                    .await?;
                Ok((outcome, dash.state()))
            })
            .await
            .map_err(|e| CliError::from_core(e, &url))?;

            if matches!(outcome, CommandOutcome::Skipped) {
                output::print_output("nothing to do", global.quiet);
            } else if let Some(d) = &state.selected_detail {
                let rendered =
                    output::render_single(&global.output, d, detail, |d| d.id.to_string());
                output::print_output(&rendered, global.quiet);
            }
        }
    }
    Ok(())
}
