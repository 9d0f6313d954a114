//! Alert command handlers.

use tabled::Tabled;

use slicewatch_core::{
    Alert, AlertId, Command as CoreCommand, CommandOutcome, Dashboard, DashboardConfig, SliceId,
    TriggerAlertRequest,
};

use crate::cli::{AlertsArgs, AlertsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct AlertRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Slice")]
    slice: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Created")]
    created: String,
}

pub(crate) fn row(a: &Alert, color: bool) -> AlertRow {
    AlertRow {
        id: a.id.to_string(),
        slice: a
            .slice_id
            .as_ref()
            .map_or_else(|| "-".into(), ToString::to_string),
        severity: output::severity_cell(a.severity, color),
        title: a.title.clone(),
        state: if a.resolved { "resolved" } else { "open" }.into(),
        created: a.created_at.format("%Y-%m-%d %H:%M").to_string(),
    }
}

fn detail(a: &Alert) -> String {
    [
        format!("ID:          {}", a.id),
        format!(
            "Slice:       {}",
            a.slice_id
                .as_ref()
                .map_or_else(|| "-".into(), ToString::to_string)
        ),
        format!("Title:       {}", a.title),
        format!("Description: {}", a.description),
        format!("Severity:    {}", a.severity),
        format!("State:       {}", if a.resolved { "resolved" } else { "open" }),
        format!("Created:     {}", a.created_at.to_rfc3339()),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    config: DashboardConfig,
    args: AlertsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let url = config.base_url.clone();
    let color = output::should_color(&global.color);

    match args.command {
        AlertsCommand::List { slice } => {
            let alerts = Dashboard::oneshot(config, |dash| async move {
                match slice {
                    Some(id) => dash.slice_alerts(&SliceId::new(id)).await,
                    None => dash.all_alerts().await,
                }
            })
            .await
            .map_err(|e| CliError::from_core(e, &url))?;

            let rendered = output::render_list(
                &global.output,
                &alerts,
                |a| row(a, color),
                |a| a.id.to_string(),
            );
            output::print_output(&rendered, global.quiet);
        }

        AlertsCommand::Trigger {
            slice,
            title,
            description,
            severity,
        } => {
            let request = TriggerAlertRequest {
                slice_id: SliceId::new(slice),
                title,
                description,
                severity: severity.into(),
            };
            let outcome = Dashboard::oneshot(config, |dash| async move {
                // Alerts can only be raised against the selected slice.
                dash.select_slice(request.slice_id.clone());
                dash.execute(CoreCommand::TriggerAlert(request)).await
            })
            .await
            .map_err(|e| CliError::from_core(e, &url))?;

            if let CommandOutcome::Alert(a) = outcome {
                let rendered =
                    output::render_single(&global.output, &*a, detail, |a| a.id.to_string());
                output::print_output(&rendered, global.quiet);
            }
        }

        AlertsCommand::Resolve { id } => {
            let outcome = Dashboard::oneshot(config, |dash| async move {
                dash.execute(CoreCommand::ResolveAlert {
                    alert_id: AlertId::new(id),
                })
                .await
            })
            .await
            .map_err(|e| CliError::from_core(e, &url))?;

            if let CommandOutcome::Alert(a) = outcome {
                let rendered =
                    output::render_single(&global.output, &*a, detail, |a| a.id.to_string());
                output::print_output(&rendered, global.quiet);
            }
        }
    }
    Ok(())
}
