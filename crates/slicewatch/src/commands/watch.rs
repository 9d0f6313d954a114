//! Live dashboard: polls the slice manager and prints one status line
//! per state change until interrupted.

use std::io::{self, Write};

use owo_colors::OwoColorize;

use slicewatch_core::{Dashboard, DashboardConfig, DashboardState};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    mut config: DashboardConfig,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    config.poll_interval = args.interval;
    let url = config.base_url.clone();
    let color = output::should_color(&global.color);

    let dash = Dashboard::new(config).map_err(|e| CliError::from_core(e, &url))?;
    dash.start()
        .await
        .map_err(|e| CliError::from_core(e, &url))?;

    if let Some(id) = args.slice {
        dash.select_slice(id.as_str());
    }

    let mut rx = dash.subscribe();
    print_line(&rx.borrow_and_update().clone(), color, global.quiet);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                print_line(&rx.borrow_and_update().clone(), color, global.quiet);
            }
        }
    }

    dash.shutdown().await;
    Ok(())
}

fn print_line(state: &DashboardState, color: bool, quiet: bool) {
    if quiet {
        return;
    }

    let selected = match (&state.selected_id, &state.selected_detail) {
        (Some(_), Some(d)) => {
            let open = state.selected_alerts.iter().filter(|a| a.is_open()).count();
            let metrics = d.latest_sample().map_or_else(String::new, |m| {
                format!(" {:.1}Mbps {:.1}ms", m.throughput_mbps, m.latency_ms)
            });
            format!(
                "{} [{}]{} open-alerts={}",
                d.name,
                output::status_cell(d.status, color),
                metrics,
                open
            )
        }
        (Some(id), None) if state.detail_loading => format!("{id} (loading)"),
        (Some(id), None) => id.to_string(),
        (None, _) => "no selection".to_string(),
    };

    let now = chrono::Utc::now().format("%H:%M:%S");
    let stamp = if color {
        now.dimmed().to_string()
    } else {
        now.to_string()
    };
    let mut stdout = io::stdout().lock();
    let _ = writeln!(
        stdout,
        "{stamp}  slices={}  {selected}",
        state.slices.len()
    );
}
