//! Command dispatch: bridges CLI args -> core Commands -> output
//! formatting.

pub mod alerts;
pub mod slices;
pub mod watch;

use slicewatch_core::{Dashboard, DashboardConfig};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    config: DashboardConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Slices(args) => slices::handle(config, args, global).await,
        Command::Alerts(args) => alerts::handle(config, args, global).await,
        Command::Watch(args) => watch::handle(config, args, global).await,
        Command::Ping => ping(config, global).await,
    }
}

async fn ping(config: DashboardConfig, global: &GlobalOpts) -> Result<(), CliError> {
    // No session needed: a bare client is enough for a liveness probe.
    let url = config.base_url.clone();
    let dash = Dashboard::new(config).map_err(|e| CliError::from_core(e, &url))?;
    let health = dash
        .ping()
        .await
        .map_err(|e| CliError::from_core(e, &url))?;

    output::print_output(&format!("{url} is {}", health.status), global.quiet);
    Ok(())
}
