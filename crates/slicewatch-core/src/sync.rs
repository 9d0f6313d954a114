// ── Background synchronization tasks ──
//
// Three tasks per session: the list poll loop, the selection-driven
// detail loop, and the command processor. All are spawned by
// `Dashboard::start` and stop on the session's cancellation token.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use slicewatch_api::models::{AddDeviceBody, CreateAlertBody, CreateSliceBody};

use crate::command::{Command, CommandEnvelope, CommandOutcome};
use crate::dashboard::Dashboard;
use crate::error::CoreError;
use crate::model::{Alert, SliceDetail, SliceSummary};

/// Periodically replace the slice collection.
///
/// A failed tick leaves `slices` unchanged; the next tick retries
/// implicitly. No backoff.
pub(crate) async fn list_poll_task(
    dash: Dashboard,
    period: Duration,
    primed: bool,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    if primed {
        // The startup fetch already covered the immediate first tick.
        interval.tick().await;
    }

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = dash.refresh_slices().await {
                    warn!(error = %e, "slice list poll failed");
                }
            }
        }
    }
}

/// Poll detail and alerts for whichever slice is selected.
///
/// The loop is armed only while a selection exists: clearing the
/// selection parks it on the watch channel with no timer running.
/// Every selection change re-arms with a fresh interval, so the new
/// slice is fetched immediately rather than on the old cadence.
pub(crate) async fn detail_sync_task(dash: Dashboard, period: Duration, cancel: CancellationToken) {
    let mut selection_rx = dash.inner.selection.subscribe();

    loop {
        let current = selection_rx.borrow_and_update().clone();
        let Some(id) = current else {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return,
                changed = selection_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
            continue;
        };

        // Fresh interval per selection; the first tick fires at once.
        let mut interval = tokio::time::interval(period);
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return,
                changed = selection_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    break; // re-arm for the new selection
                }
                _ = interval.tick() => {
                    if let Err(e) = dash.refresh_selected(&id).await {
                        warn!(slice = %id, error = %e, "detail poll failed");
                    }
                }
            }
        }
    }
}

/// Process commands from the mpsc channel.
pub(crate) async fn command_processor_task(dash: Dashboard, mut rx: mpsc::Receiver<CommandEnvelope>) {
    let cancel = dash.inner.cancel.clone();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let result = route_command(&dash, envelope.command).await;
                let _ = envelope.response_tx.send(result);
            }
        }
    }
}

// ── Command routing ──────────────────────────────────────────────

/// Route a command: issue the write, then run the narrow refresh that
/// operation calls for.
///
/// A refresh failure after a successful write is absorbed with a
/// warning rather than reported as a command failure — the data is
/// merely stale and the next poll tick heals it.
#[allow(clippy::too_many_lines)]
async fn route_command(dash: &Dashboard, cmd: Command) -> Result<CommandOutcome, CoreError> {
    match cmd {
        Command::CreateSlice(req) => {
            let req = req.validated()?;
            let body = CreateSliceBody {
                name: req.name,
                tenant: req.tenant,
                qos_class: req.qos_class.to_string(),
                devices: req.devices,
            };
            let record = dash.inner.gateway.create_slice(&body).await?;
            let summary = SliceSummary::from(record.clone());
            let detail = SliceDetail::from(record);
            let id = detail.id.clone();

            // Optimistic append, then the new slice wins the selection.
            dash.inner.state.update(|s| {
                if !s.slices.iter().any(|existing| existing.id == summary.id) {
                    s.slices.push(summary);
                }
            });
            dash.set_selection(Some(id.clone()));
            debug!(slice = %id, "created slice");
            Ok(CommandOutcome::Slice(Box::new(detail)))
        }

        Command::AddDevice {
            slice_id,
            device_id,
        } => {
            let device_id = device_id.trim().to_owned();
            if device_id.is_empty() {
                debug!("ignoring add-device with empty device id");
                return Ok(CommandOutcome::Skipped);
            }
            if !dash.selection_is(&slice_id) {
                debug!(slice = %slice_id, "ignoring add-device for unselected slice");
                return Ok(CommandOutcome::Skipped);
            }

            dash.inner
                .gateway
                .add_device(slice_id.as_str(), &AddDeviceBody { device_id })
                .await?;

            // Full detail refetch rather than patching the response in.
            if let Err(e) = dash.refresh_selected_detail(&slice_id).await {
                warn!(slice = %slice_id, error = %e, "detail refetch after add-device failed");
            }
            Ok(CommandOutcome::Applied)
        }

        Command::TriggerAlert(req) => {
            let req = req.validated()?;
            if !dash.selection_is(&req.slice_id) {
                debug!(slice = %req.slice_id, "ignoring trigger-alert for unselected slice");
                return Ok(CommandOutcome::Skipped);
            }

            let body = CreateAlertBody {
                title: req.title,
                description: req.description,
                severity: req.severity.to_string(),
            };
            let record = dash
                .inner
                .gateway
                .create_alert(req.slice_id.as_str(), &body)
                .await?;
            let alert = Alert::from(record);

            if let Err(e) = dash.refresh_selected_alerts(&req.slice_id).await {
                warn!(slice = %req.slice_id, error = %e, "alert refetch after trigger failed");
            }
            Ok(CommandOutcome::Alert(Box::new(alert)))
        }

        Command::ResolveAlert { alert_id } => {
            // Fire-and-forget against the remote, which is authoritative
            // about which slice the alert belongs to.
            let record = dash.inner.gateway.resolve_alert(alert_id.as_str()).await?;
            let alert = Alert::from(record);

            if let Some(selected) = dash.selection() {
                if let Err(e) = dash.refresh_selected_alerts(&selected).await {
                    warn!(slice = %selected, error = %e, "alert refetch after resolve failed");
                }
            }
            Ok(CommandOutcome::Alert(Box::new(alert)))
        }
    }
}
