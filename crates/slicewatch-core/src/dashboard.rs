// ── Dashboard engine ──
//
// Full lifecycle management for a dashboard session: the initial list
// load, background list and detail polling, command routing, and the
// shared state cell consumers subscribe to.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use slicewatch_api::GatewayClient;
use slicewatch_api::models::HealthStatus;

use crate::command::{Command, CommandEnvelope, CommandOutcome};
use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::model::{Alert, SliceDetail, SliceId, SliceSummary};
use crate::state::{DashboardState, StateCell};
use crate::sync::{command_processor_task, detail_sync_task, list_poll_task};

const COMMAND_CHANNEL_SIZE: usize = 32;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<DashboardInner>`. Owns the gateway
/// client, the selection, the shared [`DashboardState`], and the
/// background synchronization tasks.
#[derive(Clone)]
pub struct Dashboard {
    pub(crate) inner: Arc<DashboardInner>,
}

pub(crate) struct DashboardInner {
    pub(crate) config: DashboardConfig,
    pub(crate) gateway: GatewayClient,
    pub(crate) state: StateCell,
    /// The selection is the primary trigger: the detail synchronizer
    /// watches it, and refresh commits compare against it.
    pub(crate) selection: watch::Sender<Option<SliceId>>,
    /// One-shot latch for the "select the first slice" policy. Any
    /// explicit selection change also consumes it.
    auto_selected: AtomicBool,
    command_tx: mpsc::Sender<CommandEnvelope>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    pub(crate) cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Dashboard {
    /// Create a new Dashboard from configuration. Does NOT load any
    /// data — call [`start()`](Self::start) to run the initial fetch
    /// and spawn background tasks.
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        let gateway = GatewayClient::new(config.base_url.clone(), &config.transport())?;
        let (selection, _) = watch::channel(None);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);

        Ok(Self {
            inner: Arc::new(DashboardInner {
                config,
                gateway,
                state: StateCell::new(),
                selection,
                auto_selected: AtomicBool::new(false),
                command_tx,
                command_rx: Mutex::new(Some(command_rx)),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Access the dashboard configuration.
    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    // ── Session lifecycle ────────────────────────────────────────

    /// Load the slice list once, then spawn background tasks: the
    /// command processor, and (unless `poll_interval` is zero) the
    /// list and detail poll loops.
    pub async fn start(&self) -> Result<(), CoreError> {
        let period = self.inner.config.poll_interval;

        // With polling disabled there is no retry loop behind this
        // fetch, so the failure surfaces. Otherwise the session runs
        // and the first successful tick populates the list.
        let primed = match self.refresh_slices().await {
            Ok(()) => true,
            Err(e) if period.is_zero() => return Err(e),
            Err(e) => {
                warn!(error = %e, "initial slice fetch failed, polling will retry");
                false
            }
        };

        let mut handles = self.inner.task_handles.lock().await;

        if let Some(rx) = self.inner.command_rx.lock().await.take() {
            let dash = self.clone();
            handles.push(tokio::spawn(command_processor_task(dash, rx)));
        }

        if !period.is_zero() {
            let dash = self.clone();
            let cancel = self.inner.cancel.clone();
            handles.push(tokio::spawn(list_poll_task(dash, period, primed, cancel)));

            let dash = self.clone();
            let cancel = self.inner.cancel.clone();
            handles.push(tokio::spawn(detail_sync_task(dash, period, cancel)));
        }

        info!(
            base_url = %self.inner.config.base_url,
            poll_interval = ?period,
            "dashboard session started"
        );
        Ok(())
    }

    /// Stop all background tasks and join them. The state cell keeps
    /// its last published snapshot; commands fail with
    /// [`CoreError::EngineStopped`] afterwards.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("dashboard session stopped");
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// One-shot: start, run closure, shut down.
    ///
    /// Optimized for CLI use: background polling is disabled since a
    /// single request-response cycle is all that's needed.
    pub async fn oneshot<F, Fut, T>(config: DashboardConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Dashboard) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.poll_interval = std::time::Duration::ZERO;

        let dashboard = Dashboard::new(cfg)?;
        dashboard.start().await?;
        let result = f(dashboard.clone()).await;
        dashboard.shutdown().await;
        result
    }

    // ── State observation ────────────────────────────────────────

    /// Current state snapshot (cheap `Arc` clone).
    pub fn state(&self) -> Arc<DashboardState> {
        self.inner.state.snapshot()
    }

    /// Subscribe to state replacements.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardState>> {
        self.inner.state.subscribe()
    }

    /// Monotonic counter bumped on every state publish.
    pub fn state_version(&self) -> u64 {
        self.inner.state.version()
    }

    /// The currently selected slice id, if any.
    pub fn selection(&self) -> Option<SliceId> {
        self.inner.selection.borrow().clone()
    }

    // ── Selection ────────────────────────────────────────────────

    /// Select a slice. The detail synchronizer reacts by fetching its
    /// detail and alerts immediately, then on every tick.
    pub fn select_slice(&self, id: impl Into<SliceId>) {
        self.set_selection(Some(id.into()));
    }

    /// Clear the selection. Detail polling stops until the next
    /// selection; the auto-select rule does not re-trigger.
    pub fn clear_selection(&self) {
        self.set_selection(None);
    }

    pub(crate) fn set_selection(&self, target: Option<SliceId>) {
        self.inner.auto_selected.store(true, Ordering::Release);

        let changed = self.inner.selection.send_if_modified(|sel| {
            if *sel == target {
                false
            } else {
                *sel = target.clone();
                true
            }
        });

        if changed {
            let loading = target.is_some();
            self.inner.state.update(|s| {
                s.selected_id = target;
                s.selected_detail = None;
                s.selected_alerts = Vec::new();
                s.detail_loading = loading;
            });
        }
    }

    pub(crate) fn selection_is(&self, id: &SliceId) -> bool {
        self.inner.selection.borrow().as_ref() == Some(id)
    }

    // ── Command execution ────────────────────────────────────────

    /// Execute a command.
    ///
    /// Sends the command through the internal channel to the command
    /// processor task and awaits the outcome.
    pub async fn execute(&self, cmd: Command) -> Result<CommandOutcome, CoreError> {
        let (tx, rx) = tokio::sync::oneshot::channel();

        self.inner
            .command_tx
            .send(CommandEnvelope {
                command: cmd,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::EngineStopped)?;

        rx.await.map_err(|_| CoreError::EngineStopped)?
    }

    // ── Refresh paths ────────────────────────────────────────────
    //
    // The synchronizers and the mutation routing both funnel through
    // these. Each commit is guarded by a compare against the current
    // selection so a result fetched for a superseded selection is
    // discarded instead of overwriting the new one.

    /// Fetch the slice collection and replace `slices` wholesale.
    /// Applies the one-time auto-select of the first slice.
    pub async fn refresh_slices(&self) -> Result<(), CoreError> {
        let records = self.inner.gateway.list_slices().await?;
        let slices: Vec<SliceSummary> = records.into_iter().map(Into::into).collect();
        let first = slices.first().map(|s| s.id.clone());

        self.inner.state.update(|s| s.slices = slices);

        if let Some(id) = first {
            if !self.inner.auto_selected.load(Ordering::Acquire) {
                let claimed = self.inner.selection.send_if_modified(|sel| {
                    if sel.is_none() {
                        *sel = Some(id.clone());
                        true
                    } else {
                        false
                    }
                });
                self.inner.auto_selected.store(true, Ordering::Release);
                if claimed {
                    debug!(slice = %id, "auto-selected first slice");
                    self.inner.state.update(|s| {
                        s.selected_id = Some(id);
                        s.detail_loading = true;
                    });
                }
            }
        }
        Ok(())
    }

    /// Fetch detail and alerts for `id` together and commit both in
    /// one state replacement, but only if `id` is still the selection
    /// when both results are in.
    pub async fn refresh_selected(&self, id: &SliceId) -> Result<(), CoreError> {
        let (detail_res, alerts_res) = tokio::join!(
            self.inner.gateway.get_slice(id.as_str()),
            self.inner.gateway.list_slice_alerts(id.as_str()),
        );
        let detail: SliceDetail = detail_res?.into();
        let alerts: Vec<Alert> = alerts_res?.into_iter().map(Into::into).collect();

        // Tag compare and commit are one step: the check runs under
        // the state lock, so a selection change can't slip in between.
        let committed = self.inner.state.update_if(
            |s| s.selected_id.as_ref() == Some(id),
            |s| {
                s.selected_detail = Some(detail);
                s.selected_alerts = alerts;
                s.detail_loading = false;
            },
        );
        if !committed {
            debug!(slice = %id, "discarding joined fetch for superseded selection");
        }
        Ok(())
    }

    /// Fetch detail only for `id`, leaving alerts untouched. Guarded
    /// like [`refresh_selected`](Self::refresh_selected).
    pub(crate) async fn refresh_selected_detail(&self, id: &SliceId) -> Result<(), CoreError> {
        let detail: SliceDetail = self.inner.gateway.get_slice(id.as_str()).await?.into();

        let committed = self.inner.state.update_if(
            |s| s.selected_id.as_ref() == Some(id),
            |s| {
                s.selected_detail = Some(detail);
                s.detail_loading = false;
            },
        );
        if !committed {
            debug!(slice = %id, "discarding detail fetch for superseded selection");
        }
        Ok(())
    }

    /// Fetch alerts only for `id`, leaving detail untouched. Guarded
    /// like [`refresh_selected`](Self::refresh_selected).
    pub(crate) async fn refresh_selected_alerts(&self, id: &SliceId) -> Result<(), CoreError> {
        let records = self.inner.gateway.list_slice_alerts(id.as_str()).await?;
        let alerts: Vec<Alert> = records.into_iter().map(Into::into).collect();

        let committed = self.inner.state.update_if(
            |s| s.selected_id.as_ref() == Some(id),
            |s| s.selected_alerts = alerts,
        );
        if !committed {
            debug!(slice = %id, "discarding alert fetch for superseded selection");
        }
        Ok(())
    }

    // ── Passthrough reads ────────────────────────────────────────

    /// Alerts across all slices, straight from the gateway.
    pub async fn all_alerts(&self) -> Result<Vec<Alert>, CoreError> {
        let records = self.inner.gateway.list_alerts().await?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Alerts for one slice, straight from the gateway. Does not touch
    /// the shared state; use the refresh paths for that.
    pub async fn slice_alerts(&self, id: &SliceId) -> Result<Vec<Alert>, CoreError> {
        let records = self.inner.gateway.list_slice_alerts(id.as_str()).await?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Liveness probe against the slice manager.
    pub async fn ping(&self) -> Result<HealthStatus, CoreError> {
        Ok(self.inner.gateway.health().await?)
    }
}
