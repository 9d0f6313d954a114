// ── Command API ──
//
// All write operations flow through a unified `Command` enum. The
// dashboard routes each variant to the gateway, then triggers the
// narrow refresh that operation calls for.

pub mod requests;

use crate::error::CoreError;
use crate::model::{Alert, AlertId, SliceDetail, SliceId};

pub use requests::{CreateSliceRequest, TriggerAlertRequest};

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandOutcome, CoreError>>,
}

/// All possible write operations against the slice gateway.
#[derive(Debug, Clone)]
pub enum Command {
    // ── Slice operations ─────────────────────────────────────────────
    CreateSlice(CreateSliceRequest),
    AddDevice {
        slice_id: SliceId,
        device_id: String,
    },

    // ── Alert operations ─────────────────────────────────────────────
    TriggerAlert(TriggerAlertRequest),
    ResolveAlert {
        alert_id: AlertId,
    },
}

/// Result of a command execution.
///
/// `Skipped` means the command was a recognised no-op (for example an
/// `AddDevice` against a slice that is no longer selected) and no
/// request was issued.
#[derive(Debug)]
pub enum CommandOutcome {
    Slice(Box<SliceDetail>),
    Alert(Box<Alert>),
    Applied,
    Skipped,
}
