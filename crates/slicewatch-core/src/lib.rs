//! State-synchronization engine between `slicewatch-api` and UI consumers.
//!
//! This crate owns the business logic, domain model, and reactive state
//! infrastructure for the slicewatch workspace:
//!
//! - **[`Dashboard`]** — Central facade managing the full session
//!   lifecycle: [`start()`](Dashboard::start) loads the initial slice
//!   list, then spawns background tasks for list polling, selection-
//!   driven detail polling, and command processing.
//!   [`Dashboard::oneshot()`](Dashboard::oneshot) provides a lightweight
//!   mode for single CLI invocations with polling disabled.
//!
//! - **[`DashboardState`]** — The single shared snapshot consumers
//!   render from: slice collection, selection, selected detail and
//!   alerts. Published through a `tokio::sync::watch` channel as atomic
//!   whole-object replacements, so readers never observe a
//!   half-applied refresh.
//!
//! - **[`Command`]** — Typed mutation requests routed through an `mpsc`
//!   channel to the session's command processor. Each write is followed
//!   by the narrow refresh that operation calls for, guarded against
//!   selection races.
//!
//! - **Domain model** ([`model`]) — Canonical types (`SliceSummary`,
//!   `SliceDetail`, `Alert`, `TelemetrySample`) normalized from the
//!   permissive wire records in `slicewatch-api`.

pub mod command;
pub mod config;
pub mod convert;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod state;

mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::requests::*;
pub use command::{Command, CommandOutcome};
pub use config::{DEFAULT_POLL_INTERVAL, DashboardConfig};
pub use dashboard::Dashboard;
pub use error::CoreError;
pub use slicewatch_api::Error as GatewayError;
pub use slicewatch_api::TlsMode;
pub use state::DashboardState;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Alert, AlertId, AlertSeverity, QosClass, SliceDetail, SliceId, SliceStatus, SliceSummary,
    TelemetrySample,
};
