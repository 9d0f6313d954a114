// ── Domain model ──
//
// Canonical types for the dashboard. Wire records from
// `slicewatch-api` convert into these via `crate::convert`.

pub mod alert;
pub mod slice;

pub use alert::{Alert, AlertId, AlertSeverity};
pub use slice::{QosClass, SliceDetail, SliceId, SliceStatus, SliceSummary, TelemetrySample};
