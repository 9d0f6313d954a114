// ── Slice domain types ──
//
// SliceId, the QoS / status enums, the telemetry series, and the two
// slice views (summary for the list, detail for the selection).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── SliceId ─────────────────────────────────────────────────────────

/// Server-assigned slice identifier.
///
/// Opaque to the client — the manager mints slug-plus-suffix strings
/// (e.g. `edge-01-3fa2c1`) and the client never parses them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SliceId(String);

impl SliceId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SliceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SliceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SliceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ── Enums ───────────────────────────────────────────────────────────

/// Service tier governing throughput/latency guarantees.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum QosClass {
    Gold,
    Silver,
    #[default]
    Bronze,
}

/// Slice operational status.
///
/// `Unknown` absorbs any value this client doesn't recognize — an
/// unfamiliar status from a newer manager must render neutrally, never
/// fail a poll.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[non_exhaustive]
pub enum SliceStatus {
    Active,
    Degraded,
    Provisioning,
    Error,
    #[serde(other)]
    #[default]
    Unknown,
}

impl SliceStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl FromStr for SliceStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "active" => Self::Active,
            "degraded" => Self::Degraded,
            "provisioning" => Self::Provisioning,
            "error" => Self::Error,
            _ => Self::Unknown,
        })
    }
}

// ── Telemetry ───────────────────────────────────────────────────────

/// One timestamped measurement of a slice's traffic characteristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub timestamp: DateTime<Utc>,
    pub throughput_mbps: f64,
    pub latency_ms: f64,
    /// Percentage in `[0, 100]`.
    pub packet_loss: f64,
    /// Energy-efficiency score in `[0, 1]`; newer managers only.
    pub energy_score: Option<f64>,
}

// ── Slice views ─────────────────────────────────────────────────────

/// A slice as it appears in the dashboard's list view.
///
/// Device lists carry no duplicates and `metrics` is ordered
/// non-decreasing by timestamp; conversion from the wire normalizes
/// both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceSummary {
    pub id: SliceId,
    pub name: String,
    pub tenant: String,
    pub qos_class: QosClass,
    pub status: SliceStatus,
    pub devices: Vec<String>,
    pub metrics: Vec<TelemetrySample>,
}

/// Full detail for the selected slice.
///
/// Identity is stable: the same id refers to the same slice across
/// refreshes for as long as it exists. The manager currently serves
/// the summary field set for detail too; the type stays separate so
/// detail-only fields can land without touching the list view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceDetail {
    pub id: SliceId,
    pub name: String,
    pub tenant: String,
    pub qos_class: QosClass,
    pub status: SliceStatus,
    pub devices: Vec<String>,
    pub metrics: Vec<TelemetrySample>,
}

impl SliceDetail {
    /// The most recent telemetry sample, if any.
    pub fn latest_sample(&self) -> Option<&TelemetrySample> {
        self.metrics.last()
    }
}
