// Wire-level records for the slice manager REST API.
//
// These mirror the remote's JSON shapes and stay deliberately
// permissive: enums travel as plain strings, unknown fields are
// captured in `extra`, and optional fields default. `slicewatch-core`
// converts them into canonical domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A slice as served by `GET /slices` and `GET /slices/{id}`.
///
/// The list and detail endpoints serve the same object shape; the
/// split into summary and detail happens in the domain layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliceRecord {
    pub id: String,
    pub name: String,
    pub tenant: String,
    pub qos_class: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub devices: Vec<String>,
    #[serde(default)]
    pub metrics: Vec<MetricRecord>,
    /// Fields this client doesn't model yet (forward compatibility).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One telemetry sample inside a slice's `metrics` series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricRecord {
    pub timestamp: DateTime<Utc>,
    pub throughput_mbps: f64,
    pub latency_ms: f64,
    pub packet_loss: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_score: Option<f64>,
}

/// An alert as served by the alert endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: String,
    #[serde(default)]
    pub slice_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub severity: Option<String>,
    /// Older slice managers delete resolved alerts instead of flagging
    /// them, so the field may be absent entirely.
    #[serde(default)]
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

// ── Request bodies ─────────────────────────────────────────────────

/// Body of `POST /slices`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSliceBody {
    pub name: String,
    pub tenant: String,
    pub qos_class: String,
    /// Sent verbatim, duplicates included — the server owns dedup.
    pub devices: Vec<String>,
}

/// Body of `POST /slices/{id}/devices`.
#[derive(Debug, Clone, Serialize)]
pub struct AddDeviceBody {
    pub device_id: String,
}

/// Body of `POST /slices/{id}/alerts`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateAlertBody {
    pub title: String,
    pub description: String,
    pub severity: String,
}
