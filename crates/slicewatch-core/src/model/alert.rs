// ── Alert domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::slice::SliceId;

// ── AlertId ─────────────────────────────────────────────────────────

/// Server-assigned alert identifier (opaque hex string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(String);

impl AlertId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AlertId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ── Severity ────────────────────────────────────────────────────────

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AlertSeverity {
    #[default]
    Info,
    Warning,
    Critical,
}

// ── Alert ───────────────────────────────────────────────────────────

/// An operator-visible notification tied to a slice.
///
/// `slice_id` is a foreign reference, not ownership — alerts outlive
/// the client's view of their slice. Lifecycle: raised unresolved,
/// transitions to resolved exactly once, never deleted by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub slice_id: Option<SliceId>,
    pub title: String,
    pub description: String,
    pub severity: AlertSeverity,
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    pub fn is_open(&self) -> bool {
        !self.resolved
    }
}
