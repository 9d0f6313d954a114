// ── Typed request structs for Command payloads ──

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{AlertSeverity, QosClass, SliceId};

// ── Slice provisioning ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSliceRequest {
    pub name: String,
    pub tenant: String,
    pub qos_class: QosClass,
    /// Device ids exactly as the operator entered them — duplicates
    /// are forwarded verbatim, the server owns dedup.
    pub devices: Vec<String>,
}

impl CreateSliceRequest {
    /// Parse a free-text comma-separated device field: entries are
    /// trimmed, empties dropped, duplicates kept.
    pub fn parse_devices(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from)
            .collect()
    }

    /// Trim the required fields, rejecting empties before any request
    /// is issued.
    pub(crate) fn validated(mut self) -> Result<Self, CoreError> {
        self.name = self.name.trim().to_owned();
        self.tenant = self.tenant.trim().to_owned();
        if self.name.is_empty() {
            return Err(CoreError::validation("slice name must not be empty"));
        }
        if self.tenant.is_empty() {
            return Err(CoreError::validation("tenant must not be empty"));
        }
        Ok(self)
    }
}

// ── Alerts ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerAlertRequest {
    pub slice_id: SliceId,
    pub title: String,
    pub description: String,
    pub severity: AlertSeverity,
}

impl TriggerAlertRequest {
    pub(crate) fn validated(mut self) -> Result<Self, CoreError> {
        self.title = self.title.trim().to_owned();
        self.description = self.description.trim().to_owned();
        if self.title.is_empty() {
            return Err(CoreError::validation("alert title must not be empty"));
        }
        if self.description.is_empty() {
            return Err(CoreError::validation("alert description must not be empty"));
        }
        Ok(self)
    }
}
