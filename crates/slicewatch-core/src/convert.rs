// ── Wire-to-domain conversion ──
//
// Converts the permissive records from `slicewatch-api` into canonical
// model types, normalizing on the way in so local invariants hold no
// matter what the remote sent: metrics sorted by timestamp, device
// lists deduplicated preserving first occurrence.

use slicewatch_api::models::{AlertRecord, MetricRecord, SliceRecord};

use crate::model::{
    Alert, AlertId, AlertSeverity, SliceDetail, SliceId, SliceStatus, SliceSummary,
    TelemetrySample,
};

/// Drop duplicate device ids, keeping the first occurrence in order.
fn dedup_devices(devices: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    devices
        .into_iter()
        .filter(|d| seen.insert(d.clone()))
        .collect()
}

/// Sort samples non-decreasing by timestamp (stable, so same-instant
/// samples keep their server order).
fn normalize_metrics(metrics: Vec<MetricRecord>) -> Vec<TelemetrySample> {
    let mut samples: Vec<TelemetrySample> = metrics.into_iter().map(Into::into).collect();
    samples.sort_by_key(|s| s.timestamp);
    samples
}

/// A missing status means the manager hasn't reported one yet —
/// treat it as still provisioning (the manager's own default).
fn parse_status(status: Option<&str>) -> SliceStatus {
    status.map_or(SliceStatus::Provisioning, |s| {
        s.parse().unwrap_or(SliceStatus::Unknown)
    })
}

impl From<MetricRecord> for TelemetrySample {
    fn from(m: MetricRecord) -> Self {
        Self {
            timestamp: m.timestamp,
            throughput_mbps: m.throughput_mbps,
            latency_ms: m.latency_ms,
            packet_loss: m.packet_loss,
            energy_score: m.energy_score,
        }
    }
}

impl From<SliceRecord> for SliceSummary {
    fn from(r: SliceRecord) -> Self {
        Self {
            id: SliceId::new(r.id),
            name: r.name,
            tenant: r.tenant,
            qos_class: r.qos_class.parse().unwrap_or_default(),
            status: parse_status(r.status.as_deref()),
            devices: dedup_devices(r.devices),
            metrics: normalize_metrics(r.metrics),
        }
    }
}

impl From<SliceRecord> for SliceDetail {
    fn from(r: SliceRecord) -> Self {
        Self {
            id: SliceId::new(r.id),
            name: r.name,
            tenant: r.tenant,
            qos_class: r.qos_class.parse().unwrap_or_default(),
            status: parse_status(r.status.as_deref()),
            devices: dedup_devices(r.devices),
            metrics: normalize_metrics(r.metrics),
        }
    }
}

impl From<AlertRecord> for Alert {
    fn from(r: AlertRecord) -> Self {
        Self {
            id: AlertId::new(r.id),
            slice_id: r.slice_id.map(SliceId::new),
            title: r.title,
            description: r.description,
            severity: r
                .severity
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or(AlertSeverity::Info),
            resolved: r.resolved,
            created_at: r.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn metric(ts_secs: i64, throughput: f64) -> MetricRecord {
        MetricRecord {
            timestamp: Utc.timestamp_opt(ts_secs, 0).unwrap(),
            throughput_mbps: throughput,
            latency_ms: 20.0,
            packet_loss: 0.1,
            energy_score: None,
        }
    }

    fn record() -> SliceRecord {
        SliceRecord {
            id: "s-1".into(),
            name: "cctv".into(),
            tenant: "city-ops".into(),
            qos_class: "gold".into(),
            status: Some("active".into()),
            devices: vec!["cam-1".into(), "cam-2".into(), "cam-1".into()],
            metrics: vec![metric(200, 2.0), metric(100, 1.0), metric(150, 1.5)],
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn summary_dedups_devices_preserving_order() {
        let summary = SliceSummary::from(record());
        assert_eq!(summary.devices, vec!["cam-1", "cam-2"]);
    }

    #[test]
    fn summary_sorts_metrics_by_timestamp() {
        let summary = SliceSummary::from(record());
        let throughputs: Vec<f64> = summary.metrics.iter().map(|m| m.throughput_mbps).collect();
        assert_eq!(throughputs, vec![1.0, 1.5, 2.0]);
    }

    #[test]
    fn missing_status_means_provisioning() {
        let mut r = record();
        r.status = None;
        assert_eq!(SliceSummary::from(r).status, SliceStatus::Provisioning);
    }

    #[test]
    fn unrecognized_status_maps_to_unknown() {
        let mut r = record();
        r.status = Some("hibernating".into());
        assert_eq!(SliceSummary::from(r).status, SliceStatus::Unknown);
    }

    #[test]
    fn alert_defaults_severity_to_info() {
        let alert = Alert::from(AlertRecord {
            id: "a-1".into(),
            slice_id: Some("s-1".into()),
            title: "t".into(),
            description: String::new(),
            severity: Some("catastrophic".into()),
            resolved: false,
            created_at: Utc.timestamp_opt(100, 0).unwrap(),
            extra: serde_json::Map::new(),
        });
        assert_eq!(alert.severity, AlertSeverity::Info);
        assert!(alert.is_open());
    }
}
