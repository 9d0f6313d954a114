#![allow(clippy::unwrap_used)]
// Integration tests for the dashboard engine using wiremock.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use slicewatch_core::{
    Command, CommandOutcome, CoreError, CreateSliceRequest, Dashboard, DashboardConfig, QosClass,
    SliceId, TriggerAlertRequest,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn slice_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "tenant": "city-ops",
        "qos_class": "gold",
        "status": "active",
        "devices": [],
        "metrics": []
    })
}

fn alert_json(id: &str, slice_id: &str, resolved: bool) -> serde_json::Value {
    json!({
        "id": id,
        "slice_id": slice_id,
        "title": "latency breach",
        "description": "p99 above budget",
        "severity": "warning",
        "resolved": resolved,
        "created_at": "2026-03-01T10:00:00Z"
    })
}

async fn dashboard(server: &MockServer, poll_interval: Duration) -> Dashboard {
    let base_url = Url::parse(&server.uri()).unwrap();
    let config = DashboardConfig::new(base_url).with_poll_interval(poll_interval);
    let dash = Dashboard::new(config).unwrap();
    dash.start().await.unwrap();
    dash
}

/// Polling disabled; commands and manual refreshes only.
async fn manual_dashboard(server: &MockServer) -> Dashboard {
    dashboard(server, Duration::ZERO).await
}

async fn mount_slices(server: &MockServer, slices: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/slices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(slices))
        .mount(server)
        .await;
}

async fn mount_alerts(server: &MockServer, slice_id: &str, alerts: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/slices/{slice_id}/alerts")))
        .respond_with(ResponseTemplate::new(200).set_body_json(alerts))
        .mount(server)
        .await;
}

// ── List synchronizer ───────────────────────────────────────────────

#[tokio::test]
async fn list_poll_replaces_slices_wholesale() {
    let server = MockServer::start().await;

    // First poll serves two slices, every later poll a disjoint one.
    Mock::given(method("GET"))
        .and(path("/api/slices"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([slice_json("slice-a", "cctv"), slice_json("slice-b", "iot")])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_slices(&server, json!([slice_json("slice-c", "ar-gaming")])).await;
    mount_alerts(&server, "slice-a", json!([])).await;
    Mock::given(method("GET"))
        .and(path("/api/slices/slice-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(slice_json("slice-a", "cctv")))
        .mount(&server)
        .await;

    let dash = dashboard(&server, Duration::from_millis(100)).await;

    let initial = dash.state();
    assert_eq!(initial.slices.len(), 2);
    assert_eq!(initial.selected_id, Some(SliceId::new("slice-a")));

    tokio::time::sleep(Duration::from_millis(300)).await;

    let after = dash.state();
    assert_eq!(after.slices.len(), 1);
    assert_eq!(after.slices[0].id, SliceId::new("slice-c"));
    // The vanished selection dangles; it is never reassigned.
    assert_eq!(after.selected_id, Some(SliceId::new("slice-a")));
    assert!(after.selection_is_dangling());

    dash.shutdown().await;
}

#[tokio::test]
async fn first_slice_is_auto_selected_exactly_once() {
    let server = MockServer::start().await;
    mount_slices(
        &server,
        json!([slice_json("slice-a", "cctv"), slice_json("slice-b", "iot")]),
    )
    .await;

    let dash = manual_dashboard(&server).await;
    assert_eq!(dash.selection(), Some(SliceId::new("slice-a")));

    // A later list refresh must not override a cleared selection.
    dash.clear_selection();
    dash.refresh_slices().await.unwrap();
    assert_eq!(dash.selection(), None);

    dash.shutdown().await;
}

#[tokio::test]
async fn empty_list_selects_nothing() {
    let server = MockServer::start().await;
    mount_slices(&server, json!([])).await;

    let dash = manual_dashboard(&server).await;
    let state = dash.state();
    assert!(state.slices.is_empty());
    assert_eq!(state.selected_id, None);
    assert!(!state.detail_loading);

    dash.shutdown().await;
}

#[tokio::test]
async fn failed_list_poll_leaves_slices_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/slices"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([slice_json("slice-a", "cctv")])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/slices"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    mount_alerts(&server, "slice-a", json!([])).await;
    Mock::given(method("GET"))
        .and(path("/api/slices/slice-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(slice_json("slice-a", "cctv")))
        .mount(&server)
        .await;

    let dash = dashboard(&server, Duration::from_millis(100)).await;
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(dash.state().slices.len(), 1);
    dash.shutdown().await;
}

#[tokio::test]
async fn initial_fetch_failure_does_not_abort_session() {
    let server = MockServer::start().await;

    // The very first list fetch fails; the server recovers afterwards.
    Mock::given(method("GET"))
        .and(path("/api/slices"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_slices(&server, json!([slice_json("slice-a", "cctv")])).await;
    Mock::given(method("GET"))
        .and(path("/api/slices/slice-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(slice_json("slice-a", "cctv")))
        .mount(&server)
        .await;
    mount_alerts(&server, "slice-a", json!([])).await;

    let dash = dashboard(&server, Duration::from_millis(100)).await;
    assert!(dash.state().slices.is_empty());

    tokio::time::sleep(Duration::from_millis(300)).await;

    // The poll loop recovered and the auto-select rule still applied.
    let state = dash.state();
    assert_eq!(state.slices.len(), 1);
    assert_eq!(state.selected_id, Some(SliceId::new("slice-a")));

    dash.shutdown().await;
}

#[tokio::test]
async fn initial_fetch_failure_is_fatal_without_polling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/slices"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    // No poll loop means no retry behind the startup fetch.
    let base_url = Url::parse(&server.uri()).unwrap();
    let config = DashboardConfig::new(base_url).with_poll_interval(Duration::ZERO);
    let dash = Dashboard::new(config).unwrap();

    assert!(matches!(dash.start().await, Err(CoreError::Gateway(_))));
}

// ── Detail synchronizer ─────────────────────────────────────────────

#[tokio::test]
async fn detail_and_alerts_commit_together() {
    let server = MockServer::start().await;
    mount_slices(&server, json!([slice_json("slice-a", "cctv")])).await;
    Mock::given(method("GET"))
        .and(path("/api/slices/slice-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(slice_json("slice-a", "cctv")))
        .mount(&server)
        .await;
    mount_alerts(&server, "slice-a", json!([alert_json("al-1", "slice-a", false)])).await;

    let dash = manual_dashboard(&server).await;
    assert!(dash.state().detail_loading);

    let version_before = dash.state_version();
    dash.refresh_selected(&SliceId::new("slice-a")).await.unwrap();

    // Both halves land in a single state publish.
    assert_eq!(dash.state_version(), version_before + 1);
    let state = dash.state();
    assert_eq!(
        state.selected_detail.as_ref().map(|d| d.id.clone()),
        Some(SliceId::new("slice-a"))
    );
    assert_eq!(state.selected_alerts.len(), 1);
    assert!(!state.detail_loading);

    dash.shutdown().await;
}

#[tokio::test]
async fn failed_alert_half_commits_nothing() {
    let server = MockServer::start().await;
    mount_slices(&server, json!([slice_json("slice-a", "cctv")])).await;
    Mock::given(method("GET"))
        .and(path("/api/slices/slice-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(slice_json("slice-a", "cctv")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/slices/slice-a/alerts"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let dash = manual_dashboard(&server).await;
    let version_before = dash.state_version();

    let result = dash.refresh_selected(&SliceId::new("slice-a")).await;
    assert!(matches!(result, Err(CoreError::Gateway(_))));

    // Neither detail nor alerts moved; loading flag stays armed.
    assert_eq!(dash.state_version(), version_before);
    assert!(dash.state().selected_detail.is_none());
    assert!(dash.state().detail_loading);

    dash.shutdown().await;
}

#[tokio::test]
async fn stale_fetch_for_superseded_selection_is_discarded() {
    let server = MockServer::start().await;
    mount_slices(
        &server,
        json!([slice_json("slice-a", "cctv"), slice_json("slice-b", "iot")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/slices/slice-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(slice_json("slice-a", "cctv")))
        .mount(&server)
        .await;
    mount_alerts(&server, "slice-a", json!([alert_json("al-1", "slice-a", false)])).await;

    let dash = manual_dashboard(&server).await;

    // Selection moves to slice-b while a fetch issued for slice-a is
    // notionally in flight; its result must not be committed.
    dash.select_slice("slice-b");
    dash.refresh_selected(&SliceId::new("slice-a")).await.unwrap();

    let state = dash.state();
    assert_eq!(state.selected_id, Some(SliceId::new("slice-b")));
    assert!(state.selected_detail.is_none());
    assert!(state.selected_alerts.is_empty());

    dash.shutdown().await;
}

#[tokio::test]
async fn selection_switch_during_slow_fetch_ends_on_new_slice() {
    let server = MockServer::start().await;
    mount_slices(
        &server,
        json!([slice_json("slice-a", "cctv"), slice_json("slice-b", "iot")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/slices/slice-a"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(slice_json("slice-a", "cctv"))
                .set_delay(Duration::from_millis(250)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/slices/slice-b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(slice_json("slice-b", "iot")))
        .mount(&server)
        .await;
    mount_alerts(&server, "slice-a", json!([])).await;
    mount_alerts(&server, "slice-b", json!([alert_json("al-2", "slice-b", false)])).await;

    // Long interval: only the immediate per-selection fetches fire.
    let dash = dashboard(&server, Duration::from_secs(3600)).await;

    // slice-a was auto-selected and its slow fetch is in flight.
    tokio::time::sleep(Duration::from_millis(50)).await;
    dash.select_slice("slice-b");
    tokio::time::sleep(Duration::from_millis(500)).await;

    let state = dash.state();
    assert_eq!(state.selected_id, Some(SliceId::new("slice-b")));
    assert_eq!(
        state.selected_detail.as_ref().map(|d| d.id.clone()),
        Some(SliceId::new("slice-b"))
    );
    assert_eq!(state.selected_alerts.len(), 1);

    dash.shutdown().await;
}

#[tokio::test]
async fn clearing_selection_halts_detail_polling() {
    let server = MockServer::start().await;
    mount_slices(&server, json!([slice_json("slice-a", "cctv")])).await;
    Mock::given(method("GET"))
        .and(path("/api/slices/slice-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(slice_json("slice-a", "cctv")))
        .mount(&server)
        .await;
    mount_alerts(&server, "slice-a", json!([])).await;

    let dash = dashboard(&server, Duration::from_millis(100)).await;
    tokio::time::sleep(Duration::from_millis(250)).await;

    dash.clear_selection();
    tokio::time::sleep(Duration::from_millis(150)).await;

    let detail_requests_after_clear = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/api/slices/slice-a")
        .count();

    tokio::time::sleep(Duration::from_millis(300)).await;

    let detail_requests_later = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/api/slices/slice-a")
        .count();
    assert_eq!(detail_requests_later, detail_requests_after_clear);

    let state = dash.state();
    assert_eq!(state.selected_id, None);
    assert!(state.selected_detail.is_none());

    dash.shutdown().await;
}

// ── Mutation coordinator ────────────────────────────────────────────

#[tokio::test]
async fn create_slice_sends_devices_verbatim_and_wins_selection() {
    let server = MockServer::start().await;
    mount_slices(&server, json!([slice_json("slice-a", "cctv")])).await;

    let created = json!({
        "id": "drone-fleet-3fa2c1",
        "name": "drone-fleet",
        "tenant": "city-ops",
        "qos_class": "gold",
        "status": "provisioning",
        "devices": ["drone-1", "drone-2"],
        "metrics": []
    });
    Mock::given(method("POST"))
        .and(path("/api/slices"))
        .and(body_json(json!({
            "name": "drone-fleet",
            "tenant": "city-ops",
            "qos_class": "gold",
            "devices": ["drone-1", "drone-2", "drone-2"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(created))
        .expect(1)
        .mount(&server)
        .await;

    let dash = manual_dashboard(&server).await;
    assert_eq!(dash.selection(), Some(SliceId::new("slice-a")));

    let outcome = dash
        .execute(Command::CreateSlice(CreateSliceRequest {
            name: "drone-fleet".into(),
            tenant: "city-ops".into(),
            qos_class: QosClass::Gold,
            devices: CreateSliceRequest::parse_devices("drone-1, drone-2, drone-2, "),
        }))
        .await
        .unwrap();

    let CommandOutcome::Slice(detail) = outcome else {
        panic!("expected slice outcome");
    };
    assert_eq!(detail.id, SliceId::new("drone-fleet-3fa2c1"));

    // Optimistic append and user action winning the selection.
    let state = dash.state();
    assert_eq!(state.slices.len(), 2);
    assert_eq!(state.selected_id, Some(SliceId::new("drone-fleet-3fa2c1")));
    assert!(state.detail_loading);

    dash.shutdown().await;
}

#[tokio::test]
async fn create_slice_with_blank_name_is_rejected_locally() {
    let server = MockServer::start().await;
    mount_slices(&server, json!([])).await;
    Mock::given(method("POST"))
        .and(path("/api/slices"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let dash = manual_dashboard(&server).await;
    let result = dash
        .execute(Command::CreateSlice(CreateSliceRequest {
            name: "   ".into(),
            tenant: "city-ops".into(),
            qos_class: QosClass::Bronze,
            devices: Vec::new(),
        }))
        .await;

    assert!(matches!(result, Err(CoreError::Validation { .. })));
    assert!(dash.state().slices.is_empty());

    dash.shutdown().await;
}

#[tokio::test]
async fn add_device_with_blank_id_issues_no_request() {
    let server = MockServer::start().await;
    mount_slices(&server, json!([slice_json("slice-a", "cctv")])).await;
    Mock::given(method("POST"))
        .and(path("/api/slices/slice-a/devices"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dash = manual_dashboard(&server).await;
    let outcome = dash
        .execute(Command::AddDevice {
            slice_id: SliceId::new("slice-a"),
            device_id: "   ".into(),
        })
        .await
        .unwrap();

    assert!(matches!(outcome, CommandOutcome::Skipped));
    dash.shutdown().await;
}

#[tokio::test]
async fn add_device_against_unselected_slice_is_skipped() {
    let server = MockServer::start().await;
    mount_slices(
        &server,
        json!([slice_json("slice-a", "cctv"), slice_json("slice-b", "iot")]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/slices/slice-b/devices"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dash = manual_dashboard(&server).await;
    // slice-a is selected; a write aimed at slice-b is a silent no-op.
    let outcome = dash
        .execute(Command::AddDevice {
            slice_id: SliceId::new("slice-b"),
            device_id: "sensor-9".into(),
        })
        .await
        .unwrap();

    assert!(matches!(outcome, CommandOutcome::Skipped));
    dash.shutdown().await;
}

#[tokio::test]
async fn add_device_refetches_detail_once() {
    let server = MockServer::start().await;
    mount_slices(&server, json!([slice_json("slice-a", "cctv")])).await;

    let updated = json!({
        "id": "slice-a",
        "name": "cctv",
        "tenant": "city-ops",
        "qos_class": "gold",
        "status": "active",
        "devices": ["cam-1", "cam-2"],
        "metrics": []
    });
    Mock::given(method("POST"))
        .and(path("/api/slices/slice-a/devices"))
        .and(body_json(json!({ "device_id": "cam-2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/slices/slice-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .expect(1)
        .mount(&server)
        .await;

    let dash = manual_dashboard(&server).await;
    let outcome = dash
        .execute(Command::AddDevice {
            slice_id: SliceId::new("slice-a"),
            device_id: " cam-2 ".into(),
        })
        .await
        .unwrap();

    assert!(matches!(outcome, CommandOutcome::Applied));
    let detail = dash.state().selected_detail.clone().unwrap();
    assert_eq!(detail.devices, vec!["cam-1", "cam-2"]);

    dash.shutdown().await;
}

#[tokio::test]
async fn trigger_alert_refetches_alert_list() {
    let server = MockServer::start().await;
    mount_slices(&server, json!([slice_json("slice-a", "cctv")])).await;
    Mock::given(method("POST"))
        .and(path("/api/slices/slice-a/alerts"))
        .and(body_json(json!({
            "title": "latency breach",
            "description": "p99 above budget",
            "severity": "critical"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(alert_json("al-9", "slice-a", false)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/slices/slice-a/alerts"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([alert_json("al-9", "slice-a", false)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dash = manual_dashboard(&server).await;
    let outcome = dash
        .execute(Command::TriggerAlert(TriggerAlertRequest {
            slice_id: SliceId::new("slice-a"),
            title: "latency breach".into(),
            description: "p99 above budget".into(),
            severity: slicewatch_core::AlertSeverity::Critical,
        }))
        .await
        .unwrap();

    assert!(matches!(outcome, CommandOutcome::Alert(_)));
    assert_eq!(dash.state().selected_alerts.len(), 1);

    dash.shutdown().await;
}

#[tokio::test]
async fn resolve_alert_refetches_alerts_but_not_detail() {
    let server = MockServer::start().await;
    mount_slices(&server, json!([slice_json("slice-a", "cctv")])).await;
    Mock::given(method("POST"))
        .and(path("/api/alerts/al-1/resolve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alert_json("al-1", "slice-a", true)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/slices/slice-a/alerts"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([alert_json("al-1", "slice-a", true)])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/slices/slice-a"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dash = manual_dashboard(&server).await;
    let outcome = dash
        .execute(Command::ResolveAlert {
            alert_id: slicewatch_core::AlertId::new("al-1"),
        })
        .await
        .unwrap();

    let CommandOutcome::Alert(alert) = outcome else {
        panic!("expected alert outcome");
    };
    assert!(alert.resolved);
    assert!(dash.state().selected_alerts[0].resolved);

    dash.shutdown().await;
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn commands_fail_after_shutdown() {
    let server = MockServer::start().await;
    mount_slices(&server, json!([])).await;

    let dash = manual_dashboard(&server).await;
    dash.shutdown().await;

    let result = dash
        .execute(Command::ResolveAlert {
            alert_id: slicewatch_core::AlertId::new("al-1"),
        })
        .await;
    assert!(matches!(result, Err(CoreError::EngineStopped)));
}

#[tokio::test]
async fn oneshot_runs_and_tears_down() {
    let server = MockServer::start().await;
    mount_slices(&server, json!([slice_json("slice-a", "cctv")])).await;

    let base_url = Url::parse(&server.uri()).unwrap();
    let names = Dashboard::oneshot(DashboardConfig::new(base_url), |dash| async move {
        Ok(dash
            .state()
            .slices
            .iter()
            .map(|s| s.name.clone())
            .collect::<Vec<_>>())
    })
    .await
    .unwrap();

    assert_eq!(names, vec!["cctv"]);
}
