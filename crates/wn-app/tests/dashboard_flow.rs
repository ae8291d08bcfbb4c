//! State machine behaviour of the dashboard controller.

use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use proptest::prelude::*;
use wn_app::*;
use wn_client::{AnalysisBackend, ClientError, ClientResult};
use wn_core::{AnalysisRequest, AnalysisResult, NodeResult, NodeStatus};

/// Backend returning a canned outcome and counting calls.
struct MockBackend {
    outcome: ClientResult<AnalysisResult>,
    calls: AtomicUsize,
    last_request: Mutex<Option<AnalysisRequest>>,
}

impl MockBackend {
    fn returning(outcome: ClientResult<AnalysisResult>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AnalysisBackend for MockBackend {
    fn run_analysis(&self, request: &AnalysisRequest) -> ClientResult<AnalysisResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.outcome.clone()
    }
}

fn node(id: &str, status: &str) -> NodeResult {
    NodeResult {
        node_id: id.to_string(),
        pressure_base_m: 30.0,
        pressure_closed_m: 20.0,
        drop_m: 10.0,
        pressure_base_bar: 2.94,
        pressure_closed_bar: 1.96,
        drop_bar: 0.98,
        status: NodeStatus::from(status),
        x: None,
        y: None,
    }
}

fn sample_result(used_time: f64) -> AnalysisResult {
    AnalysisResult {
        used_time,
        mean_pressure_base: 30.0,
        mean_pressure_closed: 20.0,
        mean_drop: 10.0,
        top_impacted_nodes: vec![node("J1", "RENDAH")],
        all_nodes: vec![node("J1", "RENDAH"), node("J2", "OK")],
        pressure_maps_image: String::new(),
        impact_map_image: String::new(),
        csv_data: "node_id,status\nJ1,RENDAH\nJ2,OK\n".to_string(),
    }
}

fn inp_bytes() -> io::Result<Vec<u8>> {
    Ok(b"[JUNCTIONS]\n J1 10\n".to_vec())
}

fn loaded_dashboard() -> Dashboard {
    let mut dashboard = Dashboard::new();
    let outcome = dashboard.upload(UploadSource::Picker, "net.inp", inp_bytes);
    assert_eq!(outcome, UploadOutcome::Accepted);
    dashboard
}

#[test]
fn starts_idle_and_not_submittable() {
    let dashboard = Dashboard::new();
    assert_eq!(dashboard.state(), DashboardState::Idle);
    assert!(!dashboard.can_submit());
    assert!(dashboard.error().is_none());
    assert_eq!(dashboard.config(), &wn_core::AnalysisConfig::default());
}

#[test]
fn upload_moves_to_file_loaded() {
    let dashboard = loaded_dashboard();
    assert_eq!(dashboard.state(), DashboardState::FileLoaded);
    let file = dashboard.uploaded_file().unwrap();
    assert_eq!(file.filename(), "net.inp");
    assert_eq!(file.content(), "[JUNCTIONS]\n J1 10\n");
    assert!(dashboard.can_submit());
}

#[test]
fn submit_without_file_is_validation_error() {
    let mut dashboard = Dashboard::new();
    let backend = MockBackend::returning(Ok(sample_result(3600.0)));

    let report = dashboard.submit_with(&backend);
    match report {
        SubmitReport::Rejected(notice) => {
            assert_eq!(notice.kind, ErrorKind::Validation);
            assert_eq!(notice.message, "Please upload an INP file first");
        }
        other => panic!("unexpected report: {other:?}"),
    }
    assert_eq!(backend.calls(), 0);
    assert!(!dashboard.is_in_flight());
    assert_eq!(dashboard.state(), DashboardState::Idle);
    assert_eq!(
        dashboard.error().map(|e| e.message.as_str()),
        Some("Please upload an INP file first")
    );
}

#[test]
fn successful_submit_stores_result_verbatim() {
    let mut dashboard = loaded_dashboard();
    let expected = sample_result(7200.0);
    let backend = MockBackend::returning(Ok(expected.clone()));

    assert_eq!(dashboard.submit_with(&backend), SubmitReport::Completed);
    assert_eq!(backend.calls(), 1);
    assert_eq!(dashboard.state(), DashboardState::Resulted);

    let received = dashboard.result().unwrap();
    assert_eq!(received.result, expected);
    assert_eq!(received.filename, "net.inp");
    assert_eq!(received.pipe_to_close, "P1106");
}

#[test]
fn default_config_is_sent_unmodified() {
    let mut dashboard = loaded_dashboard();
    let backend = MockBackend::returning(Ok(sample_result(3600.0)));
    dashboard.submit_with(&backend);

    let request = backend.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(request.inp_content, "[JUNCTIONS]\n J1 10\n");
    assert_eq!(request.pipe_to_close, "P1106");
    assert_eq!(request.time_sec, Some(3600.0));
    assert_eq!(request.top_n, Some(20.0));
    assert_eq!(request.ok_bar_min, Some(3.0));
    assert_eq!(request.very_low_max, Some(1.0));
}

#[test]
fn submit_while_in_flight_is_a_no_op() {
    let mut dashboard = loaded_dashboard();
    let backend = MockBackend::returning(Ok(sample_result(3600.0)));

    let pending = match dashboard.begin_submit() {
        SubmitOutcome::Started(pending) => pending,
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert_eq!(dashboard.state(), DashboardState::InFlight);
    assert!(!dashboard.can_submit());

    assert_eq!(dashboard.submit_with(&backend), SubmitReport::Busy);
    assert!(matches!(dashboard.begin_submit(), SubmitOutcome::Busy));

    // Only the first submission reaches the backend.
    let outcome = backend.run_analysis(&pending.request);
    assert!(dashboard.complete_submit(pending.id, outcome));
    assert_eq!(backend.calls(), 1);
    assert_eq!(dashboard.state(), DashboardState::Resulted);
}

#[test]
fn remote_failure_keeps_previous_result() {
    let mut dashboard = loaded_dashboard();
    let first = sample_result(3600.0);
    dashboard.submit_with(&MockBackend::returning(Ok(first.clone())));

    let failing = MockBackend::returning(Err(ClientError::Rejected("boom".to_string())));
    let report = dashboard.submit_with(&failing);

    match report {
        SubmitReport::Failed(notice) => {
            assert_eq!(notice.message, "boom");
            assert_eq!(notice.kind, ErrorKind::Application);
        }
        other => panic!("unexpected report: {other:?}"),
    }
    assert_eq!(dashboard.state(), DashboardState::Resulted);
    assert_eq!(dashboard.result().unwrap().result, first);
    assert_eq!(dashboard.error().unwrap().message, "boom");
}

#[test]
fn transport_failure_returns_to_file_loaded() {
    let mut dashboard = loaded_dashboard();
    let failing = MockBackend::returning(Err(ClientError::Transport(
        "error sending request: connection refused".to_string(),
    )));

    dashboard.submit_with(&failing);
    assert_eq!(dashboard.state(), DashboardState::FileLoaded);
    let notice = dashboard.error().unwrap();
    assert_eq!(notice.kind, ErrorKind::Transport);
    assert_eq!(notice.message, "error sending request: connection refused");
}

#[test]
fn fallback_message_when_service_is_silent() {
    let mut dashboard = loaded_dashboard();
    let failing = MockBackend::returning(wn_client::unwrap_envelope(wn_core::AnalysisResponse {
        success: false,
        data: None,
        error: None,
    }));
    dashboard.submit_with(&failing);
    assert_eq!(dashboard.error().unwrap().message, "Analysis failed");
}

#[test]
fn new_upload_clears_stale_result_and_error() {
    let mut dashboard = loaded_dashboard();
    dashboard.submit_with(&MockBackend::returning(Ok(sample_result(3600.0))));
    assert_eq!(dashboard.state(), DashboardState::Resulted);

    dashboard.submit_with(&MockBackend::returning(Err(ClientError::Rejected(
        "boom".to_string(),
    ))));
    assert!(dashboard.error().is_some());

    let outcome = dashboard.upload(UploadSource::Drop, "other.inp", inp_bytes);
    assert_eq!(outcome, UploadOutcome::Accepted);
    assert_eq!(dashboard.state(), DashboardState::FileLoaded);
    assert!(dashboard.result().is_none());
    assert!(dashboard.error().is_none());
    assert_eq!(dashboard.uploaded_file().unwrap().filename(), "other.inp");
}

#[test]
fn read_failure_sets_error_and_keeps_file() {
    let mut dashboard = loaded_dashboard();
    let outcome = dashboard.upload(UploadSource::Picker, "broken.inp", || {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
    });

    assert_eq!(outcome, UploadOutcome::Ignored);
    let notice = dashboard.error().unwrap();
    assert_eq!(notice.kind, ErrorKind::FileRead);
    assert_eq!(notice.message, "Failed to read file");
    assert_eq!(dashboard.uploaded_file().unwrap().filename(), "net.inp");
    assert_eq!(dashboard.state(), DashboardState::FileLoaded);
}

#[test]
fn read_failure_from_idle_stays_idle() {
    let mut dashboard = Dashboard::new();
    dashboard.upload(UploadSource::Drop, "net.inp", || Ok(vec![0xc3, 0x28]));
    assert_eq!(dashboard.state(), DashboardState::Idle);
    assert_eq!(dashboard.error().unwrap().kind, ErrorKind::FileRead);
}

#[test]
fn dismiss_clears_only_the_message() {
    let mut dashboard = loaded_dashboard();
    dashboard.submit_with(&MockBackend::returning(Err(ClientError::Rejected(
        "boom".to_string(),
    ))));
    dashboard.dismiss_error();
    assert!(dashboard.error().is_none());
    assert_eq!(dashboard.state(), DashboardState::FileLoaded);
}

#[test]
fn reset_returns_to_idle_and_drops_pending_outcome() {
    let mut dashboard = loaded_dashboard();
    let pending = match dashboard.begin_submit() {
        SubmitOutcome::Started(pending) => pending,
        other => panic!("unexpected outcome: {other:?}"),
    };

    let mut config = dashboard.config().clone();
    config.pipe_to_close = "P7".to_string();
    dashboard.replace_config(config);

    dashboard.reset();
    assert_eq!(dashboard.state(), DashboardState::Idle);
    assert!(dashboard.uploaded_file().is_none());

    let applied = dashboard.complete_submit(pending.id, Ok(sample_result(3600.0)));
    assert!(!applied);
    assert!(dashboard.result().is_none());
    // configuration survives a reset
    assert_eq!(dashboard.config().pipe_to_close, "P7");
}

#[test]
fn upload_is_ignored_while_in_flight() {
    let mut dashboard = loaded_dashboard();
    let _pending = dashboard.begin_submit();
    let outcome = dashboard.upload(UploadSource::Picker, "other.inp", inp_bytes);
    assert_eq!(outcome, UploadOutcome::Ignored);
    assert_eq!(dashboard.uploaded_file().unwrap().filename(), "net.inp");
}

#[test]
fn edited_config_with_nan_is_sent_as_is() {
    let mut dashboard = loaded_dashboard();
    let edited = dashboard
        .config_holder()
        .with_field_text(ConfigField::TimeSec, "soon");
    dashboard.replace_config(edited);

    let backend = MockBackend::returning(Err(ClientError::Rejected(
        "int() argument must be a string".to_string(),
    )));
    let report = dashboard.submit_with(&backend);

    assert!(matches!(report, SubmitReport::Failed(_)));
    let request = backend.last_request.lock().unwrap().clone().unwrap();
    assert!(request.time_sec.unwrap().is_nan());
}

#[test]
fn values_below_field_minimums_are_sent_as_nan() {
    let mut dashboard = loaded_dashboard();
    for (field, text) in [
        (ConfigField::TopN, "0"),
        (ConfigField::TimeSec, "-3600"),
        (ConfigField::OkBarMin, "-2.5"),
    ] {
        let edited = dashboard.config_holder().with_field_text(field, text);
        dashboard.replace_config(edited);
    }

    let backend = MockBackend::returning(Ok(sample_result(3600.0)));
    dashboard.submit_with(&backend);

    let request = backend.last_request.lock().unwrap().clone().unwrap();
    assert!(request.top_n.unwrap().is_nan());
    assert!(request.time_sec.unwrap().is_nan());
    assert!(request.ok_bar_min.unwrap().is_nan());
    assert_eq!(request.very_low_max, Some(1.0));

    let body = serde_json::to_value(&request).unwrap();
    assert!(body["topN"].is_null());
    assert!(body["timeSec"].is_null());
    assert!(body["okBarMin"].is_null());
}

#[test]
fn reported_error_uses_the_single_message_slot() {
    let mut dashboard = loaded_dashboard();
    dashboard.report_error(&AppError::Client(ClientError::Setup(
        "no TLS backend".to_string(),
    )));

    let notice = dashboard.error().unwrap();
    assert_eq!(notice.kind, ErrorKind::Transport);
    assert_eq!(notice.message, "Failed to set up HTTP client: no TLS backend");
    assert_eq!(dashboard.state(), DashboardState::FileLoaded);

    dashboard.submit_with(&MockBackend::returning(Err(ClientError::Rejected(
        "boom".to_string(),
    ))));
    assert_eq!(dashboard.error().unwrap().message, "boom");
}

proptest! {
    #[test]
    fn dropped_non_inp_files_leave_state_unchanged(name in "[a-zA-Z0-9_.]{0,12}") {
        prop_assume!(!name.ends_with(".inp"));

        let mut dashboard = loaded_dashboard();
        dashboard.submit_with(&MockBackend::returning(Ok(sample_result(3600.0))));
        let before_file = dashboard.uploaded_file().cloned();
        let before_state = dashboard.state();

        for _ in 0..2 {
            let outcome = dashboard.upload(UploadSource::Drop, &name, inp_bytes);
            prop_assert_eq!(outcome, UploadOutcome::Ignored);
            prop_assert_eq!(dashboard.uploaded_file().cloned(), before_file.clone());
            prop_assert_eq!(dashboard.state(), before_state);
            prop_assert!(dashboard.error().is_none());
        }
    }
}
