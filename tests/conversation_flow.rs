//! End-to-end conversation flow tests
//!
//! These drive AppState through the real backend worker against a mock
//! server: upload, query, reply placement, the busy flag and the exact
//! user-facing error texts.

use docchat::backend::{BackendClient, BackendPipeline, Document};
use docchat::config::AppConfig;
use docchat::messages::MessageKind;
use docchat::ui::AppState;
use serde_json::json;
use std::time::{Duration, Instant};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// AppState wired to a live worker pointed at `server_url`.
fn connected_state(server_url: &str) -> AppState {
    let config = AppConfig::default().with_server_url(server_url);
    let client = BackendClient::new(&config.server_url).expect("server url should parse");

    let pipeline = BackendPipeline::new(client);
    let command_tx = pipeline.command_sender();
    let event_rx = pipeline.event_receiver();
    pipeline.start_worker().expect("worker should start");

    let mut state = AppState::new(config);
    state.connect_backend(command_tx, event_rx);
    state
}

/// Poll events until `done` holds, mirroring the per-frame drain.
async fn poll_until(state: &mut AppState, done: impl Fn(&AppState) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        state.poll_events();
        if done(state) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met within 5s");
}

fn log_contents(state: &AppState) -> Vec<String> {
    state
        .log
        .entries()
        .iter()
        .map(|m| m.content.clone())
        .collect()
}

#[tokio::test]
async fn upload_replaces_the_log_and_installs_the_document() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "document_id": "d1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let file_path = dir.path().join("report.pdf");
    std::fs::write(&file_path, b"%PDF-1.4 test").expect("write test file");

    let mut state = connected_state(&server.uri());
    state.upload_document(file_path);
    assert!(state.is_uploading());

    poll_until(&mut state, |s| !s.is_processing()).await;

    assert_eq!(
        log_contents(&state),
        vec!["Document uploaded successfully. You can now ask questions about it."]
    );
    assert_eq!(state.log.entries()[0].kind, MessageKind::System);
    assert_eq!(state.document, Some(Document::new("d1", "report.pdf")));
}

#[tokio::test]
async fn failed_upload_appends_a_contextualized_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "detail": "Error processing document"
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let file_path = dir.path().join("broken.pdf");
    std::fs::write(&file_path, b"junk").expect("write test file");

    let mut state = connected_state(&server.uri());
    state.upload_document(file_path);

    poll_until(&mut state, |s| !s.is_processing()).await;

    assert_eq!(state.document, None);
    assert_eq!(
        log_contents(&state),
        vec!["Error uploading document: Error processing document"]
    );
    assert_eq!(state.log.entries()[0].kind, MessageKind::Error);
}

#[tokio::test]
async fn query_round_trip_keeps_the_audio_url_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_partial_json(json!({
            "text": "What is the total?",
            "document_id": "d1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "assistant",
            "response": "$42",
            "audio_url": "audio_output/tts_1.wav"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut state = connected_state(&server.uri());
    state.document = Some(Document::new("d1", "report.pdf"));

    state.input_text = "What is the total?".to_string();
    state.submit_query();

    // The user message lands synchronously, before any response.
    assert_eq!(log_contents(&state), vec!["What is the total?"]);
    assert!(state.awaiting_reply());

    poll_until(&mut state, |s| !s.is_processing()).await;

    assert_eq!(log_contents(&state), vec!["What is the total?", "$42"]);
    assert_eq!(state.log.entries()[1].kind, MessageKind::Assistant);
    assert_eq!(
        state.log.entries()[1].audio_url.as_deref(),
        Some("audio_output/tts_1.wav")
    );
    assert!(state.input_text.is_empty());
}

#[tokio::test]
async fn backend_error_detail_reaches_the_log_with_context() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "detail": "LLM unavailable"
        })))
        .mount(&server)
        .await;

    let mut state = connected_state(&server.uri());
    state.document = Some(Document::new("d1", "report.pdf"));

    state.input_text = "q1".to_string();
    state.submit_query();

    poll_until(&mut state, |s| !s.is_processing()).await;

    assert_eq!(
        log_contents(&state),
        vec!["q1", "Error processing query: LLM unavailable"]
    );
    assert_eq!(state.log.entries()[1].kind, MessageKind::Error);
}

#[tokio::test]
async fn unreachable_backend_reports_no_response() {
    let mut state = connected_state("http://127.0.0.1:1");
    state.document = Some(Document::new("d1", "report.pdf"));

    state.input_text = "q1".to_string();
    state.submit_query();

    poll_until(&mut state, |s| !s.is_processing()).await;

    assert_eq!(
        log_contents(&state),
        vec![
            "q1",
            "Error processing query: No response from server. Please check if the backend is running."
        ]
    );
}

#[tokio::test]
async fn query_without_document_never_touches_the_network() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut state = connected_state(&server.uri());
    state.input_text = "What is the total?".to_string();
    state.submit_query();

    assert_eq!(log_contents(&state), vec!["Please upload a document first."]);
    assert_eq!(state.log.entries()[0].kind, MessageKind::Error);
    assert!(!state.is_processing());

    // Give a stray request time to hit the mock before expectations verify.
    tokio::time::sleep(Duration::from_millis(200)).await;
}

#[tokio::test]
async fn overlapping_replies_are_placed_by_submission_order() {
    let server = MockServer::start().await;

    // First reply is slow, second is fast; arrival order inverts.
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_partial_json(json!({"text": "q1"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(400))
                .set_body_json(json!({"response": "a1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_partial_json(json!({"text": "q2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "a2"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut state = connected_state(&server.uri());
    state.document = Some(Document::new("d1", "report.pdf"));

    state.input_text = "q1".to_string();
    state.submit_query();
    state.input_text = "q2".to_string();
    state.submit_query();

    poll_until(&mut state, |s| !s.is_processing()).await;

    assert_eq!(log_contents(&state), vec!["q1", "a1", "q2", "a2"]);
}

#[tokio::test]
async fn reply_audio_fetch_failures_stay_in_the_status_line() {
    let server = MockServer::start().await;

    // 404 on the audio path; the conversation log must stay clean.
    let mut state = connected_state(&server.uri());
    state.request_audio("audio_output/gone.wav");

    poll_until(&mut state, |s| s.last_error.is_some()).await;

    assert!(state.log.is_empty());
    assert_eq!(state.last_error.as_deref(), Some("Error: 404"));
}
