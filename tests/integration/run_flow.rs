//! Orchestrator and CLI output tests

use crate::mock_server::{
    final_answer, streaming_answer, MockServerFixture, Recorder, FLOW_ID, LANGFLOW_ID,
};
use clap::Parser;
use langflow_client::app::{self, Args};
use langflow_client::{FileSink, FlowRunRequest, InMemorySink, OutputSink};
use mockito::Matcher;
use serde_json::json;
use std::sync::Arc;

const STREAM_PATH: &str = "/api/v1/build/job-1/events";

fn args(argv: &[&str]) -> Args {
    Args::parse_from(std::iter::once("langflow-run").chain(argv.iter().copied()))
}

#[tokio::test]
async fn test_non_streaming_run_writes_final_output() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_run(false, 200, &final_answer("Hello there")).await;

    let sink = Arc::new(InMemorySink::new());
    app::run_with_config(&args(&["hi"]), &fixture.config(), sink.clone())
        .await
        .unwrap();

    assert_eq!(sink.lines(), vec!["Final Output: Hello there"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_streaming_run_writes_output_file() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_run(false, 200, &final_answer("X")).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output.html");
    std::fs::write(&path, "stale content from a previous run\n").unwrap();

    let sink: Arc<dyn OutputSink> = Arc::new(FileSink::new(&path));
    app::run_with_config(&args(&["hi"]), &fixture.config(), sink)
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "Final Output: X\n");
}

#[tokio::test]
async fn test_streaming_run_appends_callback_lines() {
    let mut fixture = MockServerFixture::new().await;
    let stream_url = fixture.url(STREAM_PATH);
    let _mock = fixture.mock_run(true, 200, &streaming_answer(&stream_url)).await;
    let events = fixture
        .mock_event_stream(STREAM_PATH, &[r#"data: {"chunk":"hi"}"#, "event: close\ndata: {}"])
        .await;

    let sink = Arc::new(InMemorySink::new());
    app::run_with_config(
        &args(&["hi", "chat", "chat", "true"]),
        &fixture.config(),
        sink.clone(),
    )
    .await
    .unwrap();

    assert_eq!(
        sink.lines(),
        vec!["Received: hi", "Stream Closed: Stream closed"]
    );
    events.assert_async().await;
}

#[tokio::test]
async fn test_streaming_without_stream_url_is_a_no_op() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_run(true, 200, &final_answer("ignored")).await;
    let stray = fixture
        .server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let recorder = Recorder::default();
    let run = fixture
        .client()
        .run_flow(
            FlowRunRequest::new(FLOW_ID, LANGFLOW_ID, "hi").stream(true),
            recorder.handler(),
        )
        .await
        .unwrap();

    assert!(!run.is_streaming());
    assert_eq!(run.response.session_id(), Some("session-1"));
    assert!(recorder.calls().is_empty());
    stray.assert_async().await;
}

#[tokio::test]
async fn test_non_streaming_run_never_attaches() {
    let mut fixture = MockServerFixture::new().await;
    let stream_url = fixture.url(STREAM_PATH);
    let _mock = fixture
        .mock_run(false, 200, &streaming_answer(&stream_url))
        .await;
    let stray = fixture
        .server
        .mock("GET", STREAM_PATH)
        .expect(0)
        .create_async()
        .await;

    let recorder = Recorder::default();
    let run = fixture
        .client()
        .run_flow(
            FlowRunRequest::new(FLOW_ID, LANGFLOW_ID, "hi"),
            recorder.handler(),
        )
        .await
        .unwrap();

    assert!(run.stream.is_none());
    assert_eq!(run.response.stream_url(), Some(stream_url.as_str()));
    stray.assert_async().await;
}

#[tokio::test]
async fn test_initiation_error_propagates_without_callbacks() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_run(true, 401, &json!({"detail": "Invalid token"}))
        .await;

    let recorder = Recorder::default();
    let err = fixture
        .client()
        .run_flow(
            FlowRunRequest::new(FLOW_ID, LANGFLOW_ID, "hi").stream(true),
            recorder.handler(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn test_run_failure_is_written_as_main_error() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_run(false, 404, &json!({"detail": "Flow not found"}))
        .await;

    let sink = Arc::new(InMemorySink::new());
    app::run_with_config(&args(&["hi"]), &fixture.config(), sink.clone())
        .await
        .unwrap();

    assert_eq!(
        sink.lines(),
        vec![r#"Main Error: 404 Not Found - {"detail":"Flow not found"}"#]
    );
}

#[tokio::test]
async fn test_missing_message_text_is_written_as_main_error() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_run(false, 200, &json!({"outputs": []}))
        .await;

    let sink = Arc::new(InMemorySink::new());
    app::run_with_config(&args(&["hi"]), &fixture.config(), sink.clone())
        .await
        .unwrap();

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(
        lines[0].starts_with("Main Error: Response schema error"),
        "{}",
        lines[0]
    );
}

#[tokio::test]
async fn test_null_entries_in_outputs_still_yield_final_output() {
    for body in [
        json!({"outputs": [{"outputs": [
            {"outputs": {"message": {"message": {"text": "X"}}}},
            null
        ]}]}),
        json!({"outputs": [
            {"outputs": [{"outputs": {"message": {"message": {"text": "X"}}}}]},
            {"outputs": null}
        ]}),
    ] {
        let mut fixture = MockServerFixture::new().await;
        let _mock = fixture.mock_run(false, 200, &body).await;

        let sink = Arc::new(InMemorySink::new());
        app::run_with_config(&args(&["hi"]), &fixture.config(), sink.clone())
            .await
            .unwrap();

        assert_eq!(sink.lines(), vec!["Final Output: X"], "body: {}", body);
    }
}
