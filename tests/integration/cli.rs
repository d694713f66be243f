//! Command-line entry tests: argument validation and configuration failures

use crate::mock_server::MockServerFixture;
use clap::Parser;
use langflow_client::app::{self, Args, USAGE_HINT};
use langflow_client::{Error, InMemorySink};
use mockito::Matcher;
use std::sync::Arc;

#[tokio::test]
async fn test_missing_message_is_a_usage_error_without_network() {
    let mut fixture = MockServerFixture::new().await;
    let never = fixture
        .server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let sink = Arc::new(InMemorySink::new());
    let args = Args::parse_from(["langflow-run"]);
    let err = app::run_with_config(&args, &fixture.config(), sink.clone())
        .await
        .unwrap_err();

    match err {
        Error::Usage(hint) => assert_eq!(hint, USAGE_HINT),
        other => panic!("expected usage error, got {:?}", other),
    }
    assert!(sink.is_empty());
    never.assert_async().await;
}

#[tokio::test]
async fn test_missing_message_short_circuits_config_loading() {
    let sink = Arc::new(InMemorySink::new());
    let args = Args::parse_from(["langflow-run", "--config", "/nonexistent/langflow.yaml"]);

    let err = app::run(&args, sink.clone()).await.unwrap_err();

    assert!(matches!(err, Error::Usage(_)));
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_missing_token_is_written_as_main_error() {
    let fixture = MockServerFixture::new().await;
    let mut config = fixture.config();
    config.token = None;

    let sink = Arc::new(InMemorySink::new());
    let args = Args::parse_from(["langflow-run", "hello"]);
    app::run_with_config(&args, &config, sink.clone())
        .await
        .unwrap();

    assert_eq!(
        sink.lines(),
        vec![
            "Main Error: Configuration error: Missing application token \
             (field: token, source: client_builder)"
        ]
    );
}

#[tokio::test]
async fn test_invalid_config_file_is_written_as_main_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("langflow.yaml");
    std::fs::write(&path, "flow_id: [unclosed\n").unwrap();

    let sink = Arc::new(InMemorySink::new());
    let config_arg = path.to_string_lossy().into_owned();
    let args = Args::parse_from(["langflow-run", "hello", "--config", config_arg.as_str()]);
    app::run(&args, sink.clone()).await.unwrap();

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(
        lines[0].starts_with("Main Error: Configuration error: Invalid config YAML"),
        "{}",
        lines[0]
    );
}
