// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! VisionClient against the in-process mock service

use serde_json::json;
use std::io::Write;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use vision_quickstart::vision::{
    Detail, ImageSource, OperationStatus, PollOutcome, PollPolicy, TextRecognitionMode,
    VisionClient, VisionConfig, VisionError, VisionService, VisualFeature,
};

use super::mock_server::{MockVisionServer, API_KEY, OPERATION_ID};

fn client_for(server: &MockVisionServer, key: &str) -> VisionClient {
    let mut config = VisionConfig::new(key, "westus");
    config.endpoint_override = Some(server.endpoint.clone());
    config.request_timeout_secs = 5;
    config.poll = PollPolicy::fixed(Duration::from_millis(10)).with_max_attempts(20);
    VisionClient::new(&config).unwrap()
}

fn remote() -> ImageSource {
    ImageSource::Remote("https://example.com/images/landmark.jpg".to_string())
}

#[tokio::test]
async fn test_analyze_remote_sends_url_and_features() {
    let server = MockVisionServer::start().await;
    server.state.set_analysis(json!({
        "description": {"tags": [], "captions": [{"text": "a tall tower", "confidence": 0.93}]},
        "categories": [{"name": "building_", "score": 0.8,
            "detail": {"landmarks": [{"name": "Space Needle", "confidence": 0.99}]}}]
    }));
    let client = client_for(&server, API_KEY);

    let analysis = client
        .analyze(
            &remote(),
            &[VisualFeature::Description, VisualFeature::Categories],
            &[Detail::Landmarks],
        )
        .await
        .unwrap();

    assert_eq!(analysis.captions()[0].text, "a tall tower");
    assert_eq!(analysis.landmarks().next().unwrap().name, "Space Needle");

    let requests = server.state.recorded();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.path, "analyze");
    assert_eq!(request.query["visualFeatures"], "Description,Categories");
    assert_eq!(request.query["details"], "Landmarks");
    assert_eq!(request.query["language"], "en");
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body["url"], "https://example.com/images/landmark.jpg");
}

#[tokio::test]
async fn test_analyze_local_uploads_bytes() {
    let server = MockVisionServer::start().await;
    let client = client_for(&server, API_KEY);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"\xFF\xD8\xFFfake-jpeg-bytes").unwrap();
    let source = ImageSource::Local(file.path().to_path_buf());

    let analysis = client
        .analyze(&source, &[VisualFeature::Tags], &[])
        .await
        .unwrap();
    assert!(analysis.tags.is_empty());

    let request = &server.state.recorded()[0];
    assert_eq!(request.content_type.as_deref(), Some("application/octet-stream"));
    assert_eq!(request.body, b"\xFF\xD8\xFFfake-jpeg-bytes".to_vec());
    assert!(!request.query.contains_key("details"));
}

#[tokio::test]
async fn test_detect_objects() {
    let server = MockVisionServer::start().await;
    server.state.set_analysis(json!({
        "objects": [{"object": "person", "confidence": 0.85,
            "rectangle": {"x": 10, "y": 20, "w": 30, "h": 40}}]
    }));
    let client = client_for(&server, API_KEY);

    let analysis = client.detect_objects(&remote()).await.unwrap();
    assert_eq!(analysis.objects.len(), 1);
    assert_eq!(analysis.objects[0].rectangle.right(), 40);
    assert_eq!(server.state.recorded()[0].path, "detect");
}

#[tokio::test]
async fn test_recognize_printed_text_query() {
    let server = MockVisionServer::start().await;
    let client = client_for(&server, API_KEY);

    let result = client
        .recognize_printed_text(&remote(), true, "en")
        .await
        .unwrap();
    assert_eq!(result.language, "en");
    assert!(result.regions.is_empty());

    let request = &server.state.recorded()[0];
    assert_eq!(request.query["detectOrientation"], "true");
    assert_eq!(request.query["language"], "en");
}

#[tokio::test]
async fn test_batch_read_extracts_operation_id() {
    let server = MockVisionServer::start().await;
    let client = client_for(&server, API_KEY);

    let id = client
        .batch_read(&remote(), TextRecognitionMode::Handwritten)
        .await
        .unwrap();
    assert_eq!(id.as_str(), OPERATION_ID);
    assert_eq!(server.state.recorded()[0].query["mode"], "Handwritten");
}

#[tokio::test]
async fn test_batch_read_missing_operation_location() {
    let server = MockVisionServer::start().await;
    server
        .state
        .omit_operation_location
        .store(true, Ordering::SeqCst);
    let client = client_for(&server, API_KEY);

    let err = client
        .batch_read(&remote(), TextRecognitionMode::Printed)
        .await
        .unwrap_err();
    assert!(matches!(err, VisionError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_read_text_polls_once_per_status() {
    let server = MockVisionServer::start().await;
    server
        .state
        .set_read_statuses(&["NotStarted", "Running", "Succeeded"]);
    let client = client_for(&server, API_KEY);

    let (id, outcome) = client
        .read_text(&remote(), TextRecognitionMode::Printed, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(id.as_str(), OPERATION_ID);
    assert_eq!(outcome.attempts(), 3);
    assert_eq!(server.state.read_queries.load(Ordering::SeqCst), 3);
    match outcome {
        PollOutcome::Succeeded { results, .. } => {
            assert_eq!(results[0].lines.len(), 2);
            assert_eq!(results[0].lines[0].text, "Our greatest glory is not");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_read_text_direct_failure() {
    let server = MockVisionServer::start().await;
    server.state.set_read_statuses(&["Failed"]);
    let client = client_for(&server, API_KEY);

    let (_, outcome) = client
        .read_text(&remote(), TextRecognitionMode::Printed, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.status(), OperationStatus::Failed);
    assert!(outcome.results().is_none());
    assert_eq!(server.state.read_queries.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_read_text_attempt_cap() {
    let server = MockVisionServer::start().await;
    server.state.set_read_statuses(&["Running"]);
    let client = client_for(&server, API_KEY);

    let err = client
        .read_text(&remote(), TextRecognitionMode::Printed, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        VisionError::PollAttemptsExhausted { attempts: 20, .. }
    ));
}

#[tokio::test]
async fn test_wrong_key_is_unauthorized() {
    let server = MockVisionServer::start().await;
    let client = client_for(&server, "wrong-key");

    let err = client
        .analyze(&remote(), &[VisualFeature::Tags], &[])
        .await
        .unwrap_err();
    assert!(matches!(err, VisionError::Unauthorized { status: 401 }));
    assert!(server.state.recorded().is_empty());
}

#[tokio::test]
async fn test_service_error_body_is_parsed() {
    let server = MockVisionServer::start().await;
    server.state.fail_with(
        400,
        vec![("content-type", "application/json".to_string())],
        r#"{"error": {"code": "InvalidImageUrl", "message": "Image URL is badly formatted."}}"#,
    );
    let client = client_for(&server, API_KEY);

    let err = client
        .analyze(&remote(), &[VisualFeature::Color], &[])
        .await
        .unwrap_err();
    match err {
        VisionError::Api {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 400);
            assert_eq!(code, "InvalidImageUrl");
            assert_eq!(message, "Image URL is badly formatted.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unparseable_error_body_keeps_text() {
    let server = MockVisionServer::start().await;
    server.state.fail_with(500, vec![], "upstream exploded");
    let client = client_for(&server, API_KEY);

    let err = client.detect_objects(&remote()).await.unwrap_err();
    match err {
        VisionError::Api { status, message, .. } => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream exploded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limited_reads_retry_after() {
    let server = MockVisionServer::start().await;
    server
        .state
        .fail_with(429, vec![("retry-after", "7".to_string())], "");
    let client = client_for(&server, API_KEY);

    let err = client
        .analyze(&remote(), &[VisualFeature::Tags], &[])
        .await
        .unwrap_err();
    assert!(matches!(err, VisionError::RateLimited { retry_after_secs: 7 }));
}
