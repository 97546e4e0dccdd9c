// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Environment-driven configuration as seen by the CLI commands

use tokio_test::{assert_err, assert_ok};
use vision_quickstart::cli::commands::{self, ImageArgs};
use vision_quickstart::vision::config::{API_KEY_VAR, ENDPOINT_VAR, REGION_VAR};
use vision_quickstart::vision::{VisionConfig, VisionError};

use super::mock_server::{MockVisionServer, API_KEY};

// Every environment mutation in this binary happens inside this one test
#[tokio::test]
async fn test_missing_key_stops_before_any_request() {
    let server = MockVisionServer::start().await;

    std::env::remove_var(API_KEY_VAR);
    std::env::set_var(REGION_VAR, "westus");
    std::env::set_var(ENDPOINT_VAR, &server.endpoint);

    let args = ImageArgs {
        image: "https://example.com/landmark.jpg".to_string(),
    };
    let err = assert_err!(commands::detect_objects(args).await);
    let vision_err = err.downcast_ref::<VisionError>().unwrap();
    assert!(vision_err.is_config_error());
    assert!(vision_err
        .to_string()
        .starts_with("Please set the COMPUTERVISION_API_KEY environment variable."));
    assert!(server.state.recorded().is_empty());

    // With the key present the same command reaches the service
    std::env::set_var(API_KEY_VAR, API_KEY);
    let args = ImageArgs {
        image: "https://example.com/landmark.jpg".to_string(),
    };
    assert_ok!(commands::detect_objects(args).await);
    assert_eq!(server.state.recorded().len(), 1);

    let config = assert_ok!(VisionConfig::from_env());
    assert_eq!(config.endpoint(), server.endpoint);
}
