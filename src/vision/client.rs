// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP client for the Computer Vision v2.0 REST API

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::config::VisionConfig;
use super::errors::VisionError;
use super::features::{join, Detail, ImageSource, TextRecognitionMode, VisualFeature};
use super::operation::OperationId;
use super::poller::{poll_read_result, PollOutcome, PollPolicy, ReadOperations};
use super::types::{ErrorBody, ImageAnalysis, OcrResult, ReadOperationResult};

const API_PATH: &str = "vision/v2.0";
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION_HEADER: &str = "Operation-Location";
const DEFAULT_LANGUAGE: &str = "en";

/// Remote calls the quickstart needs from the vision service
#[async_trait]
pub trait VisionService: ReadOperations {
    /// Analyze an image for the requested visual features and domain details
    async fn analyze(
        &self,
        source: &ImageSource,
        features: &[VisualFeature],
        details: &[Detail],
    ) -> Result<ImageAnalysis, VisionError>;

    /// Run the object detector; only `objects` is populated
    async fn detect_objects(&self, source: &ImageSource) -> Result<ImageAnalysis, VisionError>;

    /// Synchronous OCR of printed text
    async fn recognize_printed_text(
        &self,
        source: &ImageSource,
        detect_orientation: bool,
        language: &str,
    ) -> Result<OcrResult, VisionError>;

    /// Submit a batch read job and return its operation id
    async fn batch_read(
        &self,
        source: &ImageSource,
        mode: TextRecognitionMode,
    ) -> Result<OperationId, VisionError>;

    /// Polling policy used for batch read jobs
    fn poll_policy(&self) -> PollPolicy {
        PollPolicy::default()
    }
}

/// Client for the Computer Vision service, authenticated by subscription key
pub struct VisionClient {
    client: Client,
    endpoint: String,
    api_key: String,
    request_timeout: Duration,
    poll: PollPolicy,
}

impl VisionClient {
    /// Create a new client from an explicit configuration
    pub fn new(config: &VisionConfig) -> Result<Self, VisionError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        let endpoint = config.endpoint();
        info!(
            "Vision client configured: endpoint={}, timeout={}s",
            endpoint, config.request_timeout_secs
        );

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            request_timeout: config.request_timeout(),
            poll: config.poll.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit a batch read job and wait for its terminal status
    pub async fn read_text(
        &self,
        source: &ImageSource,
        mode: TextRecognitionMode,
        cancel: &CancellationToken,
    ) -> Result<(OperationId, PollOutcome), VisionError> {
        let id = self.batch_read(source, mode).await?;
        let outcome = poll_read_result(self, &id, &self.poll, cancel).await?;
        Ok((id, outcome))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.endpoint, API_PATH, path)
    }

    /// Attach the image as an octet-stream body or a JSON url body
    async fn with_image(
        &self,
        request: RequestBuilder,
        source: &ImageSource,
    ) -> Result<RequestBuilder, VisionError> {
        match source {
            ImageSource::Local(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| VisionError::Io {
                    path: path.clone(),
                    source: e,
                })?;
                debug!("Uploading local image {} ({} bytes)", path.display(), bytes.len());
                Ok(request
                    .header(CONTENT_TYPE, "application/octet-stream")
                    .body(bytes))
            }
            ImageSource::Remote(url) => Ok(request.json(&serde_json::json!({ "url": url }))),
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, VisionError> {
        let response = request
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        check_status(response).await
    }

    fn transport_error(&self, e: reqwest::Error) -> VisionError {
        if e.is_timeout() {
            VisionError::Timeout {
                timeout_ms: self.request_timeout.as_millis() as u64,
            }
        } else {
            VisionError::Http(e)
        }
    }
}

/// Map non-success responses onto [`VisionError`]
async fn check_status(response: Response) -> Result<Response, VisionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(VisionError::Unauthorized {
            status: status.as_u16(),
        });
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(1);
        return Err(VisionError::RateLimited { retry_after_secs });
    }

    let body = response.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => {
            let detail = parsed.into_detail();
            (detail.code, detail.message)
        }
        Err(_) => (
            status.canonical_reason().unwrap_or("Unknown").to_string(),
            body,
        ),
    };
    Err(VisionError::Api {
        status: status.as_u16(),
        code,
        message,
    })
}

async fn parse_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, VisionError> {
    response
        .json()
        .await
        .map_err(|e| VisionError::MalformedResponse(format!("JSON parse error: {}", e)))
}

#[async_trait]
impl ReadOperations for VisionClient {
    async fn get_read_result(&self, id: &OperationId) -> Result<ReadOperationResult, VisionError> {
        let request = self
            .client
            .get(self.url(&format!("read/operations/{}", id)));
        let response = self.send(request).await?;
        let result: ReadOperationResult = parse_json(response).await?;
        debug!(operation_id = %id, status = %result.status, "Read operation status");
        Ok(result)
    }
}

#[async_trait]
impl VisionService for VisionClient {
    async fn analyze(
        &self,
        source: &ImageSource,
        features: &[VisualFeature],
        details: &[Detail],
    ) -> Result<ImageAnalysis, VisionError> {
        let mut query = vec![
            ("visualFeatures", join(features)),
            ("language", DEFAULT_LANGUAGE.to_string()),
        ];
        if !details.is_empty() {
            query.push(("details", join(details)));
        }

        debug!(
            "Analyzing {} image {} for [{}]",
            source.kind(),
            source,
            join(features)
        );
        let request = self.client.post(self.url("analyze")).query(&query);
        let request = self.with_image(request, source).await?;
        parse_json(self.send(request).await?).await
    }

    async fn detect_objects(&self, source: &ImageSource) -> Result<ImageAnalysis, VisionError> {
        debug!("Detecting objects in {} image {}", source.kind(), source);
        let request = self.client.post(self.url("detect"));
        let request = self.with_image(request, source).await?;
        parse_json(self.send(request).await?).await
    }

    async fn recognize_printed_text(
        &self,
        source: &ImageSource,
        detect_orientation: bool,
        language: &str,
    ) -> Result<OcrResult, VisionError> {
        let query = [
            ("detectOrientation", detect_orientation.to_string()),
            ("language", language.to_string()),
        ];
        let request = self.client.post(self.url("ocr")).query(&query);
        let request = self.with_image(request, source).await?;
        parse_json(self.send(request).await?).await
    }

    async fn batch_read(
        &self,
        source: &ImageSource,
        mode: TextRecognitionMode,
    ) -> Result<OperationId, VisionError> {
        let request = self
            .client
            .post(self.url("read/core/asyncBatchAnalyze"))
            .query(&[("mode", mode.as_str())]);
        let request = self.with_image(request, source).await?;
        let response = self.send(request).await?;

        let location = response
            .headers()
            .get(OPERATION_LOCATION_HEADER)
            .ok_or_else(|| {
                VisionError::MalformedResponse(format!(
                    "missing {} header",
                    OPERATION_LOCATION_HEADER
                ))
            })?
            .to_str()
            .map_err(|e| {
                VisionError::MalformedResponse(format!(
                    "unreadable {} header: {}",
                    OPERATION_LOCATION_HEADER, e
                ))
            })?;

        let id = OperationId::from_location(location)?;
        info!(operation_id = %id, mode = %mode, "Batch read submitted");
        Ok(id)
    }

    fn poll_policy(&self) -> PollPolicy {
        self.poll.clone()
    }
}
