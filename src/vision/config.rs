// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the Computer Vision client

use std::env;
use std::time::Duration;

use super::errors::VisionError;
use super::poller::PollPolicy;

pub const API_KEY_VAR: &str = "COMPUTERVISION_API_KEY";
pub const REGION_VAR: &str = "COMPUTERVISION_REGION";
pub const ENDPOINT_VAR: &str = "COMPUTERVISION_ENDPOINT";

/// Configuration for the vision client, built once at startup and passed explicitly
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Subscription key sent as `Ocp-Apim-Subscription-Key`
    pub api_key: String,
    /// Azure region, e.g. "westus"
    pub region: String,
    /// Explicit base URL overriding the region-derived one
    pub endpoint_override: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Read-operation polling behaviour
    pub poll: PollPolicy,
}

impl VisionConfig {
    pub fn new(api_key: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            region: region.into(),
            endpoint_override: None,
            request_timeout_secs: 30,
            poll: PollPolicy::default(),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, VisionError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, VisionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| VisionError::MissingEnvVar {
                    name: name.to_string(),
                })
        };

        let api_key = required(API_KEY_VAR)?;
        let region = required(REGION_VAR)?;

        let defaults = PollPolicy::default();
        let poll = PollPolicy {
            interval: lookup("VISION_POLL_INTERVAL_MS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.interval),
            backoff: lookup("VISION_POLL_BACKOFF")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.backoff),
            max_interval: defaults.max_interval,
            max_attempts: lookup("VISION_POLL_MAX_ATTEMPTS")
                .and_then(|v| v.parse().ok())
                .map(Some)
                .unwrap_or(defaults.max_attempts),
            timeout: lookup("VISION_POLL_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .map(|secs| Some(Duration::from_secs(secs)))
                .unwrap_or(defaults.timeout),
        };

        let config = Self {
            api_key: api_key.trim().to_string(),
            region: region.trim().to_string(),
            endpoint_override: lookup(ENDPOINT_VAR).filter(|v| !v.trim().is_empty()),
            request_timeout_secs: lookup("VISION_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            poll,
        };
        config.validate()?;
        Ok(config)
    }

    /// Base URL of the service, without a trailing slash
    pub fn endpoint(&self) -> String {
        match &self.endpoint_override {
            Some(endpoint) => endpoint.trim().trim_end_matches('/').to_string(),
            None => format!("https://{}.api.cognitive.microsoft.com", self.region),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), VisionError> {
        if self.request_timeout_secs == 0 {
            return Err(VisionError::InvalidConfig(
                "request timeout must be greater than 0".to_string(),
            ));
        }
        if self.poll.interval.is_zero() {
            return Err(VisionError::InvalidConfig(
                "poll interval must be greater than 0".to_string(),
            ));
        }
        if self.poll.backoff.is_nan() || self.poll.backoff < 1.0 {
            return Err(VisionError::InvalidConfig(format!(
                "poll backoff must be at least 1.0, got {}",
                self.poll.backoff
            )));
        }
        Ok(())
    }
}
