// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for the Computer Vision client
//!
//! Covers configuration problems (missing environment variables), transport and
//! service failures, malformed responses, and read-job polling limits.

use std::path::PathBuf;

use thiserror::Error;

use super::operation::OperationStatus;

/// Errors raised by the vision client, poller and configuration loader
#[derive(Debug, Error)]
pub enum VisionError {
    /// Required environment variable is absent or empty
    #[error("Please set the {name} environment variable.\n**Note that you might need to restart your shell or IDE.**")]
    MissingEnvVar {
        /// Name of the missing variable
        name: String,
    },

    /// Configuration value present but unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Image reference could not be interpreted
    #[error("Invalid image source '{source_ref}': {reason}")]
    InvalidImageSource { source_ref: String, reason: String },

    /// Local image could not be read
    #[error("Failed to read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Subscription key rejected by the service
    #[error("Request rejected by the vision service (HTTP {status}); check the subscription key and region")]
    Unauthorized { status: u16 },

    /// Too many requests
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Non-success response from the service
    #[error("Vision API error: {status} - {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Request did not complete within the client timeout
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response missing data the protocol requires
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Read job never reached a terminal status within the attempt cap
    #[error("Read operation still {last_status} after {attempts} status queries")]
    PollAttemptsExhausted {
        attempts: u32,
        last_status: OperationStatus,
    },

    /// Read job never reached a terminal status within the overall deadline
    #[error("Read operation timed out after {elapsed_ms}ms ({attempts} status queries)")]
    PollTimeout { elapsed_ms: u64, attempts: u32 },

    /// Polling was cancelled by the caller
    #[error("Read operation polling cancelled")]
    Cancelled,
}

impl VisionError {
    /// Whether this error came from configuration rather than the service
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            VisionError::MissingEnvVar { .. } | VisionError::InvalidConfig(_)
        )
    }
}
