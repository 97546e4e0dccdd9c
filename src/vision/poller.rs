// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Batch read operation poller
//!
//! A submitted read job is queried until its status leaves `NotStarted`/`Running`.
//! One status query is issued per iteration; between queries the poller sleeps for
//! the policy delay. Polling can be bounded by an attempt cap, an overall deadline,
//! and a cancellation token.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::errors::VisionError;
use super::operation::{OperationId, OperationStatus};
use super::types::{ReadOperationResult, TextRecognitionResult};

/// Source of read-operation status, implemented by the HTTP client and by test doubles
#[async_trait]
pub trait ReadOperations: Send + Sync {
    /// Query the current status (and result, once succeeded) of a read operation
    async fn get_read_result(&self, id: &OperationId) -> Result<ReadOperationResult, VisionError>;
}

/// How often and for how long to poll a read operation
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    /// Delay before the second query
    pub interval: Duration,
    /// Multiplier applied to the delay after every non-terminal status (1.0 = fixed)
    pub backoff: f64,
    /// Upper bound for a single delay
    pub max_interval: Duration,
    /// Maximum number of status queries
    pub max_attempts: Option<u32>,
    /// Overall deadline for reaching a terminal status
    pub timeout: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            backoff: 1.0,
            max_interval: Duration::from_secs(30),
            max_attempts: Some(60),
            timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl PollPolicy {
    /// Fixed interval with no attempt cap and no deadline.
    ///
    /// Polls until the service reports a terminal status; only the cancellation
    /// token can stop it otherwise.
    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            backoff: 1.0,
            max_interval: interval,
            max_attempts: None,
            timeout: None,
        }
    }

    /// Exponential backoff starting at `interval`, capped at `max_interval`
    pub fn exponential(interval: Duration, backoff: f64, max_interval: Duration) -> Self {
        Self {
            interval,
            backoff,
            max_interval,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Delay after the `retry`-th non-terminal observation (0-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let secs = self.interval.as_secs_f64() * self.backoff.powi(exponent);
        if !secs.is_finite() || secs < 0.0 {
            return self.max_interval.max(self.interval);
        }
        Duration::try_from_secs_f64(secs)
            .unwrap_or(self.max_interval)
            .min(self.max_interval.max(self.interval))
    }
}

/// Terminal outcome of a read operation
#[derive(Debug, Clone)]
pub enum PollOutcome {
    /// Recognition finished; results hold the recognized lines per page
    Succeeded {
        results: Vec<TextRecognitionResult>,
        attempts: u32,
    },
    /// Recognition failed on the service side; no result is available
    Failed { attempts: u32 },
}

impl PollOutcome {
    pub fn status(&self) -> OperationStatus {
        match self {
            PollOutcome::Succeeded { .. } => OperationStatus::Succeeded,
            PollOutcome::Failed { .. } => OperationStatus::Failed,
        }
    }

    /// Number of status queries issued
    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Succeeded { attempts, .. } | PollOutcome::Failed { attempts } => *attempts,
        }
    }

    pub fn results(&self) -> Option<&[TextRecognitionResult]> {
        match self {
            PollOutcome::Succeeded { results, .. } => Some(results.as_slice()),
            PollOutcome::Failed { .. } => None,
        }
    }
}

/// Poll a read operation until it reaches a terminal status
pub async fn poll_read_result(
    source: &dyn ReadOperations,
    id: &OperationId,
    policy: &PollPolicy,
    cancel: &CancellationToken,
) -> Result<PollOutcome, VisionError> {
    let start = Instant::now();
    let mut attempts: u32 = 0;

    let outcome = match policy.timeout {
        Some(deadline) => {
            let timed = tokio::time::timeout(
                deadline,
                poll_until_terminal(source, id, policy, cancel, &mut attempts),
            )
            .await;
            match timed {
                Ok(result) => result,
                Err(_) => {
                    warn!(
                        operation_id = %id,
                        attempts,
                        timeout_ms = deadline.as_millis() as u64,
                        "Read operation did not finish before the deadline"
                    );
                    Err(VisionError::PollTimeout {
                        elapsed_ms: start.elapsed().as_millis() as u64,
                        attempts,
                    })
                }
            }
        }
        None => poll_until_terminal(source, id, policy, cancel, &mut attempts).await,
    };

    if let Ok(outcome) = &outcome {
        debug!(
            operation_id = %id,
            status = %outcome.status(),
            attempts = outcome.attempts(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Read operation reached terminal status"
        );
    }
    outcome
}

async fn poll_until_terminal(
    source: &dyn ReadOperations,
    id: &OperationId,
    policy: &PollPolicy,
    cancel: &CancellationToken,
    attempts: &mut u32,
) -> Result<PollOutcome, VisionError> {
    loop {
        let result = tokio::select! {
            _ = cancel.cancelled() => return Err(VisionError::Cancelled),
            result = source.get_read_result(id) => result?,
        };
        *attempts += 1;

        match result.status {
            OperationStatus::Succeeded => {
                return Ok(PollOutcome::Succeeded {
                    results: result.recognition_results,
                    attempts: *attempts,
                })
            }
            OperationStatus::Failed => return Ok(PollOutcome::Failed { attempts: *attempts }),
            status => {
                if let Some(max) = policy.max_attempts {
                    if *attempts >= max {
                        return Err(VisionError::PollAttemptsExhausted {
                            attempts: *attempts,
                            last_status: status,
                        });
                    }
                }

                let delay = policy.delay_for(*attempts - 1);
                info!(
                    operation_id = %id,
                    attempt = *attempts,
                    "Server status: {}, waiting {}ms...",
                    status,
                    delay.as_millis()
                );

                tokio::select! {
                    _ = cancel.cancelled() => return Err(VisionError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }
    }
}
