// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Batch read job handle and status

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::VisionError;

/// Length of the operation id at the end of an `Operation-Location` header
pub const OPERATION_ID_LEN: usize = 36;

/// Status of an asynchronous read operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
}

impl OperationStatus {
    /// Terminal statuses never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, OperationStatus::Succeeded | OperationStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationStatus::NotStarted => "NotStarted",
            OperationStatus::Running => "Running",
            OperationStatus::Succeeded => "Succeeded",
            OperationStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque handle of a submitted read operation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationId(String);

impl OperationId {
    /// Extract the operation id from an `Operation-Location` header value.
    ///
    /// The id is the trailing [`OPERATION_ID_LEN`] characters of the URL.
    pub fn from_location(location: &str) -> Result<Self, VisionError> {
        let location = location.trim();
        if location.len() < OPERATION_ID_LEN {
            return Err(VisionError::MalformedResponse(format!(
                "Operation-Location '{}' is shorter than {} characters",
                location, OPERATION_ID_LEN
            )));
        }

        let split = location.len() - OPERATION_ID_LEN;
        if !location.is_char_boundary(split) {
            return Err(VisionError::MalformedResponse(format!(
                "Operation-Location '{}' does not end in an operation id",
                location
            )));
        }

        Ok(Self(location[split..].to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for OperationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
