// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cli;
pub mod version;
pub mod vision;

// Re-export main types
pub use vision::{
    ImageSource, OperationId, OperationStatus, PollOutcome, PollPolicy, Quickstart, VisionClient,
    VisionConfig, VisionError, VisionService, VisualFeature,
};
