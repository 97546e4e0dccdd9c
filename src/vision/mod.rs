// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Computer Vision service client
//!
//! - `client`: REST calls (analyze, detect, OCR, batch read)
//! - `poller`: waits for batch read operations to reach a terminal status
//! - `report`: turns results into printable lines
//! - `quickstart`: runs the demo sections in order

pub mod client;
pub mod config;
pub mod errors;
pub mod features;
pub mod operation;
pub mod poller;
pub mod quickstart;
pub mod report;
pub mod types;

pub use client::{VisionClient, VisionService};
pub use config::VisionConfig;
pub use errors::VisionError;
pub use features::{Detail, ImageSource, TextRecognitionMode, VisualFeature};
pub use operation::{OperationId, OperationStatus, OPERATION_ID_LEN};
pub use poller::{poll_read_result, PollOutcome, PollPolicy, ReadOperations};
pub use quickstart::{ImageSet, Quickstart, Section};
pub use types::{ImageAnalysis, OcrResult, ReadOperationResult, TextRecognitionResult};
