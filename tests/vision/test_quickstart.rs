// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Quickstart output against an in-memory vision service

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use vision_quickstart::vision::types::AdultInfo;
use vision_quickstart::vision::{
    Detail, ImageAnalysis, ImageSet, ImageSource, OcrResult, OperationId, OperationStatus,
    PollPolicy, Quickstart, ReadOperationResult, ReadOperations, Section, TextRecognitionMode,
    VisionError, VisionService, VisualFeature,
};

const REMOTE_IMAGE: &str = "https://example.com/landmark.jpg";

/// Returns a fixed analysis per source kind and a scripted read status sequence
struct FakeVision {
    local_analysis: ImageAnalysis,
    remote_analysis: ImageAnalysis,
    read_statuses: Mutex<VecDeque<OperationStatus>>,
    calls: Mutex<Vec<String>>,
}

impl FakeVision {
    fn new(read_statuses: &[OperationStatus]) -> Self {
        Self {
            local_analysis: ImageAnalysis::default(),
            remote_analysis: ImageAnalysis::default(),
            read_statuses: Mutex::new(read_statuses.iter().copied().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReadOperations for FakeVision {
    async fn get_read_result(&self, _id: &OperationId) -> Result<ReadOperationResult, VisionError> {
        self.calls.lock().unwrap().push("status".to_string());
        let status = self
            .read_statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(OperationStatus::Running);
        Ok(ReadOperationResult {
            status,
            recognition_results: Vec::new(),
        })
    }
}

#[async_trait]
impl VisionService for FakeVision {
    async fn analyze(
        &self,
        source: &ImageSource,
        _features: &[VisualFeature],
        _details: &[Detail],
    ) -> Result<ImageAnalysis, VisionError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("analyze {}", source.kind()));
        Ok(if source.is_remote() {
            self.remote_analysis.clone()
        } else {
            self.local_analysis.clone()
        })
    }

    async fn detect_objects(&self, _source: &ImageSource) -> Result<ImageAnalysis, VisionError> {
        Ok(ImageAnalysis::default())
    }

    async fn recognize_printed_text(
        &self,
        _source: &ImageSource,
        _detect_orientation: bool,
        _language: &str,
    ) -> Result<OcrResult, VisionError> {
        Ok(OcrResult::default())
    }

    async fn batch_read(
        &self,
        _source: &ImageSource,
        _mode: TextRecognitionMode,
    ) -> Result<OperationId, VisionError> {
        self.calls.lock().unwrap().push("submit".to_string());
        Ok(OperationId::from("3fa85f64-5717-4562-b3fc-2c963f66afa6".to_string()))
    }

    fn poll_policy(&self) -> PollPolicy {
        PollPolicy::fixed(Duration::from_millis(5)).with_max_attempts(10)
    }
}

fn remote_set() -> ImageSet {
    ImageSet {
        analysis: ImageSource::Remote(REMOTE_IMAGE.to_string()),
        brands: ImageSource::Remote("https://example.com/logo.jpg".to_string()),
        text: ImageSource::Remote("https://example.com/text.jpg".to_string()),
        text_mode: TextRecognitionMode::Printed,
    }
}

async fn run(service: &FakeVision, sections: &[Section], images: &ImageSet) -> String {
    let mut out = Vec::new();
    Quickstart::new(service)
        .with_sections(sections)
        .run(images, &mut out)
        .await
        .unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn test_empty_results_print_none_detected() {
    let service = FakeVision::new(&[OperationStatus::Succeeded]);
    let output = run(&service, &Section::ALL, &remote_set()).await;

    assert!(output.contains(&format!("Remote image URL:\n{}", REMOTE_IMAGE)));
    for expected in [
        "No captions detected.",
        "No categories detected.",
        "No tags detected.",
        "No faces detected.",
        "No celebrities detected.",
        "No landmarks detected.",
        "No objects detected.",
        "No brands detected.",
        "No text lines detected.",
    ] {
        assert!(output.contains(expected), "missing {:?} in:\n{}", expected, output);
    }
}

#[tokio::test]
async fn test_failed_read_prints_failure_without_lines() {
    let service = FakeVision::new(&[
        OperationStatus::NotStarted,
        OperationStatus::Running,
        OperationStatus::Failed,
    ]);
    let output = run(&service, &[Section::ReadText], &remote_set()).await;

    assert!(output.contains("Recognizing text in a remote image with the batch Read API"));
    assert!(output.contains("Text recognition failed."));
    assert!(!output.contains("No text lines detected."));

    let status_queries = service.calls().iter().filter(|c| *c == "status").count();
    assert_eq!(status_queries, 3);
}

#[tokio::test]
async fn test_read_that_never_finishes_is_an_error() {
    let service = FakeVision::new(&[]);
    let mut out = Vec::new();
    let err = Quickstart::new(&service)
        .with_sections(&[Section::ReadText])
        .run(&remote_set(), &mut out)
        .await
        .unwrap_err();

    let err = err.downcast::<VisionError>().unwrap();
    assert!(matches!(
        err,
        VisionError::PollAttemptsExhausted {
            attempts: 10,
            last_status: OperationStatus::Running
        }
    ));
}

#[tokio::test]
async fn test_remote_adult_uses_remote_analysis() {
    let mut service = FakeVision::new(&[]);
    service.local_analysis.adult = Some(AdultInfo {
        is_adult_content: true,
        is_racy_content: true,
        adult_score: 0.9,
        racy_score: 0.9,
    });
    service.remote_analysis.adult = Some(AdultInfo {
        is_adult_content: false,
        is_racy_content: false,
        adult_score: 0.01,
        racy_score: 0.02,
    });

    let output = run(&service, &[Section::Adult], &remote_set()).await;
    assert!(output.contains("Analyzing remote image for adult or racy content:"));
    assert!(output.contains("Is adult content: false with confidence 0.01"));
    assert!(output.contains("Has racy content: false with confidence 0.02"));
    assert_eq!(service.calls(), vec!["analyze remote".to_string()]);
}

#[tokio::test]
async fn test_sections_keep_canonical_order() {
    let service = FakeVision::new(&[]);
    let output = run(&service, &[Section::Tag, Section::Describe], &remote_set()).await;

    let captions = output.find("Captions from remote image:").unwrap();
    let tags = output.find("Tags in the remote image:").unwrap();
    assert!(captions < tags);
    assert!(!output.contains("Faces in the remote image:"));
}
