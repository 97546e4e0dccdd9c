// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wire types for the Computer Vision v2.0 REST API

use serde::{Deserialize, Serialize};

use super::operation::OperationStatus;

// --- Geometry ---

/// Face rectangle in pixels, as returned for faces and celebrities
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceRectangle {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

impl FaceRectangle {
    pub fn right(&self) -> i64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> i64 {
        self.top + self.height
    }
}

/// Object/brand rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingRect {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl BoundingRect {
    pub fn right(&self) -> i64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.h
    }
}

// --- Analyze ---

/// Result of an analyze or detect call; only requested features are populated
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adult: Option<AdultInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<ImageType>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<ImageDescription>,
    #[serde(default)]
    pub faces: Vec<FaceDescription>,
    #[serde(default)]
    pub objects: Vec<DetectedObject>,
    #[serde(default)]
    pub brands: Vec<DetectedBrand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ImageMetadata>,
}

impl ImageAnalysis {
    /// Captions from the description, empty when description was not requested
    pub fn captions(&self) -> &[Caption] {
        self.description
            .as_ref()
            .map(|d| d.captions.as_slice())
            .unwrap_or(&[])
    }

    /// Celebrities across all category details
    pub fn celebrities(&self) -> impl Iterator<Item = &Celebrity> {
        self.categories
            .iter()
            .filter_map(|c| c.detail.as_ref())
            .flat_map(|d| d.celebrities.iter())
    }

    /// Landmarks across all category details
    pub fn landmarks(&self) -> impl Iterator<Item = &Landmark> {
        self.categories
            .iter()
            .filter_map(|c| c.detail.as_ref())
            .flat_map(|d| d.landmarks.iter())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<CategoryDetail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryDetail {
    #[serde(default)]
    pub celebrities: Vec<Celebrity>,
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Celebrity {
    pub name: String,
    pub confidence: f64,
    pub face_rectangle: FaceRectangle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Landmark {
    pub name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdultInfo {
    pub is_adult_content: bool,
    pub is_racy_content: bool,
    pub adult_score: f64,
    pub racy_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorInfo {
    pub dominant_color_foreground: String,
    pub dominant_color_background: String,
    #[serde(default)]
    pub dominant_colors: Vec<String>,
    pub accent_color: String,
    #[serde(rename = "isBWImg", alias = "isBwImg")]
    pub is_bw_img: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageType {
    pub clip_art_type: i32,
    pub line_drawing_type: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageDescription {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub captions: Vec<Caption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Caption {
    pub text: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceDescription {
    pub age: u32,
    pub gender: String,
    pub face_rectangle: FaceRectangle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedObject {
    pub object: String,
    pub confidence: f64,
    pub rectangle: BoundingRect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ObjectHierarchy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectHierarchy {
    pub object: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<ObjectHierarchy>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedBrand {
    pub name: String,
    pub confidence: f64,
    pub rectangle: BoundingRect,
}

// --- OCR (synchronous printed text) ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResult {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub text_angle: Option<f64>,
    #[serde(default)]
    pub orientation: String,
    #[serde(default)]
    pub regions: Vec<OcrRegion>,
}

/// Bounding boxes in OCR results are "x,y,width,height" strings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrRegion {
    pub bounding_box: String,
    #[serde(default)]
    pub lines: Vec<OcrLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrLine {
    pub bounding_box: String,
    #[serde(default)]
    pub words: Vec<OcrWord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrWord {
    pub bounding_box: String,
    pub text: String,
}

// --- Batch read ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadOperationResult {
    pub status: OperationStatus,
    #[serde(default)]
    pub recognition_results: Vec<TextRecognitionResult>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRecognitionResult {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub lines: Vec<Line>,
}

/// A recognized line; `bounding_box` is a quadrilateral as 8 numbers (x1, y1 .. x4, y4)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub bounding_box: Vec<f64>,
    pub text: String,
    #[serde(default)]
    pub words: Vec<Word>,
}

impl Line {
    /// Axis-aligned rectangle enclosing the line polygon
    pub fn bounds(&self) -> Option<BoundingRect> {
        if self.bounding_box.len() != 8 {
            return None;
        }
        let xs = self.bounding_box.iter().step_by(2);
        let ys = self.bounding_box.iter().skip(1).step_by(2);
        let (min_x, max_x) = min_max(xs)?;
        let (min_y, max_y) = min_max(ys)?;
        Some(BoundingRect {
            x: min_x.floor() as i64,
            y: min_y.floor() as i64,
            w: (max_x - min_x).ceil() as i64,
            h: (max_y - min_y).ceil() as i64,
        })
    }
}

fn min_max<'a>(values: impl Iterator<Item = &'a f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub bounding_box: Vec<f64>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
}

/// Service error body: `{"error": {"code": .., "message": ..}}` or the bare inner object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ErrorBody {
    Wrapped { error: ErrorDetail },
    Bare(ErrorDetail),
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    pub(crate) fn into_detail(self) -> ErrorDetail {
        match self {
            ErrorBody::Wrapped { error } => error,
            ErrorBody::Bare(detail) => detail,
        }
    }
}
