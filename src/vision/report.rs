// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Human-readable report lines for analysis, OCR and read results
//!
//! Every function returns the lines to print so output can be checked without I/O.
//! Empty collections produce a single `No <feature> detected.` line.

use super::types::{
    AdultInfo, BoundingRect, Caption, Category, Celebrity, ColorInfo, DetectedBrand,
    DetectedObject, FaceDescription, FaceRectangle, ImageType, Landmark, OcrResult, Tag,
    TextRecognitionResult,
};

/// The line printed when a feature returned nothing
pub fn none_detected(feature: &str) -> String {
    format!("No {} detected.", feature)
}

fn face_location(rect: &FaceRectangle) -> String {
    format!(
        "({}, {}), ({}, {})",
        rect.left,
        rect.top,
        rect.right(),
        rect.bottom()
    )
}

// Objects and brands list the horizontal span first, then the vertical span
fn span_location(rect: &BoundingRect) -> String {
    format!("({}, {}), ({}, {})", rect.x, rect.right(), rect.y, rect.bottom())
}

fn lines_or_none<T>(items: &[T], feature: &str, line: impl Fn(&T) -> String) -> Vec<String> {
    if items.is_empty() {
        return vec![none_detected(feature)];
    }
    items.iter().map(line).collect()
}

pub fn captions(captions: &[Caption]) -> Vec<String> {
    lines_or_none(captions, "captions", |c| {
        format!("'{}' with confidence {}", c.text, c.confidence)
    })
}

pub fn categories(categories: &[Category]) -> Vec<String> {
    lines_or_none(categories, "categories", |c| {
        format!("'{}' with confidence {}", c.name, c.score)
    })
}

pub fn tags(tags: &[Tag]) -> Vec<String> {
    lines_or_none(tags, "tags", |t| {
        format!("'{}' with confidence {}", t.name, t.confidence)
    })
}

pub fn faces(faces: &[FaceDescription]) -> Vec<String> {
    lines_or_none(faces, "faces", |f| {
        format!(
            "'{}' of age {} at location {}",
            f.gender,
            f.age,
            face_location(&f.face_rectangle)
        )
    })
}

pub fn adult(adult: Option<&AdultInfo>) -> Vec<String> {
    match adult {
        Some(a) => vec![
            format!(
                "Is adult content: {} with confidence {}",
                a.is_adult_content, a.adult_score
            ),
            format!(
                "Has racy content: {} with confidence {}",
                a.is_racy_content, a.racy_score
            ),
        ],
        None => vec![none_detected("adult or racy content ratings")],
    }
}

pub fn color(color: Option<&ColorInfo>) -> Vec<String> {
    match color {
        Some(c) => vec![
            format!("Is black and white: {}", c.is_bw_img),
            format!("Accent color: 0x{}", c.accent_color),
            format!("Dominant background color: {}", c.dominant_color_background),
            format!("Dominant foreground color: {}", c.dominant_color_foreground),
            format!("Dominant colors: {}", c.dominant_colors.join(", ")),
        ],
        None => vec![none_detected("color scheme")],
    }
}

pub fn celebrities<'a>(celebrities: impl IntoIterator<Item = &'a Celebrity>) -> Vec<String> {
    let celebrities: Vec<&Celebrity> = celebrities.into_iter().collect();
    lines_or_none(&celebrities, "celebrities", |c| {
        format!(
            "'{}' with confidence {} at location {}",
            c.name,
            c.confidence,
            face_location(&c.face_rectangle)
        )
    })
}

pub fn landmarks<'a>(landmarks: impl IntoIterator<Item = &'a Landmark>) -> Vec<String> {
    let landmarks: Vec<&Landmark> = landmarks.into_iter().collect();
    lines_or_none(&landmarks, "landmarks", |l| {
        format!("'{}' with confidence {}", l.name, l.confidence)
    })
}

pub fn image_type(image_type: Option<&ImageType>) -> Vec<String> {
    match image_type {
        Some(t) => vec![
            format!("Clip art type: {}", t.clip_art_type),
            format!("Line drawing type: {}", t.line_drawing_type),
        ],
        None => vec![none_detected("image type")],
    }
}

pub fn objects(objects: &[DetectedObject]) -> Vec<String> {
    lines_or_none(objects, "objects", |o| {
        format!(
            "'{}' with confidence {} at location {}",
            o.object,
            o.confidence,
            span_location(&o.rectangle)
        )
    })
}

pub fn brands(brands: &[DetectedBrand]) -> Vec<String> {
    lines_or_none(brands, "brands", |b| {
        format!(
            "'{}' with confidence {} at location {}",
            b.name,
            b.confidence,
            span_location(&b.rectangle)
        )
    })
}

/// Each recognized line, followed by its bounding polygon and a blank line
pub fn text_lines(results: &[TextRecognitionResult]) -> Vec<String> {
    let mut out = Vec::new();
    for line in results.iter().flat_map(|r| r.lines.iter()) {
        out.push(line.text.clone());
        let coords: Vec<String> = line.bounding_box.iter().map(|v| v.to_string()).collect();
        out.push(format!("[{}]", coords.join(", ")));
        out.push(String::new());
    }
    if out.is_empty() {
        out.push(none_detected("text lines"));
    }
    out
}

pub fn ocr(result: &OcrResult) -> Vec<String> {
    let mut out = vec![
        "Text:".to_string(),
        format!("Language: {}", result.language),
        format!(
            "Text angle: {}",
            result
                .text_angle
                .map(|a| a.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        ),
        format!("Orientation: {}", result.orientation),
    ];

    if result.regions.is_empty() {
        out.push(none_detected("text regions"));
        return out;
    }

    out.push("Text regions:".to_string());
    for region in &result.regions {
        out.push(format!("\tRegion bounding box: {}", region.bounding_box));
        for line in &region.lines {
            out.push(format!("\tLine bounding box: {}", line.bounding_box));
            for word in &line.words {
                out.push(format!("\t\tWord bounding box: {}", word.bounding_box));
                out.push(format!("\t\tText: {}", word.text));
            }
            out.push(String::new());
        }
    }
    out
}
