// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request vocabulary: visual features, domain details, text modes and image sources

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use url::Url;

use super::errors::VisionError;

/// Visual features the analyze endpoint can extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualFeature {
    Description,
    Categories,
    Tags,
    Faces,
    Adult,
    Color,
    ImageType,
    Objects,
    Brands,
}

impl VisualFeature {
    pub const ALL: [VisualFeature; 9] = [
        VisualFeature::Description,
        VisualFeature::Categories,
        VisualFeature::Tags,
        VisualFeature::Faces,
        VisualFeature::Adult,
        VisualFeature::Color,
        VisualFeature::ImageType,
        VisualFeature::Objects,
        VisualFeature::Brands,
    ];

    /// Name used in the `visualFeatures` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualFeature::Description => "Description",
            VisualFeature::Categories => "Categories",
            VisualFeature::Tags => "Tags",
            VisualFeature::Faces => "Faces",
            VisualFeature::Adult => "Adult",
            VisualFeature::Color => "Color",
            VisualFeature::ImageType => "ImageType",
            VisualFeature::Objects => "Objects",
            VisualFeature::Brands => "Brands",
        }
    }
}

impl fmt::Display for VisualFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisualFeature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(['-', '_'], "").to_lowercase();
        VisualFeature::ALL
            .iter()
            .find(|f| f.as_str().to_lowercase() == normalized)
            .copied()
            .ok_or_else(|| {
                format!(
                    "unknown visual feature '{}'; expected one of: {}",
                    s,
                    join(&VisualFeature::ALL)
                )
            })
    }
}

/// Domain-specific models applied on top of categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Detail {
    Celebrities,
    Landmarks,
}

impl Detail {
    pub fn as_str(&self) -> &'static str {
        match self {
            Detail::Celebrities => "Celebrities",
            Detail::Landmarks => "Landmarks",
        }
    }
}

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Detail {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "celebrities" => Ok(Detail::Celebrities),
            "landmarks" => Ok(Detail::Landmarks),
            other => Err(format!(
                "unknown detail '{}'; expected celebrities or landmarks",
                other
            )),
        }
    }
}

/// Kind of text the batch read endpoint should expect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextRecognitionMode {
    #[default]
    Printed,
    Handwritten,
}

impl TextRecognitionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextRecognitionMode::Printed => "Printed",
            TextRecognitionMode::Handwritten => "Handwritten",
        }
    }
}

impl fmt::Display for TextRecognitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextRecognitionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "printed" => Ok(TextRecognitionMode::Printed),
            "handwritten" => Ok(TextRecognitionMode::Handwritten),
            other => Err(format!(
                "unknown text recognition mode '{}'; expected printed or handwritten",
                other
            )),
        }
    }
}

/// Image to send to the service: uploaded bytes or a URL the service fetches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Local(PathBuf),
    Remote(String),
}

impl ImageSource {
    /// Interpret `http://` and `https://` references as remote URLs, anything else as a path
    pub fn parse(reference: &str) -> Result<Self, VisionError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(VisionError::InvalidImageSource {
                source_ref: reference.to_string(),
                reason: "empty image reference".to_string(),
            });
        }

        let lower = reference.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = Url::parse(reference).map_err(|e| VisionError::InvalidImageSource {
                source_ref: reference.to_string(),
                reason: e.to_string(),
            })?;
            return Ok(ImageSource::Remote(url.to_string()));
        }

        Ok(ImageSource::Local(PathBuf::from(reference)))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ImageSource::Remote(_))
    }

    /// "local" or "remote", used in report headings
    pub fn kind(&self) -> &'static str {
        match self {
            ImageSource::Local(_) => "local",
            ImageSource::Remote(_) => "remote",
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Local(path) => write!(f, "{}", path.display()),
            ImageSource::Remote(url) => f.write_str(url),
        }
    }
}

/// Comma-join the display form of a list
pub(crate) fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
