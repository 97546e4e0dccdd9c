// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Sequential quickstart runner
//!
//! Runs each demo section against an image set and writes the report to any
//! `std::io::Write`. All images in a set are analyzed in the same order:
//! describe, categorize, tag, faces, adult/racy, color, domain-specific,
//! image type, objects, brands, batch read, OCR.

use anyhow::Result;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::client::VisionService;
use super::features::{Detail, ImageSource, TextRecognitionMode, VisualFeature};
use super::poller::{poll_read_result, PollOutcome};
use super::report;
use super::types::ImageAnalysis;

const SAMPLE_DATA_URL: &str =
    "https://raw.githubusercontent.com/Azure-Samples/cognitive-services-sample-data-files/master/ComputerVision/Images";
const BRAND_IMAGE_URL: &str =
    "https://docs.microsoft.com/en-us/azure/cognitive-services/computer-vision/images/gray-shirt-logo.jpg";

/// One demo section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Describe,
    Categorize,
    Tag,
    Faces,
    Adult,
    Color,
    DomainSpecific,
    ImageType,
    Objects,
    Brands,
    ReadText,
    Ocr,
}

impl Section {
    pub const ALL: [Section; 12] = [
        Section::Describe,
        Section::Categorize,
        Section::Tag,
        Section::Faces,
        Section::Adult,
        Section::Color,
        Section::DomainSpecific,
        Section::ImageType,
        Section::Objects,
        Section::Brands,
        Section::ReadText,
        Section::Ocr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Describe => "describe",
            Section::Categorize => "categorize",
            Section::Tag => "tag",
            Section::Faces => "faces",
            Section::Adult => "adult",
            Section::Color => "color",
            Section::DomainSpecific => "domain",
            Section::ImageType => "image-type",
            Section::Objects => "objects",
            Section::Brands => "brands",
            Section::ReadText => "read",
            Section::Ocr => "ocr",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Section::ALL
            .iter()
            .find(|section| section.as_str() == wanted)
            .copied()
            .ok_or_else(|| {
                let names: Vec<&str> = Section::ALL.iter().map(|s| s.as_str()).collect();
                format!("unknown section '{}'; expected one of: {}", s, names.join(", "))
            })
    }
}

/// Images used by one pass of the quickstart
#[derive(Debug, Clone)]
pub struct ImageSet {
    /// Image for the general analysis sections
    pub analysis: ImageSource,
    /// Image containing a logo
    pub brands: ImageSource,
    /// Image containing text
    pub text: ImageSource,
    pub text_mode: TextRecognitionMode,
}

impl ImageSet {
    /// Images expected under `resources/` in the working directory
    pub fn local_defaults() -> Self {
        Self {
            analysis: ImageSource::Local(PathBuf::from("resources/faces.jpg")),
            brands: ImageSource::Local(PathBuf::from("resources/gray-shirt-logo.jpg")),
            text: ImageSource::Local(PathBuf::from("resources/handwritten_text.jpg")),
            text_mode: TextRecognitionMode::Handwritten,
        }
    }

    /// Public sample images
    pub fn remote_defaults() -> Self {
        Self {
            analysis: ImageSource::Remote(format!("{}/landmark.jpg", SAMPLE_DATA_URL)),
            brands: ImageSource::Remote(BRAND_IMAGE_URL.to_string()),
            text: ImageSource::Remote(format!("{}/printed_text.jpg", SAMPLE_DATA_URL)),
            text_mode: TextRecognitionMode::Printed,
        }
    }
}

/// Runs the demo sections against a vision service
pub struct Quickstart<'a, S: VisionService> {
    service: &'a S,
    sections: Vec<Section>,
    cancel: CancellationToken,
}

impl<'a, S: VisionService> Quickstart<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self {
            service,
            sections: Section::ALL.to_vec(),
            cancel: CancellationToken::new(),
        }
    }

    /// Restrict the run to the given sections (kept in canonical order)
    pub fn with_sections(mut self, sections: &[Section]) -> Self {
        self.sections = Section::ALL
            .iter()
            .filter(|s| sections.contains(s))
            .copied()
            .collect();
        self
    }

    /// Token that aborts batch-read polling
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Run every selected section against one image set
    pub async fn run(&self, images: &ImageSet, out: &mut dyn Write) -> Result<()> {
        match &images.analysis {
            ImageSource::Local(path) => {
                let shown = std::fs::canonicalize(path).unwrap_or_else(|_| path.clone());
                writeln!(out, "\n\nLocal image path:\n{}", shown.display())?;
            }
            ImageSource::Remote(url) => writeln!(out, "\n\nRemote image URL:\n{}", url)?,
        }

        for section in &self.sections {
            debug!(section = %section, source = %images.analysis, "Running quickstart section");
            self.run_section(*section, images, out).await?;
        }
        Ok(())
    }

    async fn run_section(
        &self,
        section: Section,
        images: &ImageSet,
        out: &mut dyn Write,
    ) -> Result<()> {
        let source = &images.analysis;
        let kind = source.kind();

        match section {
            Section::Describe => {
                let analysis = self.analyze(source, VisualFeature::Description).await?;
                write_block(
                    out,
                    &format!("Captions from {} image:", kind),
                    report::captions(analysis.captions()),
                )?;
            }
            Section::Categorize => {
                let analysis = self.analyze(source, VisualFeature::Categories).await?;
                write_block(
                    out,
                    &format!("Categories from {} image:", kind),
                    report::categories(&analysis.categories),
                )?;
            }
            Section::Tag => {
                let analysis = self.analyze(source, VisualFeature::Tags).await?;
                write_block(
                    out,
                    &format!("Tags in the {} image:", kind),
                    report::tags(&analysis.tags),
                )?;
            }
            Section::Faces => {
                let analysis = self.analyze(source, VisualFeature::Faces).await?;
                write_block(
                    out,
                    &format!("Faces in the {} image:", kind),
                    report::faces(&analysis.faces),
                )?;
            }
            Section::Adult => {
                let analysis = self.analyze(source, VisualFeature::Adult).await?;
                write_block(
                    out,
                    &format!("Analyzing {} image for adult or racy content:", kind),
                    report::adult(analysis.adult.as_ref()),
                )?;
            }
            Section::Color => {
                let analysis = self.analyze(source, VisualFeature::Color).await?;
                write_block(
                    out,
                    &format!("Color scheme of the {} image:", kind),
                    report::color(analysis.color.as_ref()),
                )?;
            }
            Section::DomainSpecific => {
                let analysis = self
                    .service
                    .analyze(
                        source,
                        &[VisualFeature::Categories],
                        &[Detail::Celebrities, Detail::Landmarks],
                    )
                    .await?;
                write_block(
                    out,
                    &format!("Celebrities in the {} image:", kind),
                    report::celebrities(analysis.celebrities()),
                )?;
                write_block(
                    out,
                    &format!("Landmarks in the {} image:", kind),
                    report::landmarks(analysis.landmarks()),
                )?;
            }
            Section::ImageType => {
                let analysis = self.analyze(source, VisualFeature::ImageType).await?;
                write_block(
                    out,
                    &format!("Image type of {} image:", kind),
                    report::image_type(analysis.image_type.as_ref()),
                )?;
            }
            Section::Objects => {
                let analysis = self.service.detect_objects(source).await?;
                write_block(
                    out,
                    &format!("Detecting objects in {} image:", kind),
                    report::objects(&analysis.objects),
                )?;
            }
            Section::Brands => {
                let brands = &images.brands;
                let analysis = self.analyze(brands, VisualFeature::Brands).await?;
                write_block(
                    out,
                    &format!("Detecting brands in {} image {}:", brands.kind(), brands),
                    report::brands(&analysis.brands),
                )?;
            }
            Section::ReadText => {
                let text = &images.text;
                writeln!(
                    out,
                    "\nRecognizing text in a {} image with the batch Read API ... \n",
                    text.kind()
                )?;
                let id = self.service.batch_read(text, images.text_mode).await?;
                let policy = self.service.poll_policy();
                let outcome = poll_read_result(self.service, &id, &policy, &self.cancel).await?;
                info!(
                    operation_id = %id,
                    status = %outcome.status(),
                    attempts = outcome.attempts(),
                    "Batch read finished"
                );
                match outcome {
                    PollOutcome::Succeeded { results, .. } => {
                        write_lines(out, report::text_lines(&results))?
                    }
                    PollOutcome::Failed { .. } => writeln!(out, "Text recognition failed.")?,
                }
            }
            Section::Ocr => {
                let text = &images.text;
                let result = self
                    .service
                    .recognize_printed_text(text, true, "en")
                    .await?;
                write_block(
                    out,
                    &format!("Recognizing text in a {} image with OCR ...", text.kind()),
                    report::ocr(&result),
                )?;
            }
        }
        Ok(())
    }

    async fn analyze(
        &self,
        source: &ImageSource,
        feature: VisualFeature,
    ) -> Result<ImageAnalysis> {
        Ok(self.service.analyze(source, &[feature], &[]).await?)
    }
}

fn write_block(out: &mut dyn Write, heading: &str, lines: Vec<String>) -> Result<()> {
    writeln!(out, "\n{}", heading)?;
    write_lines(out, lines)
}

fn write_lines(out: &mut dyn Write, lines: Vec<String>) -> Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
