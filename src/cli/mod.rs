// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Computer Vision quickstart CLI
#[derive(Parser, Debug)]
#[command(name = "vision-quickstart")]
#[command(version = crate::version::VERSION_NUMBER)]
#[command(about = "Run the Computer Vision quickstarts against local and remote images", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every quickstart section on the local and remote sample images
    Quickstart(commands::QuickstartArgs),

    /// Analyze one image for selected visual features
    Analyze(commands::AnalyzeArgs),

    /// Detect objects in one image
    Objects(commands::ImageArgs),

    /// Recognize printed text synchronously (OCR)
    Ocr(commands::OcrArgs),

    /// Recognize text with the asynchronous batch Read API
    Read(commands::ReadArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Quickstart(args)) => commands::run_quickstart(args).await,
        Some(Commands::Analyze(args)) => commands::analyze(args).await,
        Some(Commands::Objects(args)) => commands::detect_objects(args).await,
        Some(Commands::Ocr(args)) => commands::ocr(args).await,
        Some(Commands::Read(args)) => commands::read(args).await,
        None => commands::run_quickstart(commands::QuickstartArgs::default()).await,
    }
}
