// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Args;
use std::io::{self, Write};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::vision::{
    report, Detail, ImageAnalysis, ImageSet, ImageSource, PollOutcome, PollPolicy, Quickstart,
    Section, TextRecognitionMode, VisionClient, VisionConfig, VisionService, VisualFeature,
};

const REMOTE_SAMPLE_IMAGE: &str = "https://raw.githubusercontent.com/Azure-Samples/cognitive-services-sample-data-files/master/ComputerVision/Images/landmark.jpg";
const REMOTE_BRAND_IMAGE: &str =
    "https://docs.microsoft.com/en-us/azure/cognitive-services/computer-vision/images/gray-shirt-logo.jpg";
const REMOTE_TEXT_IMAGE: &str = "https://raw.githubusercontent.com/Azure-Samples/cognitive-services-sample-data-files/master/ComputerVision/Images/printed_text.jpg";

/// Arguments for the quickstart command
#[derive(Args, Debug)]
pub struct QuickstartArgs {
    /// Local image for the general analysis sections
    #[arg(long, default_value = "resources/faces.jpg")]
    pub local_image: String,

    /// Local image containing a logo
    #[arg(long, default_value = "resources/gray-shirt-logo.jpg")]
    pub brand_image: String,

    /// Local image containing text
    #[arg(long, default_value = "resources/handwritten_text.jpg")]
    pub text_image: String,

    /// Text mode for the local text image (printed/handwritten)
    #[arg(long, default_value = "handwritten")]
    pub text_mode: TextRecognitionMode,

    /// Remote image for the general analysis sections
    #[arg(long, default_value = REMOTE_SAMPLE_IMAGE)]
    pub remote_image: String,

    /// Remote image containing a logo
    #[arg(long, default_value = REMOTE_BRAND_IMAGE)]
    pub remote_brand_image: String,

    /// Remote image containing text
    #[arg(long, default_value = REMOTE_TEXT_IMAGE)]
    pub remote_text_image: String,

    /// Text mode for the remote text image (printed/handwritten)
    #[arg(long, default_value = "printed")]
    pub remote_text_mode: TextRecognitionMode,

    /// Comma-separated sections to run (default: all)
    #[arg(long, value_delimiter = ',')]
    pub sections: Vec<Section>,

    /// Skip the local image pass
    #[arg(long)]
    pub skip_local: bool,

    /// Skip the remote image pass
    #[arg(long)]
    pub skip_remote: bool,
}

impl Default for QuickstartArgs {
    fn default() -> Self {
        let local = ImageSet::local_defaults();
        let remote = ImageSet::remote_defaults();
        Self {
            local_image: local.analysis.to_string(),
            brand_image: local.brands.to_string(),
            text_image: local.text.to_string(),
            text_mode: local.text_mode,
            remote_image: remote.analysis.to_string(),
            remote_brand_image: remote.brands.to_string(),
            remote_text_image: remote.text.to_string(),
            remote_text_mode: remote.text_mode,
            sections: Vec::new(),
            skip_local: false,
            skip_remote: false,
        }
    }
}

impl QuickstartArgs {
    fn local_set(&self) -> Result<ImageSet> {
        Ok(ImageSet {
            analysis: ImageSource::parse(&self.local_image)?,
            brands: ImageSource::parse(&self.brand_image)?,
            text: ImageSource::parse(&self.text_image)?,
            text_mode: self.text_mode,
        })
    }

    fn remote_set(&self) -> Result<ImageSet> {
        Ok(ImageSet {
            analysis: ImageSource::parse(&self.remote_image)?,
            brands: ImageSource::parse(&self.remote_brand_image)?,
            text: ImageSource::parse(&self.remote_text_image)?,
            text_mode: self.remote_text_mode,
        })
    }
}

/// Arguments for the analyze command
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Local path or http(s) URL of the image
    #[arg(long)]
    pub image: String,

    /// Comma-separated visual features (description, categories, tags, faces, adult, color, imagetype, objects, brands)
    #[arg(long, value_delimiter = ',', required = true)]
    pub features: Vec<VisualFeature>,

    /// Comma-separated domain details (celebrities, landmarks)
    #[arg(long, value_delimiter = ',')]
    pub details: Vec<Detail>,
}

/// Arguments for commands that only take an image
#[derive(Args, Debug)]
pub struct ImageArgs {
    /// Local path or http(s) URL of the image
    #[arg(long)]
    pub image: String,
}

/// Arguments for the ocr command
#[derive(Args, Debug)]
pub struct OcrArgs {
    /// Local path or http(s) URL of the image
    #[arg(long)]
    pub image: String,

    /// BCP-47 language code of the text
    #[arg(long, env = "VISION_OCR_LANGUAGE", default_value = "en")]
    pub language: String,

    /// Do not ask the service to detect text orientation
    #[arg(long)]
    pub skip_orientation: bool,
}

/// Arguments for the read command
#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Local path or http(s) URL of the image
    #[arg(long)]
    pub image: String,

    /// Kind of text in the image (printed/handwritten)
    #[arg(long, default_value = "printed")]
    pub mode: TextRecognitionMode,

    /// Override the delay between status queries
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Poll at a fixed interval until the job finishes, with no attempt cap or deadline
    #[arg(long)]
    pub unbounded: bool,
}

fn load_config() -> Result<VisionConfig> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();
    Ok(VisionConfig::from_env()?)
}

/// Cancel outstanding polling when the user presses Ctrl-C
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling");
            trigger.cancel();
        }
    });
    token
}

/// Run the quickstart sections on the local and remote image sets
pub async fn run_quickstart(args: QuickstartArgs) -> Result<()> {
    let config = load_config()?;
    let client = VisionClient::new(&config)?;

    let sections = if args.sections.is_empty() {
        Section::ALL.to_vec()
    } else {
        args.sections.clone()
    };
    let quickstart = Quickstart::new(&client)
        .with_sections(&sections)
        .with_cancellation(cancel_on_ctrl_c());

    println!("\nComputer Vision - Rust Quickstart Sample ({})", crate::version::VERSION);

    let mut stdout = io::stdout().lock();
    if !args.skip_local {
        quickstart.run(&args.local_set()?, &mut stdout).await?;
    }
    if !args.skip_remote {
        quickstart.run(&args.remote_set()?, &mut stdout).await?;
    }
    stdout.flush()?;

    info!("Quickstart finished");
    Ok(())
}

/// Analyze one image and print a block per requested feature
pub async fn analyze(args: AnalyzeArgs) -> Result<()> {
    let config = load_config()?;
    let source = ImageSource::parse(&args.image)?;
    let client = VisionClient::new(&config)?;

    let analysis = client.analyze(&source, &args.features, &args.details).await?;
    for line in analysis_lines(&analysis, &args.features, &args.details) {
        println!("{}", line);
    }
    Ok(())
}

/// Detect objects in one image
pub async fn detect_objects(args: ImageArgs) -> Result<()> {
    let config = load_config()?;
    let source = ImageSource::parse(&args.image)?;
    let client = VisionClient::new(&config)?;

    let analysis = client.detect_objects(&source).await?;
    println!("\nDetecting objects in {} image:", source.kind());
    for line in report::objects(&analysis.objects) {
        println!("{}", line);
    }
    Ok(())
}

/// Synchronous OCR of one image
pub async fn ocr(args: OcrArgs) -> Result<()> {
    let config = load_config()?;
    let source = ImageSource::parse(&args.image)?;
    let client = VisionClient::new(&config)?;

    let result = client
        .recognize_printed_text(&source, !args.skip_orientation, &args.language)
        .await?;
    println!("\nRecognizing text in a {} image with OCR ...", source.kind());
    for line in report::ocr(&result) {
        println!("{}", line);
    }
    Ok(())
}

/// Submit a batch read job and wait for the result
pub async fn read(args: ReadArgs) -> Result<()> {
    let mut config = load_config()?;
    let source = ImageSource::parse(&args.image)?;

    if let Some(ms) = args.poll_interval_ms {
        config.poll.interval = Duration::from_millis(ms);
    }
    if args.unbounded {
        config.poll = PollPolicy::fixed(config.poll.interval);
    }
    let client = VisionClient::new(&config)?;

    println!(
        "\nRecognizing text in a {} image with the batch Read API ... \n",
        source.kind()
    );
    let (id, outcome) = client
        .read_text(&source, args.mode, &cancel_on_ctrl_c())
        .await?;
    info!(operation_id = %id, attempts = outcome.attempts(), "Read operation finished");

    match outcome {
        PollOutcome::Succeeded { results, .. } => {
            for line in report::text_lines(&results) {
                println!("{}", line);
            }
        }
        PollOutcome::Failed { .. } => println!("Text recognition failed."),
    }
    Ok(())
}

/// Report lines for each requested feature, in request order
pub fn analysis_lines(
    analysis: &ImageAnalysis,
    features: &[VisualFeature],
    details: &[Detail],
) -> Vec<String> {
    let mut out = Vec::new();
    let mut block = |heading: &str, lines: Vec<String>| {
        out.push(String::new());
        out.push(heading.to_string());
        out.extend(lines);
    };

    for feature in features {
        match feature {
            VisualFeature::Description => block("Captions:", report::captions(analysis.captions())),
            VisualFeature::Categories => block("Categories:", report::categories(&analysis.categories)),
            VisualFeature::Tags => block("Tags:", report::tags(&analysis.tags)),
            VisualFeature::Faces => block("Faces:", report::faces(&analysis.faces)),
            VisualFeature::Adult => block(
                "Adult or racy content:",
                report::adult(analysis.adult.as_ref()),
            ),
            VisualFeature::Color => block("Color scheme:", report::color(analysis.color.as_ref())),
            VisualFeature::ImageType => block(
                "Image type:",
                report::image_type(analysis.image_type.as_ref()),
            ),
            VisualFeature::Objects => block("Objects:", report::objects(&analysis.objects)),
            VisualFeature::Brands => block("Brands:", report::brands(&analysis.brands)),
        }
    }

    for detail in details {
        match detail {
            Detail::Celebrities => block("Celebrities:", report::celebrities(analysis.celebrities())),
            Detail::Landmarks => block("Landmarks:", report::landmarks(analysis.landmarks())),
        }
    }
    out
}
