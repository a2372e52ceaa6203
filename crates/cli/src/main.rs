use std::path::PathBuf;
use std::process;

use clap::Parser;

use emotion_lens_core::capture::infrastructure::ffmpeg_camera::FfmpegCamera;
use emotion_lens_core::capture::infrastructure::minifb_display::MinifbDisplay;
use emotion_lens_core::emotion::domain::emotion_analyzer::{AnalyzeRequest, DetectorBackend};
use emotion_lens_core::emotion::domain::emotion_label::DisplayLanguage;
use emotion_lens_core::emotion::infrastructure::analyzer_factory::{
    create_analyzer, DEFAULT_CONFIDENCE,
};
use emotion_lens_core::overlay::domain::overlay_style::OverlayStyle;
use emotion_lens_core::overlay::infrastructure::overlay_font::OverlayFont;
use emotion_lens_core::overlay::infrastructure::raster_annotator::RasterAnnotator;
use emotion_lens_core::pipeline::live_annotation_loop::LiveAnnotationLoop;
use emotion_lens_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use emotion_lens_core::shared::constants::{DEFAULT_FONT_PATH, DEFAULT_FONT_SIZE};
use emotion_lens_core::shared::model_resolver::ProgressFn;

/// Live webcam emotion overlay.
#[derive(Parser)]
#[command(name = "emotion-lens")]
struct Cli {
    /// Label language: en or zh.
    #[arg(long, default_value = "zh")]
    language: String,

    /// TrueType/OpenType font for labels (falls back to a built-in font).
    #[arg(long, default_value = DEFAULT_FONT_PATH)]
    font: PathBuf,

    /// Label height in pixels.
    #[arg(long, default_value_t = DEFAULT_FONT_SIZE)]
    font_size: f32,

    /// Camera index.
    #[arg(long, default_value = "0")]
    camera: u32,

    /// Explicit capture device path or name (overrides --camera).
    #[arg(long)]
    device: Option<String>,

    /// Face detector: yolo or blazeface.
    #[arg(long, default_value = "yolo")]
    detector: String,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Directory searched for model files before downloading.
    #[arg(long)]
    models_dir: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let language: DisplayLanguage = cli.language.parse()?;
    let backend: DetectorBackend = cli.detector.parse()?;

    let font = OverlayFont::load_or_builtin(&cli.font);
    let style = OverlayStyle::new(language, cli.font_size);
    let camera = FfmpegCamera::new(cli.camera, cli.device.clone());

    let mut live = LiveAnnotationLoop::new(
        Box::new(camera),
        Box::new(MinifbDisplay::new()),
        Box::new(RasterAnnotator::new(font)),
        style,
        AnalyzeRequest::emotion_only(backend),
    )
    .with_logger(Box::new(StdoutPipelineLogger::default()));

    let confidence = cli.confidence;
    let models_dir = cli.models_dir;
    let summary = live.run(|| {
        let analyzer = create_analyzer(backend, confidence, models_dir.as_deref(), |name| {
            Some(download_progress(name.to_string()))
        })?;
        Ok(analyzer)
    })?;

    log::info!(
        "Annotated {} faces over {} frames ({} analysis errors, {} skipped records)",
        summary.detections_annotated,
        summary.frames_displayed,
        summary.analysis_errors,
        summary.detections_skipped
    );
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    cli.language.parse::<DisplayLanguage>()?;
    cli.detector.parse::<DetectorBackend>()?;
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if !cli.font_size.is_finite() || cli.font_size <= 0.0 {
        return Err(format!("Font size must be positive, got {}", cli.font_size).into());
    }
    if let Some(dir) = &cli.models_dir {
        if !dir.is_dir() {
            return Err(format!("Models directory not found: {}", dir.display()).into());
        }
    }
    Ok(())
}

fn download_progress(name: String) -> ProgressFn {
    Box::new(move |downloaded, total| {
        if total > 0 {
            let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
            eprint!("\rDownloading {name}... {pct}%");
            if downloaded >= total {
                eprintln!();
            }
        } else {
            eprint!("\rDownloading {name}... {downloaded} bytes");
        }
    })
}
