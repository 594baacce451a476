use anyhow::Context;
use clap::{Parser, Subcommand};
use image::ImageReader;
use std::path::{Path, PathBuf};

#[cfg(not(feature = "camera"))]
use colortrack::faces::DisabledFaceDetector;
use colortrack::faces::FaceDetector;
use colortrack::logging::init_logging;
use colortrack::{ColorDetector, DetectorConfig, InteractionKind, Overlay};

#[derive(Parser)]
#[command(name = "colortrack")]
#[command(about = "Track red and yellow objects, their shapes and collisions")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON file overriding detector parameters
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// TTF/OTF font used for labels and the HUD
    #[arg(long, value_name = "FILE", global = true)]
    font: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Track objects live from a camera
    Live {
        /// Camera device index
        #[arg(long, default_value_t = 0)]
        camera: i32,

        /// Haar cascade XML for face detection
        #[arg(long, value_name = "FILE")]
        cascade: Option<PathBuf>,

        /// Show a normal window instead of fullscreen
        #[arg(long)]
        windowed: bool,
    },

    /// Run a single still image through the detector
    Image {
        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Where to write the annotated image
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Save debug outputs to directory (must be empty)
        #[arg(long, value_name = "DIR")]
        debug_out: Option<PathBuf>,

        /// Do not mirror the image before analysis
        #[arg(long)]
        no_mirror: bool,

        /// Haar cascade XML for face detection
        #[arg(long, value_name = "FILE")]
        cascade: Option<PathBuf>,
    },
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    input.with_file_name(format!("{}_annotated.png", stem))
}

#[cfg(feature = "camera")]
fn face_detector(config: &DetectorConfig, cascade: Option<&Path>) -> Box<dyn FaceDetector> {
    colortrack::camera::load_face_detector(
        cascade,
        config.face_scale_factor,
        config.face_min_neighbors,
        config.face_min_size,
    )
}

#[cfg(not(feature = "camera"))]
fn face_detector(_config: &DetectorConfig, cascade: Option<&Path>) -> Box<dyn FaceDetector> {
    if cascade.is_some() {
        tracing::warn!("Face detection needs the `camera` feature, ignoring --cascade");
    }
    Box::new(DisabledFaceDetector)
}

fn run_image(
    detector: ColorDetector,
    overlay: &Overlay,
    image_path: PathBuf,
    output: Option<PathBuf>,
    debug_out: Option<PathBuf>,
    no_mirror: bool,
    cascade: Option<PathBuf>,
) -> anyhow::Result<()> {
    tracing::debug!("Loading image: {:?}", image_path);
    let img = ImageReader::open(&image_path)
        .with_context(|| format!("Failed to open image: {}", image_path.display()))?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?
        .to_rgb8();
    tracing::debug!("Image loaded: {}x{}", img.width(), img.height());

    let mut detector = detector.with_mirror(!no_mirror);
    if let Some(dir) = debug_out {
        detector = detector.with_debug(dir)?;
    }

    let mut faces = face_detector(&detector.config, cascade.as_deref());
    let mut processed = detector.process_frame(img, faces.as_mut())?;
    overlay.render(&mut processed.image, &processed.report, &detector.red, &detector.yellow);
    detector.save_debug_output(&processed.image)?;

    let report = &processed.report;
    println!("\n=== Color Detection Results ===");
    println!("Total objects detected: {}", report.object_count());
    for object in report.red.iter().chain(report.yellow.iter()) {
        println!(
            "  {} at ({}, {}) - area: {:.0}px",
            object.label(),
            object.center.0,
            object.center.1,
            object.area
        );
    }
    for interaction in &report.interactions {
        let kind = match interaction.kind {
            InteractionKind::Collision => "collision",
            InteractionKind::Proximity => "proximity",
        };
        println!(
            "  Red #{} / Yellow #{}: {} ({:.1}px)",
            interaction.red_index + 1,
            interaction.yellow_index + 1,
            kind,
            interaction.distance
        );
    }
    println!("Faces detected: {}", report.faces.len());
    println!(
        "Collision: {}",
        if report.collision { "DETECTED!" } else { "None" }
    );

    let output = output.unwrap_or_else(|| default_output_path(&image_path));
    processed
        .image
        .save(&output)
        .map_err(|e| anyhow::anyhow!("Failed to save {}: {}", output.display(), e))?;
    println!("Annotated image written to {}", output.display());

    Ok(())
}

#[cfg(feature = "camera")]
fn run_live(detector: ColorDetector, overlay: &Overlay, camera: i32, cascade: Option<PathBuf>, windowed: bool) -> anyhow::Result<()> {
    use colortrack::camera::{self, LiveOptions};

    tracing::info!("Smart Red & Yellow Detection");
    camera::run_live(
        detector,
        overlay,
        LiveOptions {
            camera_index: camera,
            cascade,
            fullscreen: !windowed,
        },
    )
}

#[cfg(not(feature = "camera"))]
fn run_live(_detector: ColorDetector, _overlay: &Overlay, _camera: i32, _cascade: Option<PathBuf>, _windowed: bool) -> anyhow::Result<()> {
    anyhow::bail!("Live mode needs the `camera` feature: cargo run --features camera -- live")
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => DetectorConfig::load(path)?,
        None => DetectorConfig::default(),
    };
    let detector = ColorDetector::new(config);
    let overlay = Overlay::load(args.font.as_deref());

    match args.command {
        Command::Live { camera, cascade, windowed } => {
            run_live(detector, &overlay, camera, cascade, windowed)
        }
        Command::Image { image_path, output, debug_out, no_mirror, cascade } => {
            run_image(detector, &overlay, image_path, output, debug_out, no_mirror, cascade)
        }
    }
}
