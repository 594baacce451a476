use anyhow::{Context, Result};
use image::RgbImage;
use imageproc::rect::Rect;
use opencv::core::{Mat, Size, Vector, CV_8UC1, CV_8UC3};
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;
use opencv::{highgui, imgproc, videoio};
use std::path::{Path, PathBuf};

use crate::controls::KeyCommand;
use crate::detection::ColorDetector;
use crate::faces::{DisabledFaceDetector, FaceDetector};
use crate::render::Overlay;

pub const WINDOW_NAME: &str = "Smart Red & Yellow Detector (Fullscreen)";
const CASCADE_FILE: &str = "haarcascade_frontalface_default.xml";

/// Where OpenCV packages usually install the Haar cascades
const CASCADE_DIRS: &[&str] = &[
    "/usr/share/opencv4/haarcascades",
    "/usr/local/share/opencv4/haarcascades",
    "/usr/share/opencv/haarcascades",
    "/opt/homebrew/share/opencv4/haarcascades",
    "/usr/local/opt/opencv/share/opencv4/haarcascades",
];

/// Convert a BGR capture frame to an RGB image
pub fn mat_to_rgb(mat: &Mat) -> Result<RgbImage> {
    let mut rgb = Mat::default();
    imgproc::cvt_color_def(mat, &mut rgb, imgproc::COLOR_BGR2RGB)?;
    let width = rgb.cols() as u32;
    let height = rgb.rows() as u32;
    let data = rgb.data_bytes()?.to_vec();
    RgbImage::from_vec(width, height, data).context("Frame buffer has unexpected size")
}

/// Convert an RGB image back to a BGR Mat for display
pub fn rgb_to_mat(img: &RgbImage) -> Result<Mat> {
    let mut mat = unsafe { Mat::new_rows_cols(img.height() as i32, img.width() as i32, CV_8UC3)? };
    mat.data_bytes_mut()?.copy_from_slice(img.as_raw());
    let mut bgr = Mat::default();
    imgproc::cvt_color_def(&mat, &mut bgr, imgproc::COLOR_RGB2BGR)?;
    Ok(bgr)
}

/// Blocking camera reader
pub struct Camera {
    capture: videoio::VideoCapture,
    index: i32,
}

impl Camera {
    /// Open the device and request 1280x720 at 30 fps with a one-frame buffer
    pub fn open(index: i32) -> Result<Self> {
        let mut capture = videoio::VideoCapture::new(index, videoio::CAP_ANY)
            .with_context(|| format!("Cannot open camera at index {}", index))?;
        if !capture.is_opened()? {
            anyhow::bail!("Cannot open camera at index {}", index);
        }

        capture.set(videoio::CAP_PROP_FRAME_WIDTH, 1280.0)?;
        capture.set(videoio::CAP_PROP_FRAME_HEIGHT, 720.0)?;
        capture.set(videoio::CAP_PROP_FPS, 30.0)?;
        capture.set(videoio::CAP_PROP_BUFFERSIZE, 1.0)?;

        Ok(Self { capture, index })
    }

    pub fn index(&self) -> i32 {
        self.index
    }

    /// Read one frame. `Ok(None)` means the read failed and should be retried.
    pub fn read(&mut self) -> Result<Option<RgbImage>> {
        let mut frame = Mat::default();
        if !self.capture.read(&mut frame).unwrap_or(false) || frame.empty() {
            return Ok(None);
        }
        mat_to_rgb(&frame).map(Some)
    }
}

/// Haar-cascade face detector
pub struct CascadeFaceDetector {
    classifier: CascadeClassifier,
    scale_factor: f64,
    min_neighbors: i32,
    min_size: i32,
}

impl CascadeFaceDetector {
    pub fn load(path: &Path, scale_factor: f64, min_neighbors: i32, min_size: i32) -> Result<Self> {
        let path_str = path.to_str().context("Cascade path is not valid UTF-8")?;
        let classifier = CascadeClassifier::new(path_str)
            .with_context(|| format!("Failed to load face cascade: {}", path.display()))?;
        if classifier.empty()? {
            anyhow::bail!("Face cascade is empty: {}", path.display());
        }
        Ok(Self {
            classifier,
            scale_factor,
            min_neighbors,
            min_size,
        })
    }
}

impl FaceDetector for CascadeFaceDetector {
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<Rect>> {
        let gray = crate::detection::preprocessing::to_grayscale(frame);
        let mut mat = unsafe { Mat::new_rows_cols(gray.height() as i32, gray.width() as i32, CV_8UC1)? };
        mat.data_bytes_mut()?.copy_from_slice(gray.as_raw());

        let mut faces = Vector::<opencv::core::Rect>::new();
        self.classifier.detect_multi_scale(
            &mat,
            &mut faces,
            self.scale_factor,
            self.min_neighbors,
            0,
            Size::new(self.min_size, self.min_size),
            Size::default(),
        )?;

        Ok(faces
            .iter()
            .filter(|r| r.width > 0 && r.height > 0)
            .map(|r| Rect::at(r.x, r.y).of_size(r.width as u32, r.height as u32))
            .collect())
    }
}

/// Load the cascade from `path` or the usual install locations. Any failure
/// disables face detection instead of aborting.
pub fn load_face_detector(
    path: Option<&Path>,
    scale_factor: f64,
    min_neighbors: i32,
    min_size: i32,
) -> Box<dyn FaceDetector> {
    let candidate = match path {
        Some(p) => Some(p.to_path_buf()),
        None => CASCADE_DIRS
            .iter()
            .map(|d| PathBuf::from(d).join(CASCADE_FILE))
            .find(|p| p.exists()),
    };

    let result = candidate
        .context("Face cascade file not found")
        .and_then(|p| CascadeFaceDetector::load(&p, scale_factor, min_neighbors, min_size));

    match result {
        Ok(detector) => Box::new(detector),
        Err(e) => {
            tracing::warn!("Could not load face cascade. Face detection disabled. Error: {:#}", e);
            Box::new(DisabledFaceDetector)
        }
    }
}

/// Live-view options
pub struct LiveOptions {
    pub camera_index: i32,
    pub cascade: Option<PathBuf>,
    pub fullscreen: bool,
}

/// Capture, analyse, annotate and display until the user quits
pub fn run_live(mut detector: ColorDetector, overlay: &Overlay, options: LiveOptions) -> Result<()> {
    let mut faces = load_face_detector(
        options.cascade.as_deref(),
        detector.config.face_scale_factor,
        detector.config.face_min_neighbors,
        detector.config.face_min_size,
    );

    let mut camera = Camera::open(options.camera_index)?;

    if options.fullscreen {
        highgui::named_window(WINDOW_NAME, highgui::WINDOW_NORMAL)?;
        highgui::set_window_property(
            WINDOW_NAME,
            highgui::WND_PROP_FULLSCREEN,
            highgui::WINDOW_FULLSCREEN as f64,
        )?;
    } else {
        highgui::named_window(WINDOW_NAME, highgui::WINDOW_AUTOSIZE)?;
    }

    tracing::info!("Ready! Using camera index {}.", camera.index());
    tracing::info!("Controls: Q=Quit, R=Reset");

    loop {
        let Some(frame) = camera.read()? else {
            continue;
        };

        let mut processed = detector.process_frame(frame, faces.as_mut())?;
        overlay.render(&mut processed.image, &processed.report, &detector.red, &detector.yellow);

        highgui::imshow(WINDOW_NAME, &rgb_to_mat(&processed.image)?)?;

        match KeyCommand::from_key(highgui::wait_key(1)?) {
            KeyCommand::Quit => break,
            KeyCommand::Reset => detector.reset(),
            KeyCommand::None => {}
        }
    }

    highgui::destroy_all_windows()?;
    tracing::info!("Shutdown complete!");
    Ok(())
}
