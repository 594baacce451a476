pub mod preprocessing;
pub mod masks;
pub mod contours;
pub mod shapes;
pub mod interaction;
pub mod steps;

use anyhow::Result;
use image::{GrayImage, RgbImage};
use imageproc::geometry::contour_area;
use std::path::PathBuf;

use crate::config::DetectorConfig;
use crate::faces::FaceDetector;
use crate::models::{ColorProfile, DetectedObject, FrameReport, InteractionKind};
use crate::pipeline::Pipeline;
use interaction::InteractionThresholds;

/// Find the color blobs in a cleaned mask. Contours under `min_area` and
/// degenerate ones (zero moment) are skipped.
pub fn detect_objects(mask: &GrayImage, color_name: &str, min_area: f64) -> Vec<DetectedObject> {
    let mut objects = Vec::new();

    for contour in contours::find_external_contours(mask) {
        let area = contour_area(&contour);
        if area < min_area {
            continue;
        }

        let Some(center) = contours::moments(&contour).centroid() else {
            continue;
        };
        let Some(bbox) = contours::bounding_rect(&contour) else {
            continue;
        };
        let shape = shapes::classify_shape(&contour);

        objects.push(DetectedObject {
            color_name: color_name.to_string(),
            center,
            area,
            contour,
            bbox,
            shape,
        });
    }

    objects
}

/// Centroid of the largest object, used as the trail position for the frame
pub fn largest_center(objects: &[DetectedObject]) -> Option<(i32, i32)> {
    objects
        .iter()
        .max_by(|a, b| a.area.total_cmp(&b.area))
        .map(|o| o.center)
}

/// Result of running one frame through the detector
pub struct ProcessedFrame {
    /// The preprocessed frame, ready for overlays
    pub image: RgbImage,
    pub report: FrameReport,
}

/// Per-frame red/yellow tracking state and orchestration
pub struct ColorDetector {
    pub config: DetectorConfig,
    pub red: ColorProfile,
    pub yellow: ColorProfile,
    preprocessing: Pipeline,
}

impl ColorDetector {
    pub fn new(config: DetectorConfig) -> Self {
        let red = config.red.to_profile(config.trail_capacity);
        let yellow = config.yellow.to_profile(config.trail_capacity);
        let preprocessing = steps::build_preprocessing_pipeline(
            true,
            config.smoothing_diameter,
            config.smoothing_sigma_color,
            config.smoothing_sigma_space,
        );
        Self {
            config,
            red,
            yellow,
            preprocessing,
        }
    }

    /// Choose whether frames are mirrored before analysis
    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.preprocessing = steps::build_preprocessing_pipeline(
            mirror,
            self.config.smoothing_diameter,
            self.config.smoothing_sigma_color,
            self.config.smoothing_sigma_space,
        );
        self
    }

    /// Save every intermediate image into `output_dir` (must be empty)
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        self.preprocessing = self.preprocessing.with_debug(output_dir)?;
        Ok(self)
    }

    pub fn preprocessing(&self) -> &Pipeline {
        &self.preprocessing
    }

    pub fn thresholds(&self) -> InteractionThresholds {
        InteractionThresholds {
            proximity: self.config.proximity_threshold,
            collision: self.config.collision_threshold,
        }
    }

    /// Cleaned binary mask for one profile
    pub fn create_mask(&self, hsv: &preprocessing::HsvImage, profile: &ColorProfile) -> GrayImage {
        masks::create_mask(
            hsv,
            &profile.ranges,
            self.config.morphology_radius,
            self.config.close_iterations,
            self.config.open_iterations,
        )
    }

    /// Detect, update trails and check interactions on an already
    /// preprocessed frame
    pub fn analyze(&mut self, frame: &RgbImage) -> Result<FrameReport> {
        let hsv = preprocessing::to_hsv(frame);
        let red_mask = self.create_mask(&hsv, &self.red);
        let yellow_mask = self.create_mask(&hsv, &self.yellow);

        if let Some(debug) = self.preprocessing.context().debug() {
            let dir = debug.stage_dir(self.preprocessing.len() + 1, "masks");
            debug.save(&dir, &format!("{}.png", self.red.name.to_lowercase()), &red_mask)?;
            debug.save(&dir, &format!("{}.png", self.yellow.name.to_lowercase()), &yellow_mask)?;
        }

        let red = detect_objects(&red_mask, &self.red.name, self.config.min_area);
        let yellow = detect_objects(&yellow_mask, &self.yellow.name, self.config.min_area);

        self.red.record(largest_center(&red));
        self.yellow.record(largest_center(&yellow));

        let interactions = interaction::detect_interactions(&red, &yellow, self.thresholds());
        let collision = interactions
            .iter()
            .any(|i| i.kind == InteractionKind::Collision);

        tracing::debug!(
            "Frame: {} red, {} yellow, {} interactions, collision={}",
            red.len(),
            yellow.len(),
            interactions.len(),
            collision
        );

        Ok(FrameReport {
            red,
            yellow,
            interactions,
            collision,
            faces: Vec::new(),
        })
    }

    /// Full per-frame pass: preprocess, analyze and look for faces
    pub fn process_frame(
        &mut self,
        frame: RgbImage,
        faces: &mut dyn FaceDetector,
    ) -> Result<ProcessedFrame> {
        let image = self.preprocessing.run(frame)?;
        let mut report = self.analyze(&image)?;
        report.faces = faces.detect(&image)?;
        Ok(ProcessedFrame { image, report })
    }

    /// Save the annotated frame as the last debug stage
    pub fn save_debug_output(&self, annotated: &RgbImage) -> Result<()> {
        if let Some(debug) = self.preprocessing.context().debug() {
            let dir = debug.stage_dir(self.preprocessing.len() + 2, "annotated");
            debug.save(&dir, "01.png", annotated)?;
        }
        Ok(())
    }

    /// Forget all trails
    pub fn reset(&mut self) {
        self.red.reset();
        self.yellow.reset();
        tracing::info!("Reset complete!");
    }
}
