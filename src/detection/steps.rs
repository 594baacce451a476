use crate::detection::preprocessing;
use crate::pipeline::{Pipeline, PipelineContext, PipelineStep};
use anyhow::Result;
use image::RgbImage;
use std::sync::Arc;

/// Flip the frame horizontally
pub struct MirrorStep;

impl PipelineStep for MirrorStep {
    fn process(&self, frame: RgbImage, _context: &PipelineContext) -> Result<RgbImage> {
        Ok(preprocessing::mirror(&frame))
    }

    fn name(&self) -> &str {
        "Mirror"
    }
}

/// Edge-preserving noise reduction
pub struct BilateralSmoothStep {
    pub diameter: u32,
    pub sigma_color: f32,
    pub sigma_space: f32,
}

impl PipelineStep for BilateralSmoothStep {
    fn process(&self, frame: RgbImage, _context: &PipelineContext) -> Result<RgbImage> {
        Ok(preprocessing::smooth(
            &frame,
            self.diameter,
            self.sigma_color,
            self.sigma_space,
        ))
    }

    fn name(&self) -> &str {
        "Bilateral Smoothing"
    }
}

/// Build the standard per-frame preprocessing pipeline
pub fn build_preprocessing_pipeline(
    mirror: bool,
    diameter: u32,
    sigma_color: f32,
    sigma_space: f32,
) -> Pipeline {
    let mut pipeline = Pipeline::new();
    if mirror {
        pipeline = pipeline.add_step(Arc::new(MirrorStep));
    }
    pipeline.add_step(Arc::new(BilateralSmoothStep {
        diameter,
        sigma_color,
        sigma_space,
    }))
}
