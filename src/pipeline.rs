use anyhow::{Context, Result};
use image::RgbImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
    /// Whether debug mode is enabled
    pub enabled: bool,
}

impl DebugConfig {
    /// Directory for a numbered stage, e.g. `02_bilateral_smoothing`
    pub fn stage_dir(&self, index: usize, name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{:02}_{}", index, name.to_lowercase().replace(' ', "_")))
    }

    /// Save an image as `<stage_dir>/<file_name>`
    pub fn save<P, C>(&self, stage_dir: &Path, file_name: &str, image: &image::ImageBuffer<P, C>) -> Result<()>
    where
        P: image::PixelWithColorType,
        [P::Subpixel]: image::EncodableLayout,
        C: std::ops::Deref<Target = [P::Subpixel]>,
    {
        std::fs::create_dir_all(stage_dir)?;
        let path = stage_dir.join(file_name);
        image
            .save(&path)
            .with_context(|| format!("Failed to save debug image: {}", path.display()))?;
        tracing::debug!("Debug: saved {}", path.display());
        Ok(())
    }
}

/// Context available to all pipeline steps
#[derive(Clone, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

impl PipelineContext {
    /// Active debug config, if debug output is switched on
    pub fn debug(&self) -> Option<&DebugConfig> {
        self.debug.as_ref().filter(|d| d.enabled)
    }
}

/// Trait that all frame preprocessing steps implement
pub trait PipelineStep: Send + Sync {
    /// Transform one frame
    fn process(&self, frame: RgbImage, context: &PipelineContext) -> Result<RgbImage>;

    /// Human-readable name for this step (used in logs and debug directories)
    fn name(&self) -> &str;
}

/// Composable frame preprocessing pipeline
#[derive(Clone, Default)]
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    context: PipelineContext,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.context.debug = Some(DebugConfig {
            output_dir,
            enabled: true,
        });

        Ok(self)
    }

    /// Add a processing step to the pipeline
    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Helper method to add a step from a Box (for convenience)
    pub fn add_step_boxed(mut self, step: Box<dyn PipelineStep>) -> Self {
        self.steps.push(Arc::from(step));
        self
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in order
    pub fn run(&self, input: RgbImage) -> Result<RgbImage> {
        self.run_partial(input, self.steps.len())
    }

    /// Run the pipeline but stop after `num_steps` steps (useful for debugging)
    pub fn run_partial(&self, input: RgbImage, num_steps: usize) -> Result<RgbImage> {
        if let Some(debug) = self.context.debug() {
            debug.save(&debug.stage_dir(0, "input"), "01.png", &input)?;
        }

        let mut frame = input;
        for (i, step) in self.steps.iter().take(num_steps).enumerate() {
            tracing::debug!("Running step {}: {}", i + 1, step.name());
            frame = step.process(frame, &self.context)?;

            if let Some(debug) = self.context.debug() {
                debug.save(&debug.stage_dir(i + 1, step.name()), "01.png", &frame)?;
            }
        }

        Ok(frame)
    }
}
