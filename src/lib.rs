pub mod config;
pub mod controls;
pub mod detection;
pub mod faces;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod render;

pub use config::DetectorConfig;
pub use detection::{ColorDetector, ProcessedFrame};
pub use models::{ColorProfile, DetectedObject, FrameReport, HsvRange, Interaction, InteractionKind, Shape, Trail};
pub use pipeline::{DebugConfig, Pipeline, PipelineContext, PipelineStep};
pub use render::Overlay;

#[cfg(feature = "camera")]
pub mod camera;
