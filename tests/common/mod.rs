mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from colortrack for tests
pub use colortrack::{
    ColorDetector, ColorProfile, DetectedObject, DetectorConfig, FrameReport, HsvRange,
    Interaction, InteractionKind, Shape, Trail,
};
