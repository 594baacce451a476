use anyhow::Result;
use image::RgbImage;
use imageproc::rect::Rect;

/// Anything that can find faces in a frame
pub trait FaceDetector {
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<Rect>>;
}

/// Used when no cascade could be loaded; never reports a face
pub struct DisabledFaceDetector;

impl FaceDetector for DisabledFaceDetector {
    fn detect(&mut self, _frame: &RgbImage) -> Result<Vec<Rect>> {
        Ok(Vec::new())
    }
}
