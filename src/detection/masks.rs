use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};

use super::preprocessing::{threshold_map, HsvImage};
use crate::models::HsvRange;

/// Pixels inside the range become 255, everything else 0. Bounds are inclusive.
pub fn in_range(hsv: &HsvImage, range: &HsvRange) -> GrayImage {
    threshold_map(hsv, |p| range.contains(p))
}

/// Union of the masks for every range. Hues that wrap around 0 are given
/// as two ranges.
pub fn range_mask(hsv: &HsvImage, ranges: &[HsvRange]) -> GrayImage {
    threshold_map(hsv, |p| ranges.iter().any(|r| r.contains(p)))
}

/// Dilate then erode, `iterations` times each
pub fn close(mask: &GrayImage, radius: u8, iterations: usize) -> GrayImage {
    let mut out = mask.clone();
    for _ in 0..iterations {
        out = dilate(&out, Norm::L2, radius);
    }
    for _ in 0..iterations {
        out = erode(&out, Norm::L2, radius);
    }
    out
}

/// Erode then dilate, `iterations` times each
pub fn open(mask: &GrayImage, radius: u8, iterations: usize) -> GrayImage {
    let mut out = mask.clone();
    for _ in 0..iterations {
        out = erode(&out, Norm::L2, radius);
    }
    for _ in 0..iterations {
        out = dilate(&out, Norm::L2, radius);
    }
    out
}

/// Build the cleaned-up mask for a color: threshold, close gaps, then drop speckle
pub fn create_mask(
    hsv: &HsvImage,
    ranges: &[HsvRange],
    radius: u8,
    close_iterations: usize,
    open_iterations: usize,
) -> GrayImage {
    let raw = range_mask(hsv, ranges);
    let closed = close(&raw, radius, close_iterations);
    open(&closed, radius, open_iterations)
}
