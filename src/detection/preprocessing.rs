use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use imageproc::filter::bilateral_filter;
use imageproc::map::{map_colors, red_channel, green_channel, blue_channel};

/// HSV image in OpenCV's 8-bit layout: H in 0..=180, S and V in 0..=255
pub type HsvImage = ImageBuffer<Rgb<u8>, Vec<u8>>;

/// Mirror the frame so the preview behaves like a mirror
pub fn mirror(img: &RgbImage) -> RgbImage {
    image::imageops::flip_horizontal(img)
}

/// Edge-preserving smoothing, applied per channel
pub fn smooth(img: &RgbImage, diameter: u32, sigma_color: f32, sigma_space: f32) -> RgbImage {
    let r = bilateral_filter(&red_channel(img), diameter, sigma_color, sigma_space);
    let g = bilateral_filter(&green_channel(img), diameter, sigma_color, sigma_space);
    let b = bilateral_filter(&blue_channel(img), diameter, sigma_color, sigma_space);

    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        Rgb([
            r.get_pixel(x, y)[0],
            g.get_pixel(x, y)[0],
            b.get_pixel(x, y)[0],
        ])
    })
}

/// Convert image to grayscale
pub fn to_grayscale(img: &RgbImage) -> GrayImage {
    image::imageops::grayscale(img)
}

/// Convert a single RGB pixel to 8-bit HSV
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(|c| c as f32);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;

    let s = if v > 0.0 { diff * 255.0 / v } else { 0.0 };

    let h = if diff == 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / diff
    } else if v == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    [
        // Hues just below 360 degrees round to 180 and wrap to 0
        ((h / 2.0).round() as u32 % 180) as u8,
        s.round().min(255.0) as u8,
        v as u8,
    ]
}

/// Convert an RGB frame to HSV
pub fn to_hsv(img: &RgbImage) -> HsvImage {
    map_colors(img, |p| Rgb(rgb_to_hsv(p.0)))
}

/// Binary image with 255 wherever `predicate` holds
pub fn threshold_map<F>(img: &HsvImage, predicate: F) -> GrayImage
where
    F: Fn([u8; 3]) -> bool,
{
    map_colors(img, |p| if predicate(p.0) { Luma([255u8]) } else { Luma([0u8]) })
}
