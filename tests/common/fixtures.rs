#![allow(dead_code)]

use colortrack::detection::contours::find_external_contours;
use colortrack::detection::preprocessing::HsvImage;
use colortrack::{DetectedObject, Shape};
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;

/// Color constants for tests (well inside the default HSV bands)
pub const TEST_RED: Rgb<u8> = Rgb([220, 20, 20]);
pub const TEST_YELLOW: Rgb<u8> = Rgb([230, 210, 20]);
pub const TEST_BACKGROUND: Rgb<u8> = Rgb([128, 128, 128]);

/// Plain gray frame
pub fn blank_frame(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, TEST_BACKGROUND)
}

pub fn paint_rect(frame: &mut RgbImage, x: i32, y: i32, w: u32, h: u32, color: Rgb<u8>) {
    draw_filled_rect_mut(frame, Rect::at(x, y).of_size(w, h), color);
}

pub fn paint_disc(frame: &mut RgbImage, center: (i32, i32), radius: i32, color: Rgb<u8>) {
    draw_filled_circle_mut(frame, center, radius, color);
}

/// HSV image filled with a single value
pub fn uniform_hsv(width: u32, height: u32, hsv: [u8; 3]) -> HsvImage {
    HsvImage::from_pixel(width, height, Rgb(hsv))
}

pub fn blank_mask(width: u32, height: u32) -> GrayImage {
    GrayImage::new(width, height)
}

pub fn mask_with_rect(width: u32, height: u32, x: i32, y: i32, w: u32, h: u32) -> GrayImage {
    let mut mask = blank_mask(width, height);
    draw_filled_rect_mut(&mut mask, Rect::at(x, y).of_size(w, h), Luma([255u8]));
    mask
}

pub fn mask_with_disc(width: u32, height: u32, center: (i32, i32), radius: i32) -> GrayImage {
    let mut mask = blank_mask(width, height);
    draw_filled_circle_mut(&mut mask, center, radius, Luma([255u8]));
    mask
}

pub fn mask_with_polygon(width: u32, height: u32, vertices: &[(i32, i32)]) -> GrayImage {
    let mut mask = blank_mask(width, height);
    let points: Vec<Point<i32>> = vertices.iter().map(|&(x, y)| Point::new(x, y)).collect();
    draw_polygon_mut(&mut mask, &points, Luma([255u8]));
    mask
}

/// The single outer contour of a mask
pub fn only_contour(mask: &GrayImage) -> Vec<Point<i32>> {
    let mut contours = find_external_contours(mask);
    assert_eq!(contours.len(), 1, "expected exactly one contour");
    contours.remove(0)
}

pub fn polygon(vertices: &[(i32, i32)]) -> Vec<Point<i32>> {
    vertices.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

/// Axis-aligned square outline as a contour
pub fn square_contour(x: i32, y: i32, size: i32) -> Vec<Point<i32>> {
    polygon(&[(x, y), (x + size, y), (x + size, y + size), (x, y + size)])
}

/// Hand-built detection, bypassing the mask stage
pub fn make_object(color_name: &str, contour: Vec<Point<i32>>) -> DetectedObject {
    let xs = contour.iter().map(|p| p.x);
    let ys = contour.iter().map(|p| p.y);
    let (min_x, max_x) = (xs.clone().min().unwrap(), xs.max().unwrap());
    let (min_y, max_y) = (ys.clone().min().unwrap(), ys.max().unwrap());
    DetectedObject {
        color_name: color_name.to_string(),
        center: ((min_x + max_x) / 2, (min_y + max_y) / 2),
        area: ((max_x - min_x) * (max_y - min_y)) as f64,
        bbox: Rect::at(min_x, min_y).of_size((max_x - min_x + 1) as u32, (max_y - min_y + 1) as u32),
        contour,
        shape: Shape::Square,
    }
}
