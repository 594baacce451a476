mod common;

use colortrack::detection::masks::{create_mask, in_range, range_mask};
use colortrack::detection::preprocessing::{rgb_to_hsv, to_hsv};
use common::*;
use image::Rgb;

#[test]
fn hsv_conversion_uses_8bit_hue_scale() {
    assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
    assert_eq!(rgb_to_hsv([255, 255, 0]), [30, 255, 255]);
    assert_eq!(rgb_to_hsv([0, 255, 0]), [60, 255, 255]);
    assert_eq!(rgb_to_hsv([0, 0, 255]), [120, 255, 255]);
    assert_eq!(rgb_to_hsv([255, 0, 255]), [150, 255, 255]);
    assert_eq!(rgb_to_hsv([0, 0, 0]), [0, 0, 0]);
    assert_eq!(rgb_to_hsv([128, 128, 128]), [0, 0, 128]);
}

#[test]
fn hue_just_below_full_circle_wraps_to_zero() {
    assert_eq!(rgb_to_hsv([255, 0, 1]), [0, 255, 255]);
    assert_eq!(rgb_to_hsv([255, 0, 2]), [0, 255, 255]);

    let low_band_only = [HsvRange::new([0, 130, 80], [10, 255, 255])];
    let hsv = uniform_hsv(4, 4, rgb_to_hsv([255, 0, 2]));
    assert!(range_mask(&hsv, &low_band_only).pixels().all(|p| p.0[0] == 255));
}

#[test]
fn test_colors_land_in_their_bands() {
    let red = ColorProfile::red(20);
    let yellow = ColorProfile::yellow(20);

    let red_hsv = rgb_to_hsv(TEST_RED.0);
    let yellow_hsv = rgb_to_hsv(TEST_YELLOW.0);

    assert!(red.ranges.iter().any(|r| r.contains(red_hsv)));
    assert!(!yellow.ranges.iter().any(|r| r.contains(red_hsv)));
    assert!(yellow.ranges.iter().any(|r| r.contains(yellow_hsv)));
    assert!(!red.ranges.iter().any(|r| r.contains(yellow_hsv)));
}

#[test]
fn in_range_bounds_are_inclusive() {
    let range = HsvRange::new([0, 130, 80], [10, 255, 255]);

    let at_lower = in_range(&uniform_hsv(4, 4, [0, 130, 80]), &range);
    assert!(at_lower.pixels().all(|p| p[0] == 255));

    let at_upper = in_range(&uniform_hsv(4, 4, [10, 255, 255]), &range);
    assert!(at_upper.pixels().all(|p| p[0] == 255));

    let past_hue = in_range(&uniform_hsv(4, 4, [11, 200, 200]), &range);
    assert!(past_hue.pixels().all(|p| p[0] == 0));

    let too_dull = in_range(&uniform_hsv(4, 4, [5, 129, 200]), &range);
    assert!(too_dull.pixels().all(|p| p[0] == 0));
}

#[test]
fn red_mask_covers_both_ends_of_the_hue_circle() {
    let red = ColorProfile::red(20);
    let mut hsv = uniform_hsv(3, 1, [90, 200, 200]);
    hsv.put_pixel(0, 0, Rgb([5, 200, 200]));
    hsv.put_pixel(2, 0, Rgb([175, 200, 200]));

    let mask = range_mask(&hsv, &red.ranges);
    assert_eq!(mask.get_pixel(0, 0)[0], 255);
    assert_eq!(mask.get_pixel(1, 0)[0], 0);
    assert_eq!(mask.get_pixel(2, 0)[0], 255);
}

#[test]
fn wrapped_red_pixel_converts_into_upper_band() {
    let hsv = rgb_to_hsv([255, 0, 40]);
    assert!(hsv[0] >= 168, "hue {} should be near the top of the circle", hsv[0]);
    assert!(ColorProfile::red(1).ranges[1].contains(hsv));
}

#[test]
fn cleanup_removes_speckle_and_keeps_blobs() {
    let mut frame = blank_frame(100, 100);
    paint_rect(&mut frame, 30, 30, 40, 40, TEST_RED);
    frame.put_pixel(5, 90, TEST_RED);

    let red = ColorProfile::red(20);
    let mask = create_mask(&to_hsv(&frame), &red.ranges, 5, 2, 1);

    assert_eq!(mask.get_pixel(5, 90)[0], 0, "isolated pixel should be opened away");
    assert_eq!(mask.get_pixel(50, 50)[0], 255, "blob centre should survive");
    assert_eq!(mask.get_pixel(31, 50)[0], 255, "blob edge should survive");
}

#[test]
fn cleanup_fills_small_gaps() {
    let mut frame = blank_frame(120, 100);
    paint_rect(&mut frame, 20, 30, 38, 40, TEST_YELLOW);
    paint_rect(&mut frame, 60, 30, 40, 40, TEST_YELLOW);

    let yellow = ColorProfile::yellow(20);
    let mask = create_mask(&to_hsv(&frame), &yellow.ranges, 5, 2, 1);

    assert_eq!(mask.get_pixel(59, 50)[0], 255, "two-pixel gap should be closed");
}
