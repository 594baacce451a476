use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_hollow_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut,
};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};

use crate::models::{ColorProfile, DetectedObject, FrameReport, Interaction, InteractionKind, Trail};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const RED: Rgb<u8> = Rgb([255, 0, 0]);
const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);
const MAGENTA: Rgb<u8> = Rgb([255, 0, 255]);

/// Pixel height of text at font scale 1.0
const BASE_TEXT_PX: f32 = 30.0;

/// HUD panel corners and the fraction of black blended over it
const HUD_TOP_LEFT: (i32, i32) = (10, 10);
const HUD_BOTTOM_RIGHT: (i32, i32) = (260, 60);
const HUD_OPACITY: f32 = 0.15;

/// Fonts tried when none is given on the command line
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load a TTF/OTF font from disk
pub fn load_font(path: &Path) -> Result<FontVec> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read font: {}", path.display()))?;
    FontVec::try_from_vec(bytes)
        .map_err(|e| anyhow::anyhow!("Failed to parse font {}: {}", path.display(), e))
}

/// Draws detections, trails, interactions, faces and the HUD onto frames
pub struct Overlay {
    font: Option<FontVec>,
}

impl Overlay {
    pub fn new(font: Option<FontVec>) -> Self {
        Self { font }
    }

    /// Use `path` if given, otherwise the first system font that loads.
    /// Without a font only text is skipped.
    pub fn load(path: Option<&Path>) -> Self {
        let candidates: Vec<PathBuf> = match path {
            Some(p) => vec![p.to_path_buf()],
            None => FONT_CANDIDATES.iter().map(PathBuf::from).collect(),
        };

        for candidate in &candidates {
            if path.is_none() && !candidate.exists() {
                continue;
            }
            match load_font(candidate) {
                Ok(font) => {
                    tracing::debug!("Loaded overlay font {}", candidate.display());
                    return Self::new(Some(font));
                }
                Err(e) => tracing::warn!("{:#}", e),
            }
        }

        tracing::warn!("No usable font found, text labels disabled");
        Self::new(None)
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// `origin` is the text baseline's left end
    fn text(&self, frame: &mut RgbImage, text: &str, origin: (i32, i32), font_scale: f32, color: Rgb<u8>) {
        let Some(font) = &self.font else {
            return;
        };
        let px = BASE_TEXT_PX * font_scale;
        let top = origin.1 - (px * 0.75) as i32;
        draw_text_mut(frame, color, origin.0, top, PxScale::from(px), font, text);
    }

    /// Annotate the frame with everything in `report`
    pub fn render(
        &self,
        frame: &mut RgbImage,
        report: &FrameReport,
        red: &ColorProfile,
        yellow: &ColorProfile,
    ) {
        self.draw_objects(frame, &report.red, red.display_color);
        draw_trail(frame, &red.trail, red.display_color);
        self.draw_objects(frame, &report.yellow, yellow.display_color);
        draw_trail(frame, &yellow.trail, yellow.display_color);

        for interaction in &report.interactions {
            self.draw_interaction(frame, interaction);
        }
        self.draw_faces(frame, &report.faces);
        self.draw_hud(frame, report.collision);
    }

    pub fn draw_objects(&self, frame: &mut RgbImage, objects: &[DetectedObject], color: Rgb<u8>) {
        for object in objects {
            let b = object.bbox;
            self.text(frame, &object.label(), (b.left(), b.top() - 15), 0.7, color);
            draw_thick_rect(frame, b, color, 3);
        }
    }

    pub fn draw_interaction(&self, frame: &mut RgbImage, interaction: &Interaction) {
        draw_thick_line(frame, interaction.red_center, interaction.yellow_center, WHITE, 2);
        let (mx, my) = interaction.midpoint();

        match interaction.kind {
            InteractionKind::Collision => {
                for r in (10..40).step_by(10) {
                    draw_thick_circle(frame, (mx, my), r, YELLOW, 2);
                }
                self.text(frame, "COLLISION!", (mx - 60, my - 50), 1.0, RED);
            }
            InteractionKind::Proximity => {
                draw_thick_circle(frame, (mx, my), 15, WHITE, 2);
                let label = format!("{}px", interaction.distance as i64);
                self.text(frame, &label, (mx - 20, my + 5), 0.5, WHITE);
            }
        }
    }

    pub fn draw_faces(&self, frame: &mut RgbImage, faces: &[Rect]) {
        for face in faces {
            draw_thick_rect(frame, *face, MAGENTA, 3);
            self.text(frame, "Face Detected!", (face.left(), face.top() - 15), 0.8, MAGENTA);
        }
    }

    pub fn draw_hud(&self, frame: &mut RgbImage, collision: bool) {
        darken_region(frame, HUD_TOP_LEFT, HUD_BOTTOM_RIGHT, HUD_OPACITY);

        let status = if collision { "DETECTED!" } else { "None" };
        let lines = [format!("Collision: {}", status), String::new(), "Q-Quit | R-Reset".to_string()];

        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let color = if collision && line.contains("Collision") { RED } else { WHITE };
            self.text(frame, line, (20, 30 + i as i32 * 20), 0.5, color);
        }
    }
}

/// Fading trail: newer segments are brighter and thicker
pub fn draw_trail(frame: &mut RgbImage, trail: &Trail, color: Rgb<u8>) {
    let len = trail.len();
    if len < 2 {
        return;
    }
    for (i, from, to) in trail.segments() {
        let alpha = i as f32 / len as f32;
        let thickness = ((5.0 * alpha) as u32).max(1);
        let faded = Rgb(color.0.map(|c| (c as f32 * alpha) as u8));
        draw_thick_line(frame, from, to, faded, thickness);
    }
}

/// Blend black over the rectangle between the two corners (inclusive)
pub fn darken_region(frame: &mut RgbImage, top_left: (i32, i32), bottom_right: (i32, i32), opacity: f32) {
    let (w, h) = (frame.width() as i32, frame.height() as i32);
    let x0 = top_left.0.clamp(0, w);
    let y0 = top_left.1.clamp(0, h);
    let x1 = (bottom_right.0 + 1).clamp(0, w);
    let y1 = (bottom_right.1 + 1).clamp(0, h);
    let keep = 1.0 - opacity;

    for y in y0..y1 {
        for x in x0..x1 {
            let p = frame.get_pixel_mut(x as u32, y as u32);
            p.0 = p.0.map(|c| (c as f32 * keep).round() as u8);
        }
    }
}

/// Line of the given thickness, built from parallel one-pixel segments
pub fn draw_thick_line(frame: &mut RgbImage, from: (i32, i32), to: (i32, i32), color: Rgb<u8>, thickness: u32) {
    let (fx, fy) = (from.0 as f32, from.1 as f32);
    let (tx, ty) = (to.0 as f32, to.1 as f32);
    let (dx, dy) = (tx - fx, ty - fy);
    let len = (dx * dx + dy * dy).sqrt();
    let (nx, ny) = if len > 0.0 { (-dy / len, dx / len) } else { (0.0, 0.0) };

    let t = thickness.max(1) as i32;
    for k in 0..t {
        let offset = k as f32 - (t - 1) as f32 / 2.0;
        let (ox, oy) = (nx * offset, ny * offset);
        draw_line_segment_mut(frame, (fx + ox, fy + oy), (tx + ox, ty + oy), color);
    }
}

/// Rectangle outline centred on `rect`'s edges
pub fn draw_thick_rect(frame: &mut RgbImage, rect: Rect, color: Rgb<u8>, thickness: u32) {
    let t = thickness.max(1) as i32;
    for k in 0..t {
        let grow = k - (t - 1) / 2;
        let w = rect.width() as i32 + 2 * grow;
        let h = rect.height() as i32 + 2 * grow;
        if w <= 0 || h <= 0 {
            continue;
        }
        let r = Rect::at(rect.left() - grow, rect.top() - grow).of_size(w as u32, h as u32);
        draw_hollow_rect_mut(frame, r, color);
    }
}

pub fn draw_thick_circle(frame: &mut RgbImage, center: (i32, i32), radius: i32, color: Rgb<u8>, thickness: u32) {
    let t = thickness.max(1) as i32;
    for k in 0..t {
        let r = radius + k - (t - 1) / 2;
        if r > 0 {
            draw_hollow_circle_mut(frame, center, r, color);
        }
    }
}
