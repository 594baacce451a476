use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;
use imageproc::rect::Rect;

/// Outer boundaries of the white regions in a binary mask. Holes and
/// contours nested inside other regions are dropped.
pub fn find_external_contours(mask: &GrayImage) -> Vec<Vec<Point<i32>>> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| c.points)
        .collect()
}

/// Spatial moments of the polygon (m00, m10, m01)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    /// Centroid truncated to whole pixels, `None` for degenerate polygons
    pub fn centroid(&self) -> Option<(i32, i32)> {
        if self.m00 > 0.0 {
            Some(((self.m10 / self.m00) as i32, (self.m01 / self.m00) as i32))
        } else {
            None
        }
    }
}

pub fn moments(points: &[Point<i32>]) -> Moments {
    if points.len() < 3 {
        return Moments { m00: 0.0, m10: 0.0, m01: 0.0 };
    }

    let (mut a, mut cx, mut cy) = (0.0, 0.0, 0.0);
    for i in 0..points.len() {
        let p = points[i];
        let q = points[(i + 1) % points.len()];
        let (x0, y0, x1, y1) = (p.x as f64, p.y as f64, q.x as f64, q.y as f64);
        let cross = x0 * y1 - x1 * y0;
        a += cross;
        cx += (x0 + x1) * cross;
        cy += (y0 + y1) * cross;
    }

    // Orientation-independent: flip everything when traced clockwise
    let sign = if a < 0.0 { -1.0 } else { 1.0 };
    Moments {
        m00: sign * a / 2.0,
        m10: sign * cx / 6.0,
        m01: sign * cy / 6.0,
    }
}

/// Smallest upright rectangle containing every point
pub fn bounding_rect(points: &[Point<i32>]) -> Option<Rect> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(Rect::at(min_x, min_y).of_size((max_x - min_x + 1) as u32, (max_y - min_y + 1) as u32))
}
