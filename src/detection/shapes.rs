use imageproc::geometry::{approximate_polygon_dp, arc_length, contour_area, convex_hull};
use imageproc::point::Point;

use super::contours::bounding_rect;
use crate::models::Shape;

/// Below this enclosing radius a blob is never called a circle
const MIN_CIRCLE_RADIUS: f64 = 5.0;
const CIRCULARITY_MIN: f64 = 0.85;
const CIRCULARITY_MAX: f64 = 1.15;
/// Douglas-Peucker tolerance as a fraction of the hull perimeter
const APPROX_EPSILON_RATIO: f64 = 0.04;
const SQUARE_ASPECT_MIN: f64 = 0.90;
const SQUARE_ASPECT_MAX: f64 = 1.10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: (f64, f64),
    pub radius: f64,
}

impl Circle {
    fn contains(&self, p: (f64, f64)) -> bool {
        let (dx, dy) = (p.0 - self.center.0, p.1 - self.center.1);
        (dx * dx + dy * dy).sqrt() <= self.radius + 1e-7
    }

    fn from_two(a: (f64, f64), b: (f64, f64)) -> Self {
        let center = ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
        let radius = ((a.0 - b.0).hypot(a.1 - b.1)) / 2.0;
        Self { center, radius }
    }

    fn from_three(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Option<Self> {
        let d = 2.0 * (a.0 * (b.1 - c.1) + b.0 * (c.1 - a.1) + c.0 * (a.1 - b.1));
        if d.abs() < 1e-12 {
            return None;
        }
        let a2 = a.0 * a.0 + a.1 * a.1;
        let b2 = b.0 * b.0 + b.1 * b.1;
        let c2 = c.0 * c.0 + c.1 * c.1;
        let ux = (a2 * (b.1 - c.1) + b2 * (c.1 - a.1) + c2 * (a.1 - b.1)) / d;
        let uy = (a2 * (c.0 - b.0) + b2 * (a.0 - c.0) + c2 * (b.0 - a.0)) / d;
        let radius = (a.0 - ux).hypot(a.1 - uy);
        Some(Self { center: (ux, uy), radius })
    }
}

/// Smallest circle containing every point (incremental Welzl construction)
pub fn min_enclosing_circle(points: &[Point<i32>]) -> Option<Circle> {
    let pts: Vec<(f64, f64)> = points.iter().map(|p| (p.x as f64, p.y as f64)).collect();
    let first = *pts.first()?;

    let mut circle = Circle { center: first, radius: 0.0 };
    for i in 1..pts.len() {
        if circle.contains(pts[i]) {
            continue;
        }
        circle = Circle { center: pts[i], radius: 0.0 };
        for j in 0..i {
            if circle.contains(pts[j]) {
                continue;
            }
            circle = Circle::from_two(pts[i], pts[j]);
            for k in 0..j {
                if circle.contains(pts[k]) {
                    continue;
                }
                // Collinear triples have no circumcircle
                if let Some(c) = Circle::from_three(pts[i], pts[j], pts[k]) {
                    circle = c;
                }
            }
        }
    }
    Some(circle)
}

/// Ratio of the hull's area to the area of its minimum enclosing circle
pub fn circularity(hull: &[Point<i32>]) -> Option<f64> {
    let circle = min_enclosing_circle(hull)?;
    if circle.radius <= MIN_CIRCLE_RADIUS {
        return None;
    }
    Some(contour_area(hull) / (std::f64::consts::PI * circle.radius * circle.radius))
}

fn farthest_from(points: &[Point<i32>], from: Point<i32>) -> usize {
    let dist2 = |p: &Point<i32>| {
        let (dx, dy) = ((p.x - from.x) as i64, (p.y - from.y) as i64);
        dx * dx + dy * dy
    };
    let mut best = 0;
    for (i, p) in points.iter().enumerate() {
        if dist2(p) > dist2(&points[best]) {
            best = i;
        }
    }
    best
}

/// Douglas-Peucker on a closed polygon. The ring is cut at two mutually
/// distant vertices and each open chain is simplified separately, so the
/// result never depends on where the ring happens to start.
pub fn approximate_closed_polygon(ring: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    if ring.len() < 3 || epsilon <= 0.0 {
        return ring.to_vec();
    }

    let a = farthest_from(ring, ring[0]);
    let b = farthest_from(ring, ring[a]);
    if a == b {
        return vec![ring[a]];
    }
    let (a, b) = (a.min(b), a.max(b));

    let first_chain = &ring[a..=b];
    let second_chain: Vec<Point<i32>> = ring[b..].iter().chain(ring[..=a].iter()).copied().collect();

    let mut approx = approximate_polygon_dp(first_chain, epsilon, false);
    let second = approximate_polygon_dp(&second_chain, epsilon, false);

    // Both chains share their endpoints
    approx.pop();
    approx.extend(second);
    approx.pop();
    approx
}

/// Classify a contour as a circle, triangle, square, rectangle or unknown
pub fn classify_shape(contour: &[Point<i32>]) -> Shape {
    if contour.len() < 3 {
        return Shape::Unknown;
    }

    let hull = convex_hull(contour);
    if hull.len() < 3 {
        return Shape::Unknown;
    }

    if let Some(c) = circularity(&hull) {
        if c > CIRCULARITY_MIN && c < CIRCULARITY_MAX {
            return Shape::Circle;
        }
    }

    let perimeter = arc_length(&hull, true);
    let approx = approximate_closed_polygon(&hull, APPROX_EPSILON_RATIO * perimeter);

    match approx.len() {
        3 => Shape::Triangle,
        4 => {
            let Some(rect) = bounding_rect(&approx) else {
                return Shape::Unknown;
            };
            let aspect_ratio = rect.width() as f64 / rect.height() as f64;
            if (SQUARE_ASPECT_MIN..=SQUARE_ASPECT_MAX).contains(&aspect_ratio) {
                Shape::Square
            } else {
                Shape::Rectangle
            }
        }
        _ => Shape::Unknown,
    }
}
