use imageproc::point::Point;

use crate::models::{DetectedObject, Interaction, InteractionKind};

fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len2 = dx * dx + dy * dy;
    let t = if len2 > 0.0 {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    (p.0 - cx).hypot(p.1 - cy)
}

/// Signed distance from `point` to the polygon's boundary: positive inside,
/// negative outside, zero on an edge. Returns `None` for an empty polygon.
pub fn point_polygon_distance(polygon: &[Point<i32>], point: (f64, f64)) -> Option<f64> {
    let n = polygon.len();
    if n == 0 {
        return None;
    }

    let mut min_dist = f64::INFINITY;
    let mut inside = false;

    for i in 0..n {
        let a = (polygon[i].x as f64, polygon[i].y as f64);
        let b = (polygon[(i + 1) % n].x as f64, polygon[(i + 1) % n].y as f64);

        min_dist = min_dist.min(segment_distance(point, a, b));

        // Even-odd crossing test on a horizontal ray to the right
        if (a.1 > point.1) != (b.1 > point.1) {
            let x_cross = a.0 + (point.1 - a.1) * (b.0 - a.0) / (b.1 - a.1);
            if point.0 < x_cross {
                inside = !inside;
            }
        }
    }

    if min_dist == 0.0 {
        Some(0.0)
    } else if inside {
        Some(min_dist)
    } else {
        Some(-min_dist)
    }
}

/// Minimum boundary distance between two contours. The contour with fewer
/// points is probed against the other.
pub fn contour_distance(a: &[Point<i32>], b: &[Point<i32>]) -> Option<f64> {
    let (probe, polygon) = if a.len() > b.len() { (b, a) } else { (a, b) };

    probe
        .iter()
        .filter_map(|p| point_polygon_distance(polygon, (p.x as f64, p.y as f64)))
        .map(f64::abs)
        .min_by(|x, y| x.total_cmp(y))
}

/// Thresholds for classifying red/yellow pairs
#[derive(Debug, Clone, Copy)]
pub struct InteractionThresholds {
    pub proximity: f64,
    pub collision: f64,
}

/// Check every red/yellow pair and report the ones within proximity range
pub fn detect_interactions(
    red: &[DetectedObject],
    yellow: &[DetectedObject],
    thresholds: InteractionThresholds,
) -> Vec<Interaction> {
    let mut interactions = Vec::new();

    for (ri, r) in red.iter().enumerate() {
        for (yi, y) in yellow.iter().enumerate() {
            let Some(distance) = contour_distance(&r.contour, &y.contour) else {
                continue;
            };
            if distance >= thresholds.proximity {
                continue;
            }

            let kind = if distance < thresholds.collision {
                InteractionKind::Collision
            } else {
                InteractionKind::Proximity
            };

            interactions.push(Interaction {
                red_index: ri,
                yellow_index: yi,
                distance,
                kind,
                red_center: r.center,
                yellow_center: y.center,
            });
        }
    }

    interactions
}
