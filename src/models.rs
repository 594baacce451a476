use image::Rgb;
use imageproc::point::Point;
use imageproc::rect::Rect;
use std::collections::VecDeque;
use std::fmt;

/// Inclusive HSV bounds in OpenCV's 8-bit convention (H in 0..=180).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| hsv[c] >= self.lower[c] && hsv[c] <= self.upper[c])
    }
}

/// Labels assigned by the shape classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Triangle,
    Square,
    Rectangle,
    Unknown,
}

impl Shape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Circle => "Circle",
            Shape::Triangle => "Triangle",
            Shape::Square => "Square",
            Shape::Rectangle => "Rectangle",
            Shape::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-capacity position history. `None` entries are gaps that break
/// the rendered trail.
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<Option<(i32, i32)>>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a position (or a gap), evicting the oldest entry when full
    pub fn push(&mut self, point: Option<(i32, i32)>) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Option<(i32, i32)>> {
        self.points.iter()
    }

    /// Drawable segments, oldest first. Each item is `(index, from, to)` where
    /// `index` is the 1-based position of `to` in the trail.
    pub fn segments(&self) -> Vec<(usize, (i32, i32), (i32, i32))> {
        let mut segments = Vec::new();
        for i in 1..self.points.len() {
            if let (Some(from), Some(to)) = (self.points[i - 1], self.points[i]) {
                segments.push((i, from, to));
            }
        }
        segments
    }
}

/// A tracked color: its HSV bands, how it is drawn and its per-frame history
#[derive(Debug, Clone)]
pub struct ColorProfile {
    pub name: String,
    pub ranges: Vec<HsvRange>,
    pub display_color: Rgb<u8>,
    pub trail: Trail,
    pub last_position: Option<(i32, i32)>,
    pub velocity: (i32, i32),
}

impl ColorProfile {
    pub fn new(
        name: impl Into<String>,
        ranges: Vec<HsvRange>,
        display_color: Rgb<u8>,
        trail_capacity: usize,
    ) -> Self {
        Self {
            name: name.into(),
            ranges,
            display_color,
            trail: Trail::new(trail_capacity),
            last_position: None,
            velocity: (0, 0),
        }
    }

    /// Red wraps around hue 0, so it needs two bands
    pub fn red(trail_capacity: usize) -> Self {
        Self::new(
            "Red",
            vec![
                HsvRange::new([0, 130, 80], [10, 255, 255]),
                HsvRange::new([168, 130, 80], [180, 255, 255]),
            ],
            Rgb([255, 0, 0]),
            trail_capacity,
        )
    }

    pub fn yellow(trail_capacity: usize) -> Self {
        Self::new(
            "Yellow",
            vec![HsvRange::new([20, 120, 100], [35, 255, 255])],
            Rgb([255, 255, 0]),
            trail_capacity,
        )
    }

    /// Record this frame's largest-object centroid, or a gap when nothing was seen
    pub fn record(&mut self, position: Option<(i32, i32)>) {
        self.trail.push(position);
        if let Some((x, y)) = position {
            if let Some((px, py)) = self.last_position {
                self.velocity = (x - px, y - py);
            }
            self.last_position = Some((x, y));
        }
    }

    pub fn reset(&mut self) {
        self.trail.clear();
        self.last_position = None;
        self.velocity = (0, 0);
    }
}

/// One color blob found in the current frame
#[derive(Debug, Clone)]
pub struct DetectedObject {
    pub color_name: String,
    pub center: (i32, i32),
    pub area: f64,
    pub contour: Vec<Point<i32>>,
    pub bbox: Rect,
    pub shape: Shape,
}

impl DetectedObject {
    pub fn label(&self) -> String {
        format!("{} {}", self.color_name, self.shape)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Proximity,
    Collision,
}

/// A red/yellow pair closer than the proximity threshold
#[derive(Debug, Clone)]
pub struct Interaction {
    pub red_index: usize,
    pub yellow_index: usize,
    pub distance: f64,
    pub kind: InteractionKind,
    pub red_center: (i32, i32),
    pub yellow_center: (i32, i32),
}

impl Interaction {
    pub fn midpoint(&self) -> (i32, i32) {
        (
            (self.red_center.0 + self.yellow_center.0).div_euclid(2),
            (self.red_center.1 + self.yellow_center.1).div_euclid(2),
        )
    }
}

/// Everything derived from one frame
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub red: Vec<DetectedObject>,
    pub yellow: Vec<DetectedObject>,
    pub interactions: Vec<Interaction>,
    pub collision: bool,
    pub faces: Vec<Rect>,
}

impl FrameReport {
    pub fn object_count(&self) -> usize {
        self.red.len() + self.yellow.len()
    }
}
