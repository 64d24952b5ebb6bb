use serde::{Deserialize, Serialize};

/// 2D point with floating point coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point
    pub fn distance(&self, other: &Point) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Calculate squared distance (faster, no sqrt)
    pub fn distance_squared(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Point on the upper half of a circle around `self` at angle `theta`.
    ///
    /// `theta = 0` is the right end, `theta = PI` the left end; image y grows
    /// downward, so the arc bulges toward smaller y.
    pub fn on_upper_arc(&self, radius: f32, theta: f32) -> Self {
        Self {
            x: self.x + radius * theta.cos(),
            y: self.y - radius * theta.sin(),
        }
    }
}
