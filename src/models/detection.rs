use super::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Horizontal run of edge pixels (fender, rocker or ground line)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizontalLine {
    /// Row of the run
    pub y: i32,
    /// First edge pixel of the run
    pub start_x: i32,
    /// Last edge pixel of the run
    pub end_x: i32,
    /// `end_x - start_x`
    pub length: i32,
}

impl HorizontalLine {
    /// Build a line from its row and inclusive endpoints (swapped if reversed)
    pub fn new(y: i32, start_x: i32, end_x: i32) -> Self {
        let (start_x, end_x) = if start_x <= end_x {
            (start_x, end_x)
        } else {
            (end_x, start_x)
        };
        Self {
            y,
            start_x,
            end_x,
            length: end_x - start_x,
        }
    }

    /// Whether `x` lies within the line extended by `margin` on both ends
    pub fn spans(&self, x: f32, margin: f32) -> bool {
        x >= self.start_x as f32 - margin && x <= self.end_x as f32 + margin
    }
}

/// Upward-bulging half circle found by the Hough search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemiCircle {
    /// Center x
    pub center_x: f32,
    /// Center y (the chord of the arc)
    pub center_y: f32,
    /// Radius in pixels
    pub radius: f32,
    /// Fraction of sampled arc points that hit edge pixels, in (0, 1]
    pub score: f32,
}

impl SemiCircle {
    /// Center as a point
    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }
}

/// Axis-aligned box in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
    /// Right edge
    pub x2: f32,
    /// Bottom edge
    pub y2: f32,
    /// `x2 - x1`
    pub width: f32,
    /// `y2 - y1`
    pub height: f32,
}

/// Semicircle validated by a supporting horizontal line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelWell {
    /// Arch center x
    pub x: f32,
    /// Arch center y
    pub y: f32,
    /// Arch radius
    pub radius: f32,
    /// Row of the line that validated the arch
    pub line_y: i32,
    /// Combined line and arc support, in [0, 1]
    pub score: f32,
}

impl WheelWell {
    /// Arch center as a point
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Extent of the arch down to its supporting line
    pub fn bounding_box(&self) -> BoundingBox {
        let x1 = self.x - self.radius;
        let y1 = self.y - self.radius;
        let x2 = self.x + self.radius;
        let y2 = (self.line_y as f32).max(self.y);
        BoundingBox {
            x1,
            y1,
            x2,
            y2,
            width: x2 - x1,
            height: y2 - y1,
        }
    }
}

/// Coarse verdict on a frame's confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    /// Confidence >= 0.75
    TireLikely,
    /// Confidence >= 0.5
    MaybeATire,
    /// Anything lower
    ProbablyNotATire,
}

impl ConfidenceLevel {
    /// Classify a confidence value
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence >= 0.75 {
            ConfidenceLevel::TireLikely
        } else if confidence >= 0.5 {
            ConfidenceLevel::MaybeATire
        } else {
            ConfidenceLevel::ProbablyNotATire
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfidenceLevel::TireLikely => "tire likely",
            ConfidenceLevel::MaybeATire => "maybe a tire",
            ConfidenceLevel::ProbablyNotATire => "probably not a tire",
        };
        f.write_str(label)
    }
}

/// Everything one detection call produces
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    /// Frame-level confidence in [0, 1]
    pub confidence: f32,
    /// Validated wheel wells, sorted by x
    pub wheel_wells: Vec<WheelWell>,
    /// Every horizontal line found, longest first
    pub horizontal_lines: Vec<HorizontalLine>,
}

impl DetectionResult {
    /// Result for a frame with no usable geometry
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no wheel well was found
    pub fn is_empty(&self) -> bool {
        self.wheel_wells.is_empty()
    }

    /// Classify the frame confidence
    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_confidence(self.confidence)
    }
}
