/// Detection outputs
pub mod detection;
/// Borrowed edge-map view
pub mod edge_map;
/// Packed bit matrix
pub mod matrix;
/// 2D points
pub mod point;

pub use detection::{
    BoundingBox, ConfidenceLevel, DetectionResult, HorizontalLine, SemiCircle, WheelWell,
};
pub use edge_map::{EdgeMap, PixelLayout};
pub use matrix::BitMatrix;
pub use point::Point;
