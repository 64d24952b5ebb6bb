//! Wheel-well detection modules
//!
//! This module contains the geometric search over a binary edge map:
//! - Horizontal line extraction (fender, rocker and ground lines)
//! - Semicircle detection (Hough-style voting for wheel arches)
//! - Assembly (pairing arches with supporting lines, frame confidence)

/// Cross-validation of arcs and lines into wheel wells
pub mod assembler;
/// Semicircle detection by coarse-to-fine arc voting
pub mod arcs;
/// Horizontal line extraction by run scanning
pub mod lines;

pub use arcs::{SemiCircleDetector, detect_semi_circles};
pub use assembler::{WheelWellAssembler, detect_wheel_wells, detect_wheel_wells_with_workspace};
pub use lines::{HorizontalLineDetector, detect_horizontal_lines};
