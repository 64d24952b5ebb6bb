//! wheel_well - fast wheel-well detection on binary edge maps
//!
//! Locates the arch-shaped body cutouts above each tire in an edge-detected
//! side view of a vehicle. The result (arch center, radius, supporting line
//! and a frame confidence) anchors a downstream AR overlay.
//!
//! The whole pipeline is a pure function of the edge buffer and the options:
//! no globals, no caches, identical output for identical input.
//!
//! Arc voting and assembly run on the calling thread. The horizontal-line
//! scan spreads rows over the rayon pool and collects them back in row
//! order, so its output does not depend on scheduling.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Detection options and environment overrides
pub mod config;
/// Wheel-well detection modules (lines, arcs, assembly)
pub mod detector;
/// Error types
pub mod error;
/// Core data structures (EdgeMap, BitMatrix, WheelWell, etc.)
pub mod models;
/// Edge-map loading helpers for tools and the CLI
pub mod tools;
/// Utility functions (binarization, dilation, workspaces)
pub mod utils;

pub use config::DetectionOptions;
pub use detector::{detect_horizontal_lines, detect_semi_circles, detect_wheel_wells};
pub use error::{DetectError, DetectResult};
pub use models::{
    BoundingBox, ConfidenceLevel, DetectionResult, EdgeMap, HorizontalLine, PixelLayout, Point,
    SemiCircle, WheelWell,
};
pub use utils::memory_pool::DetectionWorkspace;

use detector::detect_wheel_wells_with_workspace;

/// Detect wheel wells in an RGBA edge image with default options
///
/// # Arguments
/// * `rgba` - Edge image, 4 bytes per pixel (alpha ignored)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
/// Detection result, or an error if the buffer does not match the dimensions
///
/// # Example
/// ```
/// let frame = vec![0u8; 640 * 480 * 4];
/// let result = wheel_well::detect(&frame, 640, 480).unwrap();
/// assert_eq!(result.confidence, 0.0);
/// assert!(result.wheel_wells.is_empty());
/// ```
pub fn detect(rgba: &[u8], width: usize, height: usize) -> DetectResult<DetectionResult> {
    let edges = EdgeMap::from_rgba(rgba, width, height)?;
    detect_with_options(&edges, &DetectionOptions::default())
}

/// Detect wheel wells in a single-channel edge image with default options
pub fn detect_from_luma(luma: &[u8], width: usize, height: usize) -> DetectResult<DetectionResult> {
    let edges = EdgeMap::from_luma(luma, width, height)?;
    detect_with_options(&edges, &DetectionOptions::default())
}

/// Validate `options`, then run the full pipeline
pub fn detect_with_options(
    edges: &EdgeMap<'_>,
    options: &DetectionOptions,
) -> DetectResult<DetectionResult> {
    options.validate()?;
    Ok(detect_wheel_wells(edges, options))
}

/// Validate `options`, then run the full pipeline on caller-owned buffers
///
/// Use this when processing many frames of similar size.
///
/// # Example
/// ```
/// use wheel_well::{DetectionOptions, DetectionWorkspace, EdgeMap};
///
/// let mut workspace = DetectionWorkspace::new();
/// let frame = vec![0u8; 320 * 240];
/// let edges = EdgeMap::from_luma(&frame, 320, 240).unwrap();
/// let result =
///     wheel_well::detect_with_workspace(&edges, &DetectionOptions::default(), &mut workspace)
///         .unwrap();
/// assert!(result.is_empty());
/// ```
pub fn detect_with_workspace(
    edges: &EdgeMap<'_>,
    options: &DetectionOptions,
    workspace: &mut DetectionWorkspace,
) -> DetectResult<DetectionResult> {
    options.validate()?;
    Ok(detect_wheel_wells_with_workspace(edges, options, workspace))
}

/// Detector with configuration options and an optional reusable workspace
pub struct Detector {
    options: DetectionOptions,
    /// Optional workspace for buffer reuse
    workspace: Option<DetectionWorkspace>,
}

impl Detector {
    /// Create a new detector with default settings
    pub fn new() -> Self {
        Self {
            options: DetectionOptions::default(),
            workspace: None,
        }
    }

    /// Create a detector with custom options, rejecting invalid ones
    pub fn with_options(options: DetectionOptions) -> DetectResult<Self> {
        options.validate()?;
        Ok(Self {
            options,
            workspace: None,
        })
    }

    /// Enable buffer reuse across calls
    pub fn with_workspace(mut self) -> Self {
        self.workspace = Some(DetectionWorkspace::new());
        self
    }

    /// Options this detector runs with
    pub fn options(&self) -> &DetectionOptions {
        &self.options
    }

    /// Detect wheel wells in an edge map
    pub fn detect(&mut self, edges: &EdgeMap<'_>) -> DetectionResult {
        match &mut self.workspace {
            Some(workspace) => detect_wheel_wells_with_workspace(edges, &self.options, workspace),
            None => detect_wheel_wells(edges, &self.options),
        }
    }

    /// Detect wheel wells in an RGBA buffer
    pub fn detect_rgba(
        &mut self,
        rgba: &[u8],
        width: usize,
        height: usize,
    ) -> DetectResult<DetectionResult> {
        let edges = EdgeMap::from_rgba(rgba, width, height)?;
        Ok(self.detect(&edges))
    }

    /// Detect wheel wells in a single-channel buffer
    pub fn detect_luma(
        &mut self,
        luma: &[u8],
        width: usize,
        height: usize,
    ) -> DetectResult<DetectionResult> {
        let edges = EdgeMap::from_luma(luma, width, height)?;
        Ok(self.detect(&edges))
    }

    /// Clear the internal workspace (keeps capacity)
    pub fn clear_workspace(&mut self) {
        if let Some(workspace) = &mut self.workspace {
            workspace.clear();
        }
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}
