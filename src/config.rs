//! Detection options shared by the line detector, the semicircle detector and
//! the assembler.
//!
//! Options can be built in code, deserialized from (partial) JSON, or read from
//! `WW_*` environment variables with [`DetectionOptions::from_env`].

use crate::error::{DetectError, DetectResult};
use serde::{Deserialize, Serialize};

fn parse_env_i32(name: &str, default: i32) -> i32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<i32>().ok())
        .unwrap_or(default)
}

fn parse_env_f32(name: &str, default: f32) -> f32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn parse_env_u8(name: &str, default: u8) -> u8 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .unwrap_or(default)
}

/// Largest edge-match tolerance accepted by [`DetectionOptions::validate`]
pub const MAX_TOLERANCE: usize = 32;
/// Largest per-arc sample count accepted by [`DetectionOptions::validate`]
pub const MAX_ARC_SAMPLES: usize = 720;

/// Tunable parameters for wheel-well detection.
///
/// The first four fields are the public knobs callers usually touch; the rest
/// tune the Hough search and rarely need changing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectionOptions {
    /// Shortest horizontal run (in pixels) reported as a line
    pub min_line_length: i32,
    /// Fraction of the frame height above which nothing is searched
    pub search_region_start: f32,
    /// Smallest arch radius considered
    pub min_radius: f32,
    /// Largest arch radius considered
    pub max_radius: f32,
    /// Largest run of non-edge pixels bridged inside a horizontal line
    pub max_line_gap: i32,
    /// Intensities strictly above this value are edge pixels
    pub edge_threshold: u8,
    /// Minimum fraction of arc samples that must land on edges
    pub min_arc_score: f32,
    /// Coarse Hough grid spacing for arc centers
    pub hough_center_step: usize,
    /// Coarse Hough grid spacing for radii
    pub hough_radius_step: usize,
    /// Number of samples taken along each upper half-circle
    pub arc_samples: usize,
    /// Edge-match tolerance (pixels) used on the coarse grid
    pub coarse_tolerance: usize,
    /// Edge-match tolerance (pixels) used during refinement
    pub fine_tolerance: usize,
    /// Upper bound on coarse proposals passed to refinement
    pub max_refined_candidates: usize,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            min_line_length: 40,
            search_region_start: 1.0 / 3.0,
            min_radius: 20.0,
            max_radius: 120.0,
            max_line_gap: 2,
            edge_threshold: 0,
            min_arc_score: 0.5,
            hough_center_step: 5,
            hough_radius_step: 5,
            arc_samples: 36,
            coarse_tolerance: 4,
            fine_tolerance: 1,
            max_refined_candidates: 48,
        }
    }
}

impl DetectionOptions {
    /// Defaults overlaid with any `WW_*` environment overrides.
    ///
    /// Unparseable values are ignored. Nothing is cached, so each call sees
    /// the current environment.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_line_length: parse_env_i32("WW_MIN_LINE_LENGTH", defaults.min_line_length),
            search_region_start: parse_env_f32(
                "WW_SEARCH_REGION_START",
                defaults.search_region_start,
            ),
            min_radius: parse_env_f32("WW_MIN_RADIUS", defaults.min_radius),
            max_radius: parse_env_f32("WW_MAX_RADIUS", defaults.max_radius),
            min_arc_score: parse_env_f32("WW_MIN_ARC_SCORE", defaults.min_arc_score),
            edge_threshold: parse_env_u8("WW_EDGE_THRESHOLD", defaults.edge_threshold),
            ..defaults
        }
    }

    /// Set the minimum line length
    pub fn with_min_line_length(mut self, min_line_length: i32) -> Self {
        self.min_line_length = min_line_length;
        self
    }

    /// Set the search band start as a fraction of the frame height
    pub fn with_search_region_start(mut self, fraction: f32) -> Self {
        self.search_region_start = fraction;
        self
    }

    /// Set the minimum arch radius
    pub fn with_min_radius(mut self, min_radius: f32) -> Self {
        self.min_radius = min_radius;
        self
    }

    /// Set the maximum arch radius
    pub fn with_max_radius(mut self, max_radius: f32) -> Self {
        self.max_radius = max_radius;
        self
    }

    /// Set the edge binarization threshold
    pub fn with_edge_threshold(mut self, threshold: u8) -> Self {
        self.edge_threshold = threshold;
        self
    }

    /// Reject option sets the detectors cannot run with.
    pub fn validate(&self) -> DetectResult<()> {
        if self.min_line_length < 0 {
            return Err(DetectError::InvalidOptions(format!(
                "minLineLength must be non-negative, got {}",
                self.min_line_length
            )));
        }
        if !(0.0..1.0).contains(&self.search_region_start) {
            return Err(DetectError::InvalidOptions(format!(
                "searchRegionStart must be in [0, 1), got {}",
                self.search_region_start
            )));
        }
        if !self.min_radius.is_finite() || !self.max_radius.is_finite() || self.min_radius <= 0.0
        {
            return Err(DetectError::InvalidOptions(format!(
                "radii must be finite and positive, got [{}, {}]",
                self.min_radius, self.max_radius
            )));
        }
        if self.min_radius > self.max_radius {
            return Err(DetectError::InvalidOptions(format!(
                "minRadius {} exceeds maxRadius {}",
                self.min_radius, self.max_radius
            )));
        }
        if self.max_line_gap < 0 {
            return Err(DetectError::InvalidOptions(format!(
                "maxLineGap must be non-negative, got {}",
                self.max_line_gap
            )));
        }
        if !(self.min_arc_score > 0.0 && self.min_arc_score <= 1.0) {
            return Err(DetectError::InvalidOptions(format!(
                "minArcScore must be in (0, 1], got {}",
                self.min_arc_score
            )));
        }
        if self.hough_center_step == 0 || self.hough_radius_step == 0 {
            return Err(DetectError::InvalidOptions(
                "Hough grid steps must be at least 1".to_string(),
            ));
        }
        if !(8..=MAX_ARC_SAMPLES).contains(&self.arc_samples) {
            return Err(DetectError::InvalidOptions(format!(
                "arcSamples must be in [8, {}], got {}",
                MAX_ARC_SAMPLES, self.arc_samples
            )));
        }
        if self.coarse_tolerance > MAX_TOLERANCE || self.fine_tolerance > MAX_TOLERANCE {
            return Err(DetectError::InvalidOptions(format!(
                "tolerances must be at most {}px, got coarse {} / fine {}",
                MAX_TOLERANCE, self.coarse_tolerance, self.fine_tolerance
            )));
        }
        if self.max_refined_candidates == 0 {
            return Err(DetectError::InvalidOptions(
                "maxRefinedCandidates must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// First row index strictly inside the search band
    pub(crate) fn band_start_row(&self, height: usize) -> usize {
        let limit = height as f64 * f64::from(self.search_region_start);
        // rows with y > limit
        (limit.floor() as usize + 1).min(height)
    }
}
