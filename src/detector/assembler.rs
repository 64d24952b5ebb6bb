/// Cross-validation of arcs against horizontal lines
use crate::config::DetectionOptions;
use crate::detector::arcs::SemiCircleDetector;
use crate::detector::lines::HorizontalLineDetector;
use crate::models::{DetectionResult, EdgeMap, HorizontalLine, SemiCircle, WheelWell};
use crate::utils::memory_pool::DetectionWorkspace;
use log::debug;
use std::time::Instant;

/// Arc center may sit at most this many radii above or below its line
const SUPPORT_DISTANCE_RATIO: f32 = 1.5;
/// Weight of line support in a wheel-well score
const LINE_WEIGHT: f32 = 0.4;
/// Weight of arc support in a wheel-well score
const ARC_WEIGHT: f32 = 0.6;
/// A lone wheel well is weaker evidence than a pair
const SINGLE_WELL_FACTOR: f32 = 0.8;

/// Pairs arcs with lines and scores the frame
pub struct WheelWellAssembler;

impl WheelWellAssembler {
    /// Pair every arc with its nearest supporting line and score the frame.
    ///
    /// All lines are returned in the result; arcs without support are dropped.
    pub fn assemble(circles: &[SemiCircle], lines: Vec<HorizontalLine>) -> DetectionResult {
        let candidates: Vec<WheelWell> = circles
            .iter()
            .filter_map(|circle| {
                Self::find_support(circle, &lines).map(|line| WheelWell {
                    x: circle.center_x,
                    y: circle.center_y,
                    radius: circle.radius,
                    line_y: line.y,
                    score: Self::combine_score(circle, line),
                })
            })
            .collect();

        let matched = candidates.len();
        let wheel_wells = Self::merge_duplicates(candidates);
        let confidence = Self::frame_confidence(&wheel_wells);

        debug!(
            "assemble: {} arcs, {} lines, {} matched, {} wheel wells, confidence {:.3}",
            circles.len(),
            lines.len(),
            matched,
            wheel_wells.len(),
            confidence
        );

        DetectionResult {
            confidence,
            wheel_wells,
            horizontal_lines: lines,
        }
    }

    /// Nearest line (by vertical distance) that supports `circle`.
    ///
    /// Ties go to the longer line, then to the earlier one in `lines`.
    fn find_support<'l>(
        circle: &SemiCircle,
        lines: &'l [HorizontalLine],
    ) -> Option<&'l HorizontalLine> {
        let max_distance = circle.radius * SUPPORT_DISTANCE_RATIO;
        lines
            .iter()
            .filter(|line| {
                (circle.center_y - line.y as f32).abs() < max_distance
                    && line.spans(circle.center_x, circle.radius)
            })
            .min_by(|a, b| {
                let da = (circle.center_y - a.y as f32).abs();
                let db = (circle.center_y - b.y as f32).abs();
                da.total_cmp(&db).then(b.length.cmp(&a.length))
            })
    }

    fn combine_score(circle: &SemiCircle, line: &HorizontalLine) -> f32 {
        let diameter = (2.0 * circle.radius).max(1.0);
        let line_support = (line.length as f32 / diameter).min(1.0);
        (LINE_WEIGHT * line_support + ARC_WEIGHT * circle.score).clamp(0.0, 1.0)
    }

    /// Keep one well per wheel: a well whose center falls within the radius of
    /// a better-scoring well is dropped. Output is sorted by x.
    fn merge_duplicates(mut wells: Vec<WheelWell>) -> Vec<WheelWell> {
        wells.sort_by(|a, b| b.score.total_cmp(&a.score));

        let mut kept: Vec<WheelWell> = Vec::new();
        for well in wells {
            let duplicate = kept.iter().any(|k| {
                k.center().distance(&well.center()) < k.radius.max(well.radius)
            });
            if !duplicate {
                kept.push(well);
            }
        }

        kept.sort_by(|a, b| a.x.total_cmp(&b.x));
        kept
    }

    /// Mean of the two best scores; a single well is discounted
    fn frame_confidence(wells: &[WheelWell]) -> f32 {
        let mut scores: Vec<f32> = wells.iter().map(|w| w.score).collect();
        scores.sort_by(|a, b| b.total_cmp(a));

        let confidence = match scores.as_slice() {
            [] => 0.0,
            [only] => only * SINGLE_WELL_FACTOR,
            [first, second, ..] => (first + second) / 2.0,
        };
        confidence.clamp(0.0, 1.0)
    }
}

/// Full pipeline: lines, arcs, then cross-validation
pub fn detect_wheel_wells(edges: &EdgeMap<'_>, options: &DetectionOptions) -> DetectionResult {
    let mut workspace = DetectionWorkspace::new();
    detect_wheel_wells_with_workspace(edges, options, &mut workspace)
}

/// Full pipeline reusing a caller-owned workspace
pub fn detect_wheel_wells_with_workspace(
    edges: &EdgeMap<'_>,
    options: &DetectionOptions,
    workspace: &mut DetectionWorkspace,
) -> DetectionResult {
    let t0 = Instant::now();
    workspace.prepare(
        edges,
        options.edge_threshold,
        options.coarse_tolerance,
        options.fine_tolerance,
    );
    if workspace.edges.count_ones() == 0 {
        debug!(
            "detect_wheel_wells {}x{}: no edge pixels",
            edges.width(),
            edges.height()
        );
        return DetectionResult::empty();
    }

    let lines = HorizontalLineDetector::detect(edges, options);
    let t_lines = t0.elapsed();

    let circles = SemiCircleDetector::detect_prepared(workspace, options);
    let t_arcs = t0.elapsed() - t_lines;

    let result = WheelWellAssembler::assemble(&circles, lines);
    debug!(
        "detect_wheel_wells {}x{}: lines {:.2} ms, arcs {:.2} ms, total {:.2} ms",
        edges.width(),
        edges.height(),
        t_lines.as_secs_f64() * 1000.0,
        t_arcs.as_secs_f64() * 1000.0,
        t0.elapsed().as_secs_f64() * 1000.0
    );
    result
}
