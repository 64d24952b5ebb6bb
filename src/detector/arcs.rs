/// Semicircle (wheel-arch) detection by coarse-to-fine Hough-style voting
///
/// Every candidate `(cx, cy, r)` is scored by sampling the upper half of the
/// circle and counting samples that land on a tolerance-dilated edge mask. A
/// coarse grid with a wide tolerance proposes seeds, each seed is refined on a
/// 1-pixel grid with a tight tolerance, and near-duplicate arcs are suppressed.
use crate::config::DetectionOptions;
use crate::models::{BitMatrix, EdgeMap, SemiCircle};
use crate::utils::memory_pool::DetectionWorkspace;
use log::{debug, trace};
use std::cmp::Ordering;
use std::f32::consts::PI;

/// Coarse proposals must reach this fraction of the final acceptance score
const COARSE_SCORE_RATIO: f32 = 0.75;
/// Duplicate arcs: centers closer than this fraction of the larger radius...
const NMS_CENTER_RATIO: f32 = 0.5;
/// ...and radii differing by at most this fraction of the larger radius
const NMS_RADIUS_RATIO: f32 = 0.35;
/// Each outer third of the arc must have this fraction of its samples on edges
const LEG_SUPPORT_RATIO: f32 = 0.25;

/// Precomputed sample directions along the upper half circle
struct ArcTable {
    dirs: Vec<(f32, f32)>,
}

impl ArcTable {
    fn new(samples: usize) -> Self {
        let last = (samples - 1) as f32;
        let dirs = (0..samples)
            .map(|i| {
                let theta = PI * i as f32 / last;
                (theta.cos(), theta.sin())
            })
            .collect();
        Self { dirs }
    }

    fn len(&self) -> usize {
        self.dirs.len()
    }

    /// Hits needed to reach `score`
    fn min_hits(&self, score: f32) -> usize {
        ((score * self.len() as f32).ceil() as usize).clamp(1, self.len())
    }

    /// Fraction of samples on `mask`, or `None` once `min_hits` is out of reach
    fn score(&self, mask: &BitMatrix, cx: f32, cy: f32, r: f32, min_hits: usize) -> Option<f32> {
        let allowed_misses = self.len() - min_hits;
        let mut hits = 0usize;
        let mut misses = 0usize;

        for &(cos, sin) in &self.dirs {
            let x = (cx + r * cos).round() as i32;
            let y = (cy - r * sin).round() as i32;
            if mask.get_signed(x, y) {
                hits += 1;
            } else {
                misses += 1;
                if misses > allowed_misses {
                    return None;
                }
            }
        }

        Some(hits as f32 / self.len() as f32)
    }

    /// Samples landing exactly on `mask`, without early exit
    fn hits(&self, mask: &BitMatrix, cx: f32, cy: f32, r: f32) -> usize {
        Self::count_on(&self.dirs, mask, cx, cy, r)
    }

    /// Both legs of the arch (first and last third of the samples) carry
    /// support. Rejects arcs that only graze a straight edge at their crown.
    fn legs_supported(&self, mask: &BitMatrix, cx: f32, cy: f32, r: f32) -> bool {
        let leg = self.len() / 3;
        if leg == 0 {
            return true;
        }
        let needed = ((leg as f32 * LEG_SUPPORT_RATIO).ceil() as usize).max(1);
        let right = &self.dirs[..leg];
        let left = &self.dirs[self.len() - leg..];
        Self::count_on(right, mask, cx, cy, r) >= needed
            && Self::count_on(left, mask, cx, cy, r) >= needed
    }

    fn count_on(dirs: &[(f32, f32)], mask: &BitMatrix, cx: f32, cy: f32, r: f32) -> usize {
        dirs.iter()
            .filter(|&&(cos, sin)| {
                mask.get_signed((cx + r * cos).round() as i32, (cy - r * sin).round() as i32)
            })
            .count()
    }
}

/// A scored circle plus the tie-breaking evidence used to rank it
#[derive(Debug, Clone, Copy)]
struct Candidate {
    circle: SemiCircle,
    /// Samples on the raw (undilated) edge mask; zero for coarse proposals
    exact_hits: usize,
}

impl Candidate {
    fn coarse(circle: SemiCircle) -> Self {
        Self {
            circle,
            exact_hits: 0,
        }
    }

    /// Ranking: score, then exact hits, then the larger radius.
    ///
    /// A wheel arch encloses the tire below it, so among equally supported
    /// concentric arcs the outer one is the wheel well.
    fn rank(a: &Self, b: &Self) -> Ordering {
        b.circle
            .score
            .total_cmp(&a.circle.score)
            .then(b.exact_hits.cmp(&a.exact_hits))
            .then(b.circle.radius.total_cmp(&a.circle.radius))
    }
}

/// Valid center range for radius `r`: the whole upper arc stays in the frame
/// and the center sits inside the search band.
#[derive(Debug, Clone, Copy)]
struct CenterBounds {
    x_min: f32,
    x_max: f32,
    y_min: f32,
    y_max: f32,
}

impl CenterBounds {
    fn new(width: usize, height: usize, band_start: usize, r: f32) -> Option<Self> {
        let bounds = Self {
            x_min: r.ceil(),
            x_max: ((width - 1) as f32 - r).floor(),
            y_min: r.ceil().max(band_start as f32),
            y_max: (height - 1) as f32,
        };
        (bounds.x_min <= bounds.x_max && bounds.y_min <= bounds.y_max).then_some(bounds)
    }

    fn contains(&self, cx: f32, cy: f32) -> bool {
        cx >= self.x_min && cx <= self.x_max && cy >= self.y_min && cy <= self.y_max
    }
}

/// Upper-arc detector over a binary edge map
pub struct SemiCircleDetector;

impl SemiCircleDetector {
    /// Detect upward-bulging arcs using call-local buffers
    pub fn detect(edges: &EdgeMap<'_>, options: &DetectionOptions) -> Vec<SemiCircle> {
        let mut workspace = DetectionWorkspace::new();
        Self::detect_with_workspace(edges, options, &mut workspace)
    }

    /// Detect arcs reusing a caller-owned workspace
    pub fn detect_with_workspace(
        edges: &EdgeMap<'_>,
        options: &DetectionOptions,
        workspace: &mut DetectionWorkspace,
    ) -> Vec<SemiCircle> {
        workspace.prepare(
            edges,
            options.edge_threshold,
            options.coarse_tolerance,
            options.fine_tolerance,
        );
        Self::detect_prepared(workspace, options)
    }

    /// Run the search on masks already built by [`DetectionWorkspace::prepare`]
    pub(crate) fn detect_prepared(
        workspace: &DetectionWorkspace,
        options: &DetectionOptions,
    ) -> Vec<SemiCircle> {
        let width = workspace.width();
        let height = workspace.height();
        if width == 0 || height == 0 || workspace.edges.count_ones() == 0 {
            return Vec::new();
        }
        let Some(limits) = radius_limits(options, width, height) else {
            return Vec::new();
        };
        let radii = radius_grid(limits, options.hough_radius_step);

        let min_score = options.min_arc_score.clamp(f32::EPSILON, 1.0);
        let table = ArcTable::new(options.arc_samples.max(8));
        let band_start = options.band_start_row(height);

        let proposals = Self::coarse_scan(
            &workspace.coarse,
            &table,
            &radii,
            band_start,
            options.hough_center_step.max(1),
            table.min_hits(min_score * COARSE_SCORE_RATIO),
        );
        let seeds = suppress_duplicates(proposals, options.max_refined_candidates);

        let fine_hits = table.min_hits(min_score);
        let half_window = options.hough_center_step.max(options.hough_radius_step) as i32;
        let refined: Vec<Candidate> = seeds
            .iter()
            .filter_map(|seed| {
                Self::refine(
                    workspace,
                    &table,
                    &seed.circle,
                    half_window,
                    limits,
                    band_start,
                    fine_hits,
                )
            })
            .collect();

        let circles: Vec<SemiCircle> = suppress_duplicates(refined, usize::MAX)
            .into_iter()
            .map(|c| c.circle)
            .collect();
        debug!(
            "arcs: {} radii, {} seeds, {} accepted",
            radii.len(),
            seeds.len(),
            circles.len()
        );
        circles
    }

    fn coarse_scan(
        mask: &BitMatrix,
        table: &ArcTable,
        radii: &[f32],
        band_start: usize,
        step: usize,
        min_hits: usize,
    ) -> Vec<Candidate> {
        let width = mask.width();
        let height = mask.height();
        let step_f = step as f32;
        let mut proposals = Vec::new();

        for &r in radii {
            let Some(bounds) = CenterBounds::new(width, height, band_start, r) else {
                continue;
            };
            // Grid aligned to absolute multiples of the step
            let mut cy = (bounds.y_min / step_f).ceil() * step_f;
            while cy <= bounds.y_max {
                let mut cx = (bounds.x_min / step_f).ceil() * step_f;
                while cx <= bounds.x_max {
                    if let Some(score) = table.score(mask, cx, cy, r, min_hits) {
                        proposals.push(Candidate::coarse(SemiCircle {
                            center_x: cx,
                            center_y: cy,
                            radius: r,
                            score,
                        }));
                    }
                    cx += step_f;
                }
                cy += step_f;
            }
        }

        trace!("arcs: {} coarse proposals", proposals.len());
        proposals
    }

    /// Best circle near `seed` on the fine mask.
    ///
    /// Equal fine scores are broken by exact hits on the raw edge mask, so a
    /// one-pixel-off radius does not win over the true one. Circles whose
    /// legs have no support are skipped.
    fn refine(
        workspace: &DetectionWorkspace,
        table: &ArcTable,
        seed: &SemiCircle,
        half_window: i32,
        (r_min, r_max): (f32, f32),
        band_start: usize,
        min_hits: usize,
    ) -> Option<Candidate> {
        let fine = &workspace.fine;
        let mut best: Option<Candidate> = None;

        for dr in -half_window..=half_window {
            let r = seed.radius + dr as f32;
            if r < r_min || r > r_max {
                continue;
            }
            let Some(bounds) = CenterBounds::new(fine.width(), fine.height(), band_start, r) else {
                continue;
            };
            for dy in -half_window..=half_window {
                let cy = seed.center_y + dy as f32;
                for dx in -half_window..=half_window {
                    let cx = seed.center_x + dx as f32;
                    if !bounds.contains(cx, cy) {
                        continue;
                    }
                    let Some(score) = table.score(fine, cx, cy, r, min_hits) else {
                        continue;
                    };
                    if best.is_some_and(|b| score < b.circle.score) {
                        continue;
                    }
                    if !table.legs_supported(fine, cx, cy, r) {
                        continue;
                    }
                    let exact_hits = table.hits(&workspace.edges, cx, cy, r);
                    let better = match best {
                        None => true,
                        Some(b) => score > b.circle.score || exact_hits > b.exact_hits,
                    };
                    if better {
                        best = Some(Candidate {
                            circle: SemiCircle {
                                center_x: cx,
                                center_y: cy,
                                radius: r,
                                score,
                            },
                            exact_hits,
                        });
                    }
                }
            }
        }

        best
    }
}

/// Detect semicircles with the given options
pub fn detect_semi_circles(edges: &EdgeMap<'_>, options: &DetectionOptions) -> Vec<SemiCircle> {
    SemiCircleDetector::detect(edges, options)
}

/// Radius range actually searched: `max_radius` is capped at the largest arc
/// that fits the frame. `None` when nothing fits.
fn radius_limits(options: &DetectionOptions, width: usize, height: usize) -> Option<(f32, f32)> {
    let r_min = options.min_radius.max(1.0);
    let fit = ((width.saturating_sub(1) / 2).min(height.saturating_sub(1))) as f32;
    let r_max = options.max_radius.min(fit);
    (r_min.is_finite() && r_max.is_finite() && r_min <= r_max).then_some((r_min, r_max))
}

/// Radii `r_min + i * step`, always ending at `r_max`
fn radius_grid((r_min, r_max): (f32, f32), step: usize) -> Vec<f32> {
    let step = step.max(1) as f32;
    let count = ((r_max - r_min) / step).floor() as usize;
    let mut radii: Vec<f32> = (0..=count).map(|i| r_min + i as f32 * step).collect();
    if radii.last().is_some_and(|&r| r < r_max) {
        radii.push(r_max);
    }
    radii
}

fn is_duplicate(a: &SemiCircle, b: &SemiCircle) -> bool {
    let r_big = a.radius.max(b.radius);
    a.center().distance(&b.center()) <= NMS_CENTER_RATIO * r_big
        && (a.radius - b.radius).abs() <= NMS_RADIUS_RATIO * r_big
}

/// Greedy non-maximum suppression over [`Candidate::rank`] order.
///
/// The sort is stable, so full ties keep grid-scan order and the output is
/// deterministic.
fn suppress_duplicates(mut candidates: Vec<Candidate>, limit: usize) -> Vec<Candidate> {
    candidates.sort_by(Candidate::rank);

    let mut kept: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        if kept.len() >= limit {
            break;
        }
        if kept
            .iter()
            .any(|k| is_duplicate(&k.circle, &candidate.circle))
        {
            continue;
        }
        kept.push(candidate);
    }
    kept
}
