/// Horizontal line extraction by gap-tolerant run scanning
use crate::config::DetectionOptions;
use crate::models::{EdgeMap, HorizontalLine};
use log::debug;
use rayon::prelude::*;

/// Row-run scanner for horizontal edge lines
pub struct HorizontalLineDetector;

impl HorizontalLineDetector {
    /// Find long horizontal edge runs in the lower search band.
    ///
    /// Output is sorted by length (longest first), then by row (lowest in the
    /// frame first), then by scan order.
    pub fn detect(edges: &EdgeMap<'_>, options: &DetectionOptions) -> Vec<HorizontalLine> {
        let width = edges.width();
        let height = edges.height();
        let first_row = options.band_start_row(height);
        if first_row >= height {
            return Vec::new();
        }

        let threshold = options.edge_threshold;
        let max_gap = options.max_line_gap.max(0) as usize;
        let min_len = options.min_line_length.max(0);

        // Rows are independent; collect keeps them in top-to-bottom order
        let rows: Vec<Vec<HorizontalLine>> = (first_row..height)
            .into_par_iter()
            .map(|y| Self::scan_row(edges, y, width, threshold, max_gap, min_len))
            .collect();

        let mut lines: Vec<HorizontalLine> = rows.into_iter().flatten().collect();
        Self::sort_lines(&mut lines);

        debug!(
            "lines: {} runs >= {}px in rows {}..{}",
            lines.len(),
            min_len,
            first_row,
            height
        );
        lines
    }

    fn scan_row(
        edges: &EdgeMap<'_>,
        y: usize,
        width: usize,
        threshold: u8,
        max_gap: usize,
        min_len: i32,
    ) -> Vec<HorizontalLine> {
        let mut lines = Vec::new();
        // (first edge x, last edge x) of the open run
        let mut run: Option<(usize, usize)> = None;

        for x in 0..width {
            if !edges.is_edge(x, y, threshold) {
                continue;
            }
            run = match run {
                Some((start, last)) if x - last - 1 <= max_gap => Some((start, x)),
                Some((start, last)) => {
                    Self::close_run(&mut lines, y, start, last, min_len);
                    Some((x, x))
                }
                None => Some((x, x)),
            };
        }
        if let Some((start, last)) = run {
            Self::close_run(&mut lines, y, start, last, min_len);
        }

        lines
    }

    fn close_run(
        lines: &mut Vec<HorizontalLine>,
        y: usize,
        start: usize,
        end: usize,
        min_len: i32,
    ) {
        let line = HorizontalLine::new(y as i32, start as i32, end as i32);
        if line.length >= min_len {
            lines.push(line);
        }
    }

    /// Stable sort: length descending, then larger y first
    fn sort_lines(lines: &mut [HorizontalLine]) {
        lines.sort_by(|a, b| b.length.cmp(&a.length).then(b.y.cmp(&a.y)));
    }
}

/// Detect horizontal lines with the given options
pub fn detect_horizontal_lines(
    edges: &EdgeMap<'_>,
    options: &DetectionOptions,
) -> Vec<HorizontalLine> {
    HorizontalLineDetector::detect(edges, options)
}
