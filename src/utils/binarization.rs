/// Edge-mask binarization and tolerance dilation
use crate::models::{BitMatrix, EdgeMap};

/// Binarize an edge map: a bit is set iff the pixel intensity exceeds `threshold`
pub fn edge_mask(edges: &EdgeMap<'_>, threshold: u8) -> BitMatrix {
    let mut mask = BitMatrix::new(edges.width(), edges.height());
    edge_mask_into(edges, threshold, &mut mask);
    mask
}

/// Binarize into a pre-allocated matrix (resized to fit)
pub fn edge_mask_into(edges: &EdgeMap<'_>, threshold: u8, out: &mut BitMatrix) {
    let width = edges.width();
    let height = edges.height();
    out.reset(width, height);

    for y in 0..height {
        for x in 0..width {
            if edges.is_edge(x, y, threshold) {
                out.set(x, y, true);
            }
        }
    }
}

/// Square dilation of `src` by `radius` pixels.
///
/// A bit is set in the output iff some set bit of `src` lies within the
/// `(2 * radius + 1)` square around it. Radius 0 copies the input.
pub fn dilate(src: &BitMatrix, radius: usize) -> BitMatrix {
    let mut out = BitMatrix::default();
    let mut tmp = BitMatrix::default();
    let mut counts = Vec::new();
    dilate_into(src, radius, &mut out, &mut tmp, &mut counts);
    out
}

/// Dilation with caller-provided scratch space.
///
/// Runs as two separable box passes over prefix counts, so the cost does not
/// depend on `radius`.
pub fn dilate_into(
    src: &BitMatrix,
    radius: usize,
    out: &mut BitMatrix,
    tmp: &mut BitMatrix,
    counts: &mut Vec<u32>,
) {
    let width = src.width();
    let height = src.height();
    out.reset(width, height);
    tmp.reset(width, height);
    if width == 0 || height == 0 {
        return;
    }

    // Horizontal pass: src -> tmp
    counts.clear();
    counts.resize(width + 1, 0);
    for y in 0..height {
        for x in 0..width {
            counts[x + 1] = counts[x] + src.get(x, y) as u32;
        }
        for x in 0..width {
            let lo = x.saturating_sub(radius);
            let hi = x.saturating_add(radius).saturating_add(1).min(width);
            if counts[hi] > counts[lo] {
                tmp.set(x, y, true);
            }
        }
    }

    // Vertical pass: tmp -> out
    counts.clear();
    counts.resize(height + 1, 0);
    for x in 0..width {
        for y in 0..height {
            counts[y + 1] = counts[y] + tmp.get(x, y) as u32;
        }
        for y in 0..height {
            let lo = y.saturating_sub(radius);
            let hi = y.saturating_add(radius).saturating_add(1).min(height);
            if counts[hi] > counts[lo] {
                out.set(x, y, true);
            }
        }
    }
}
