//! Caller-owned scratch space for repeated detections
//!
//! Holds the masks and prefix-count buffers the semicircle search needs, so a
//! capture loop can run detection frame after frame without reallocating.
//! Nothing in here carries meaning between calls: every detection overwrites
//! the buffers before reading them.

use crate::models::{BitMatrix, EdgeMap};
use crate::utils::binarization::{dilate_into, edge_mask_into};

/// Reusable buffers for one detection at a time
#[derive(Debug, Default)]
pub struct DetectionWorkspace {
    pub(crate) edges: BitMatrix,
    pub(crate) coarse: BitMatrix,
    pub(crate) fine: BitMatrix,
    tmp: BitMatrix,
    counts: Vec<u32>,
}

impl DetectionWorkspace {
    /// Create an empty workspace; buffers grow on first use
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a workspace pre-sized for frames of `width` x `height`
    pub fn with_capacity(width: usize, height: usize) -> Self {
        Self {
            edges: BitMatrix::new(width, height),
            coarse: BitMatrix::new(width, height),
            fine: BitMatrix::new(width, height),
            tmp: BitMatrix::new(width, height),
            counts: Vec::with_capacity(width.max(height) + 1),
        }
    }

    /// Rebuild the edge mask and both tolerance masks for `edges`
    pub(crate) fn prepare(
        &mut self,
        edges: &EdgeMap<'_>,
        threshold: u8,
        coarse_tolerance: usize,
        fine_tolerance: usize,
    ) {
        edge_mask_into(edges, threshold, &mut self.edges);
        dilate_into(
            &self.edges,
            coarse_tolerance,
            &mut self.coarse,
            &mut self.tmp,
            &mut self.counts,
        );
        dilate_into(
            &self.edges,
            fine_tolerance,
            &mut self.fine,
            &mut self.tmp,
            &mut self.counts,
        );
    }

    /// Width of the frame the buffers were last prepared for
    pub fn width(&self) -> usize {
        self.edges.width()
    }

    /// Height of the frame the buffers were last prepared for
    pub fn height(&self) -> usize {
        self.edges.height()
    }

    /// Drop buffer contents (keeps capacity)
    pub fn clear(&mut self) {
        self.edges.clear();
        self.coarse.clear();
        self.fine.clear();
        self.tmp.clear();
        self.counts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_builds_masks() {
        let mut luma = vec![0u8; 20 * 20];
        luma[10 * 20 + 10] = 255;
        let edges = EdgeMap::from_luma(&luma, 20, 20).unwrap();

        let mut ws = DetectionWorkspace::new();
        ws.prepare(&edges, 0, 3, 1);
        assert_eq!(ws.width(), 20);
        assert_eq!(ws.height(), 20);
        assert_eq!(ws.edges.count_ones(), 1);
        assert_eq!(ws.fine.count_ones(), 9);
        assert_eq!(ws.coarse.count_ones(), 49);
    }

    #[test]
    fn test_reuse_across_sizes() {
        let mut ws = DetectionWorkspace::with_capacity(64, 64);

        let big = vec![255u8; 32 * 32];
        let edges = EdgeMap::from_luma(&big, 32, 32).unwrap();
        ws.prepare(&edges, 0, 2, 1);
        assert_eq!(ws.edges.count_ones(), 32 * 32);

        let small = vec![0u8; 8 * 4];
        let edges = EdgeMap::from_luma(&small, 8, 4).unwrap();
        ws.prepare(&edges, 0, 2, 1);
        assert_eq!(ws.width(), 8);
        assert_eq!(ws.coarse.count_ones(), 0);
    }
}
