use crate::error::{DetectError, DetectResult};

/// Pixel layout of an edge buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    /// One intensity byte per pixel
    Luma,
    /// Four bytes per pixel (R, G, B, A), as read back from a canvas
    Rgba,
}

impl PixelLayout {
    /// Bytes per pixel
    pub fn channels(&self) -> usize {
        match self {
            PixelLayout::Luma => 1,
            PixelLayout::Rgba => 4,
        }
    }
}

/// Read-only view over a row-major edge-intensity buffer.
///
/// Construction validates the buffer length against the declared dimensions,
/// so every accessor can rely on `data.len() == width * height * channels`.
#[derive(Debug, Clone, Copy)]
pub struct EdgeMap<'a> {
    width: usize,
    height: usize,
    layout: PixelLayout,
    data: &'a [u8],
}

impl<'a> EdgeMap<'a> {
    /// Wrap `data` as an edge map, rejecting zero dimensions and length mismatches
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        layout: PixelLayout,
    ) -> DetectResult<Self> {
        if width == 0 || height == 0 {
            return Err(DetectError::InvalidDimensions { width, height });
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(layout.channels()))
            .ok_or(DetectError::InvalidDimensions { width, height })?;
        if data.len() != expected {
            return Err(DetectError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// Wrap an RGBA buffer
    pub fn from_rgba(data: &'a [u8], width: usize, height: usize) -> DetectResult<Self> {
        Self::new(data, width, height, PixelLayout::Rgba)
    }

    /// Wrap a single-channel buffer
    pub fn from_luma(data: &'a [u8], width: usize, height: usize) -> DetectResult<Self> {
        Self::new(data, width, height, PixelLayout::Luma)
    }

    /// Map width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Map height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel layout of the underlying buffer
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Intensity at (x, y), or `None` outside the map.
    ///
    /// RGBA pixels report the brightest color channel; alpha is ignored.
    #[inline]
    pub fn intensity(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.intensity_unchecked(y * self.width + x))
    }

    /// Whether (x, y) is an edge pixel. Out-of-bounds coordinates are never edges.
    #[inline]
    pub fn is_edge(&self, x: usize, y: usize, threshold: u8) -> bool {
        self.intensity(x, y).is_some_and(|v| v > threshold)
    }

    /// Number of edge pixels in the whole map
    pub fn edge_count(&self, threshold: u8) -> usize {
        (0..self.width * self.height)
            .filter(|&i| self.intensity_unchecked(i) > threshold)
            .count()
    }

    #[inline]
    fn intensity_unchecked(&self, pixel: usize) -> u8 {
        match self.layout {
            PixelLayout::Luma => self.data[pixel],
            PixelLayout::Rgba => {
                let idx = pixel * 4;
                self.data[idx].max(self.data[idx + 1]).max(self.data[idx + 2])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_dimensions() {
        let data = [0u8; 0];
        assert!(matches!(
            EdgeMap::from_luma(&data, 0, 5),
            Err(DetectError::InvalidDimensions { width: 0, height: 5 })
        ));
    }

    #[test]
    fn test_rejects_length_mismatch() {
        // RGBA 4x4 needs 64 bytes
        let data = vec![0u8; 16];
        match EdgeMap::from_rgba(&data, 4, 4) {
            Err(DetectError::BufferSizeMismatch { expected, actual }) => {
                assert_eq!(expected, 64);
                assert_eq!(actual, 16);
            }
            other => panic!("expected size mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_rgba_intensity_ignores_alpha() {
        let mut data = vec![0u8; 2 * 1 * 4];
        data[3] = 255; // alpha only
        data[4 + 1] = 200; // green channel of second pixel
        let map = EdgeMap::from_rgba(&data, 2, 1).unwrap();
        assert_eq!(map.intensity(0, 0), Some(0));
        assert_eq!(map.intensity(1, 0), Some(200));
        assert!(!map.is_edge(0, 0, 0));
        assert!(map.is_edge(1, 0, 0));
        assert!(!map.is_edge(1, 0, 200));
    }

    #[test]
    fn test_out_of_bounds() {
        let data = vec![255u8; 9];
        let map = EdgeMap::from_luma(&data, 3, 3).unwrap();
        assert_eq!(map.intensity(3, 0), None);
        assert!(!map.is_edge(0, 3, 0));
        assert_eq!(map.edge_count(0), 9);
    }
}
