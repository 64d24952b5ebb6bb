//! Utility functions for edge-map processing
//!
//! This module provides helpers shared by the detectors:
//! - Binarization (edge threshold) and square dilation for match tolerance
//! - Memory pools (caller-owned buffer reuse across frames)

/// Edge thresholding and dilation
pub mod binarization;
/// Reusable detection buffers
pub mod memory_pool;
