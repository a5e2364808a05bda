//! Color conversion and color statistics
//!
//! This module bridges `image` buffers and OpenCV matrices, performs the
//! RGB to HSV and grayscale conversions used by the analysis, and computes
//! per-channel histograms for display.

pub mod conversion;
pub mod histogram;

pub use conversion::ColorConverter;
pub use histogram::RgbHistogram;
