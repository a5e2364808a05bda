//! Color band segmentation module
//!
//! This module classifies leaf pixels into seven independent, possibly
//! overlapping HSV color bands and measures the area each band covers.

pub mod bands;
pub mod segmenter;

pub use bands::{Band, BandPercentages, BandThresholds, HsvRange};
pub use segmenter::{BandMask, ColorBandSegmenter, Segmentation};
