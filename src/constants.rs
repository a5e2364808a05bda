//! Threshold constants for band segmentation and diagnosis
//!
//! HSV bounds follow the OpenCV 8-bit convention: hue in [0, 179] (half
//! degrees), saturation and value in [0, 255]. All bounds are inclusive.

/// Default HSV band bounds as `([h, s, v] lower, [h, s, v] upper)`
pub mod bands {
    pub const BROWN: ([u8; 3], [u8; 3]) = ([10, 50, 50], [30, 255, 255]);
    pub const YELLOW: ([u8; 3], [u8; 3]) = ([20, 40, 100], [40, 255, 255]);
    pub const PURPLE: ([u8; 3], [u8; 3]) = ([120, 40, 50], [160, 255, 255]);
    pub const EDGE_BROWN: ([u8; 3], [u8; 3]) = ([5, 50, 20], [20, 255, 100]);
    /// Upper hue of 180 is beyond the 8-bit hue range; kept as the full-range bound.
    pub const GRAY: ([u8; 3], [u8; 3]) = ([0, 0, 150], [180, 30, 255]);
    pub const PALE_YELLOW: ([u8; 3], [u8; 3]) = ([25, 20, 150], [35, 100, 255]);
    /// Identical to `EDGE_BROWN`. The two bands stay separate signals.
    pub const DARK_BROWN: ([u8; 3], [u8; 3]) = ([5, 50, 20], [20, 255, 100]);

    /// Largest hue value produced by 8-bit RGB to HSV conversion
    pub const HUE_MAX: u8 = 179;
}

/// Percentage thresholds used by the diagnosis rules
pub mod rules {
    pub const BROWN_PCT: f64 = 5.0;
    pub const GRAY_PCT: f64 = 3.0;
    pub const DARK_BROWN_PCT: f64 = 4.0;
    pub const YELLOW_PCT: f64 = 10.0;
    pub const PURPLE_PCT: f64 = 5.0;
    pub const EDGE_BROWN_PCT: f64 = 4.0;
    pub const PALE_YELLOW_PCT: f64 = 5.0;
}

/// Soil pH estimation thresholds
pub mod ph {
    /// Yellow or pale-yellow above this suggests acidic soil
    pub const ACIDIC_YELLOW_PCT: f64 = 10.0;
    /// Purple above this suggests alkaline soil
    pub const ALKALINE_PURPLE_PCT: f64 = 5.0;
}

/// Morphological cleanup parameters
pub mod morphology {
    /// Square structuring element side length
    pub const KERNEL_SIZE: i32 = 5;
}

/// Gray-level co-occurrence parameters and texture gate defaults
pub mod texture {
    /// Number of gray levels in the co-occurrence matrix
    pub const GRAY_LEVELS: usize = 256;

    /// Pixel distance between co-occurring pairs
    pub const DISTANCE: u32 = 1;

    /// Default angles in degrees
    pub const ANGLES: [u32; 2] = [0, 45];

    /// Lesion-like roughness for brown and dark-brown regions
    pub const LESION_MIN_CONTRAST: f64 = 150.0;
    pub const LESION_MAX_HOMOGENEITY: f64 = 0.5;

    /// Mottled coating for gray (mildew-like) regions
    pub const COATING_MIN_CONTRAST: f64 = 100.0;
    pub const COATING_MAX_ENERGY: f64 = 0.2;
}

/// Export parameters
pub mod export {
    /// Timestamp format used for file names and the timestamp column
    pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

    /// File name prefix for analysis exports
    pub const FILE_PREFIX: &str = "leaf_analysis";
}
