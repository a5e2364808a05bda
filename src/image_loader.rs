//! Image loading and input normalization
//!
//! Every analysis operates on a [`LeafImage`]: a non-empty, 8-bit, 3-channel
//! RGB pixel grid. Decoded images in other layouts are normalized here, so the
//! rest of the pipeline never sees alpha channels, 16-bit samples or empty
//! buffers.
//!
//! ## Supported Formats
//!
//! Decoding is delegated to the `image` crate:
//! - JPEG, PNG, GIF (first frame), WebP, TIFF, BMP, ICO, TGA, PNM, QOI, HDR, EXR

use crate::error::{AnalysisError, Result};
use image::{DynamicImage, ImageReader, RgbImage};
use std::path::Path;
use tracing::{debug, warn};

/// Extensions decoded through the `image` crate
const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "tiff", "tif", "bmp", "ico", "tga", "pbm", "pgm", "ppm",
    "pnm", "qoi", "hdr", "exr",
];

/// Whether the file extension names a decodable image format (case-insensitive)
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// A validated RGB leaf photograph
///
/// Width and height are both non-zero. The pixel buffer is immutable once
/// constructed; analysis borrows it for the duration of one call.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafImage {
    pixels: RgbImage,
}

impl LeafImage {
    /// Wrap an RGB buffer, rejecting empty images
    pub fn from_rgb(pixels: RgbImage) -> Result<Self> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(AnalysisError::invalid_input(format!(
                "image dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        Ok(Self { pixels })
    }

    /// Normalize any decoded image to 8-bit RGB
    ///
    /// Alpha is dropped rather than composited, so transparent pixels keep
    /// their stored color. Grayscale and high bit-depth images are converted
    /// best-effort.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self> {
        let rgb = match image {
            DynamicImage::ImageRgb8(rgb) => rgb,
            DynamicImage::ImageRgba8(rgba) => {
                debug!("Dropping alpha channel from RGBA input");
                DynamicImage::ImageRgba8(rgba).to_rgb8()
            }
            other => {
                warn!(color = ?other.color(), "Converting non-RGB8 input to RGB8");
                other.to_rgb8()
            }
        };
        Self::from_rgb(rgb)
    }

    /// Build from an interleaved 8-bit buffer with 1 to 4 channels
    pub fn from_raw(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(AnalysisError::invalid_input(format!(
                "image dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }

        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(AnalysisError::invalid_input(format!(
                "buffer holds {} bytes, expected {} for {}x{}x{}",
                data.len(),
                expected,
                width,
                height,
                channels
            )));
        }

        let dynamic = match channels {
            1 => image::GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8),
            2 => image::GrayAlphaImage::from_raw(width, height, data)
                .map(DynamicImage::ImageLumaA8),
            3 => RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8),
            4 => image::RgbaImage::from_raw(width, height, data).map(DynamicImage::ImageRgba8),
            n => {
                return Err(AnalysisError::invalid_input(format!(
                    "unsupported channel count: {}",
                    n
                )))
            }
        }
        .ok_or_else(|| AnalysisError::invalid_input("pixel buffer does not match dimensions"))?;

        Self::from_dynamic(dynamic)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Total number of pixels (always > 0)
    pub fn pixel_count(&self) -> usize {
        self.pixels.width() as usize * self.pixels.height() as usize
    }

    /// Borrow the underlying RGB buffer
    pub fn as_rgb(&self) -> &RgbImage {
        &self.pixels
    }

    /// Consume into the underlying RGB buffer
    pub fn into_rgb(self) -> RgbImage {
        self.pixels
    }
}

/// Load an image from disk as a [`LeafImage`]
///
/// # Errors
///
/// Returns `AnalysisError::ImageLoadError` if the extension is unknown or the
/// file cannot be opened or decoded, and `AnalysisError::InvalidInput` if the
/// decoded image is empty.
///
/// # Example
///
/// ```rust,no_run
/// use leaf_scan::image_loader::load_image;
/// use std::path::Path;
///
/// let leaf = load_image(Path::new("leaf.jpg"))?;
/// println!("Loaded image: {}x{}", leaf.width(), leaf.height());
/// # Ok::<(), leaf_scan::AnalysisError>(())
/// ```
pub fn load_image(path: &Path) -> Result<LeafImage> {
    if !is_supported(path) {
        return Err(AnalysisError::ImageLoadError {
            message: format!("Unknown image format for file: {}", path.display()),
            source: None,
        });
    }

    let reader = ImageReader::open(path).map_err(|e| {
        AnalysisError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })?;

    let decoded = reader.decode().map_err(|e| {
        AnalysisError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })?;

    debug!(
        path = %path.display(),
        width = decoded.width(),
        height = decoded.height(),
        "Decoded image"
    );

    LeafImage::from_dynamic(decoded)
}
