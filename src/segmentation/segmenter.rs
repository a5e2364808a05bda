//! HSV band segmentation with optional morphological cleanup
//!
//! Implements band segmentation that:
//! - Converts the leaf image to HSV
//! - Builds one independent binary mask per band with an inclusive range test
//! - Optionally opens then closes each mask to drop speckle and fill pinholes
//! - Reports each mask's area as a percentage of the whole image

use super::bands::{Band, BandPercentages, BandThresholds, HsvRange};
use crate::{
    color::ColorConverter, config::SegmentationConfig, constants::morphology,
    image_loader::LeafImage, AnalysisError, Result,
};
use image::RgbImage;
use opencv::{
    core::{bitwise_and, count_non_zero, in_range, Mat, Point, Scalar, Size, BORDER_CONSTANT},
    imgproc::{
        get_structuring_element, morphology_default_border_value, morphology_ex, MORPH_CLOSE,
        MORPH_OPEN, MORPH_RECT,
    },
    prelude::*,
};
use tracing::debug;

/// Binary membership mask for one band
pub struct BandMask {
    band: Band,
    /// `CV_8UC1`, 255 where the pixel belongs to the band
    mask: Mat,
    pixel_count: usize,
    total_pixels: usize,
}

impl BandMask {
    pub fn band(&self) -> Band {
        self.band
    }

    pub fn mask(&self) -> &Mat {
        &self.mask
    }

    /// Number of pixels inside the band
    pub fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    /// `100 * pixel_count / total_pixels`
    pub fn percentage(&self) -> f64 {
        self.pixel_count as f64 * 100.0 / self.total_pixels as f64
    }

    /// Whether the pixel at (x, y) belongs to the band
    pub fn contains(&self, x: u32, y: u32) -> Result<bool> {
        let value = self
            .mask
            .at_2d::<u8>(y as i32, x as i32)
            .map_err(|e| AnalysisError::opencv("mask access", e))?;
        Ok(*value > 0)
    }
}

/// Result of segmenting one image into all seven bands
pub struct Segmentation {
    rgb: Mat,
    masks: Vec<BandMask>,
    percentages: BandPercentages,
}

impl Segmentation {
    pub fn percentages(&self) -> BandPercentages {
        self.percentages
    }

    pub fn masks(&self) -> &[BandMask] {
        &self.masks
    }

    pub fn mask(&self, band: Band) -> &BandMask {
        // Masks are stored in `Band::ALL` order
        &self.masks[band as usize]
    }

    /// Original pixels where the band's mask is set, black elsewhere
    pub fn highlight(&self, band: Band) -> Result<RgbImage> {
        let mut highlighted = Mat::default();
        bitwise_and(&self.rgb, &self.rgb, &mut highlighted, self.mask(band).mask())
            .map_err(|e| AnalysisError::opencv("mask application", e))?;
        ColorConverter::new().mat_to_rgb_image(&highlighted)
    }

    /// Highlight images for every band in canonical order
    pub fn highlights(&self) -> Result<Vec<(Band, RgbImage)>> {
        Band::ALL
            .iter()
            .map(|&band| Ok((band, self.highlight(band)?)))
            .collect()
    }
}

/// Segments leaf images into the seven symptom color bands
#[derive(Debug, Clone)]
pub struct ColorBandSegmenter {
    converter: ColorConverter,
    thresholds: BandThresholds,
    morphology: bool,
    kernel_size: i32,
}

impl Default for ColorBandSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorBandSegmenter {
    /// Create a segmenter with default bands and no morphological cleanup
    pub fn new() -> Self {
        Self {
            converter: ColorConverter::new(),
            thresholds: BandThresholds::default(),
            morphology: false,
            kernel_size: morphology::KERNEL_SIZE,
        }
    }

    /// Create a segmenter with custom parameters
    pub fn with_params(thresholds: BandThresholds, morphology: bool, kernel_size: i32) -> Self {
        Self {
            converter: ColorConverter::new(),
            thresholds,
            morphology,
            kernel_size,
        }
    }

    pub fn from_config(config: &SegmentationConfig) -> Self {
        Self::with_params(
            config.bands.clone(),
            config.morphology,
            config.kernel_size,
        )
    }

    pub fn thresholds(&self) -> &BandThresholds {
        &self.thresholds
    }

    pub fn morphology_enabled(&self) -> bool {
        self.morphology
    }

    /// Segment an image into all seven band masks
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::OpenCvError` if a conversion or mask operation fails.
    pub fn segment(&self, image: &LeafImage) -> Result<Segmentation> {
        let rgb = self.converter.to_rgb_mat(image)?;
        let hsv = self.converter.rgb_to_hsv(&rgb)?;
        let total_pixels = image.pixel_count();

        let mut masks = Vec::with_capacity(Band::ALL.len());
        let mut percentages = BandPercentages::default();

        for band in Band::ALL {
            let mut mask = self.band_mask(&hsv, self.thresholds.get(band))?;
            if self.morphology {
                mask = self.morphological_refinement(&mask)?;
            }

            let pixel_count = count_non_zero(&mask)
                .map_err(|e| AnalysisError::opencv("count band pixels", e))?
                as usize;

            let band_mask = BandMask {
                band,
                mask,
                pixel_count,
                total_pixels,
            };
            debug!(
                band = band.as_str(),
                pixels = pixel_count,
                percentage = band_mask.percentage(),
                "Band segmented"
            );

            percentages.set(band, band_mask.percentage());
            masks.push(band_mask);
        }

        Ok(Segmentation {
            rgb,
            masks,
            percentages,
        })
    }

    /// Band percentages only
    pub fn percentages(&self, image: &LeafImage) -> Result<BandPercentages> {
        Ok(self.segment(image)?.percentages())
    }

    /// Inclusive per-channel range test on an HSV matrix
    fn band_mask(&self, hsv: &Mat, range: &HsvRange) -> Result<Mat> {
        let lower = Scalar::new(
            range.lower[0] as f64,
            range.lower[1] as f64,
            range.lower[2] as f64,
            0.0,
        );
        let upper = Scalar::new(
            range.upper[0] as f64,
            range.upper[1] as f64,
            range.upper[2] as f64,
            0.0,
        );

        let mut mask = Mat::default();
        in_range(hsv, &lower, &upper, &mut mask)
            .map_err(|e| AnalysisError::opencv("band range test", e))?;
        Ok(mask)
    }

    /// Opening removes isolated pixels, closing fills small gaps
    fn morphological_refinement(&self, mask: &Mat) -> Result<Mat> {
        let kernel = get_structuring_element(
            MORPH_RECT,
            Size::new(self.kernel_size, self.kernel_size),
            Point::new(-1, -1),
        )
        .map_err(|e| AnalysisError::opencv("structuring element creation", e))?;

        // Border pixels count as neither foreground nor background
        let border_value = morphology_default_border_value()
            .map_err(|e| AnalysisError::opencv("morphology border value", e))?;

        let mut opened = Mat::default();
        morphology_ex(
            mask,
            &mut opened,
            MORPH_OPEN,
            &kernel,
            Point::new(-1, -1),
            1,
            BORDER_CONSTANT,
            border_value,
        )
        .map_err(|e| AnalysisError::opencv("opening", e))?;

        let mut closed = Mat::default();
        morphology_ex(
            &opened,
            &mut closed,
            MORPH_CLOSE,
            &kernel,
            Point::new(-1, -1),
            1,
            BORDER_CONSTANT,
            border_value,
        )
        .map_err(|e| AnalysisError::opencv("closing", e))?;

        Ok(closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    /// H 15, S 204, V 150: brown only
    const BROWN: Rgb<u8> = Rgb([150, 90, 30]);
    /// H 141, S 204, V 200: purple only
    const PURPLE: Rgb<u8> = Rgb([150, 40, 200]);
    /// H 60, S 191, V 160: outside every band
    const HEALTHY_GREEN: Rgb<u8> = Rgb([40, 160, 40]);

    fn leaf(pixels: RgbImage) -> LeafImage {
        LeafImage::from_rgb(pixels).unwrap()
    }

    #[test]
    fn test_segmenter_creation() {
        let segmenter = ColorBandSegmenter::new();
        assert!(!segmenter.morphology_enabled());
        assert_eq!(segmenter.kernel_size, morphology::KERNEL_SIZE);
        assert_eq!(segmenter.thresholds(), &BandThresholds::default());
    }

    #[test]
    fn test_uniform_healthy_image_has_no_bands() {
        let segmenter = ColorBandSegmenter::new();
        let pct = segmenter
            .percentages(&leaf(RgbImage::from_pixel(8, 8, HEALTHY_GREEN)))
            .unwrap();
        assert_eq!(pct, BandPercentages::default());
    }

    #[test]
    fn test_half_brown_image() {
        let mut img = RgbImage::from_pixel(10, 10, HEALTHY_GREEN);
        for y in 0..5 {
            for x in 0..10 {
                img.put_pixel(x, y, BROWN);
            }
        }
        let segmentation = ColorBandSegmenter::new().segment(&leaf(img)).unwrap();
        let pct = segmentation.percentages();

        assert!((pct.brown - 50.0).abs() < 1e-9);
        assert_eq!(pct.purple, 0.0);
        assert_eq!(segmentation.mask(Band::Brown).pixel_count(), 50);
        assert!(segmentation.mask(Band::Brown).contains(3, 2).unwrap());
        assert!(!segmentation.mask(Band::Brown).contains(3, 7).unwrap());
    }

    #[test]
    fn test_highlight_keeps_band_pixels_only() {
        let mut img = RgbImage::from_pixel(4, 4, HEALTHY_GREEN);
        img.put_pixel(1, 1, PURPLE);
        let segmentation = ColorBandSegmenter::new().segment(&leaf(img)).unwrap();

        let highlight = segmentation.highlight(Band::Purple).unwrap();
        assert_eq!(highlight.get_pixel(1, 1), &PURPLE);
        assert_eq!(highlight.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(segmentation.highlights().unwrap().len(), 7);
    }

    #[test]
    fn test_morphology_removes_isolated_pixel() {
        let mut img = RgbImage::from_pixel(20, 20, HEALTHY_GREEN);
        img.put_pixel(10, 10, PURPLE);
        let image = leaf(img);

        let plain = ColorBandSegmenter::new().percentages(&image).unwrap();
        assert!(plain.purple > 0.0);

        let cleaned = ColorBandSegmenter::with_params(BandThresholds::default(), true, 5)
            .percentages(&image)
            .unwrap();
        assert_eq!(cleaned.purple, 0.0);
    }

    #[test]
    fn test_morphology_keeps_large_region() {
        let mut img = RgbImage::from_pixel(20, 20, HEALTHY_GREEN);
        for y in 5..15 {
            for x in 5..15 {
                img.put_pixel(x, y, BROWN);
            }
        }
        let pct = ColorBandSegmenter::with_params(BandThresholds::default(), true, 5)
            .percentages(&leaf(img))
            .unwrap();
        assert!((pct.brown - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_widening_range_never_decreases_percentage() {
        let mut img = RgbImage::new(16, 16);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgb([(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8]);
        }
        let image = leaf(img);

        let base = BandThresholds::default();
        let before = ColorBandSegmenter::with_params(base.clone(), false, 5)
            .percentages(&image)
            .unwrap();

        for band in Band::ALL {
            let mut wide = base.clone();
            *wide.get_mut(band) = base.get(band).widened(15);
            let after = ColorBandSegmenter::with_params(wide, false, 5)
                .percentages(&image)
                .unwrap();
            assert!(after.get(band) >= before.get(band), "{band} shrank");
            assert!((0.0..=100.0).contains(&after.get(band)));
        }
    }
}
