//! Color space conversion between `image` buffers and OpenCV matrices
//!
//! Provides:
//! - RGB buffer to OpenCV `Mat` (RGB channel order, `CV_8UC3`)
//! - RGB to HSV with the 8-bit OpenCV convention (H 0-179, S/V 0-255)
//! - RGB to single-channel grayscale
//! - `CV_8UC3` `Mat` back to an RGB buffer for display

use crate::{image_loader::LeafImage, AnalysisError, Result};
use image::RgbImage;
use opencv::{
    core::{Mat, Scalar, CV_8UC1, CV_8UC3},
    imgproc::{cvt_color_def, COLOR_RGB2GRAY, COLOR_RGB2HSV},
    prelude::*,
};

/// Converts leaf images into the matrices used by segmentation and texture analysis
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorConverter;

impl ColorConverter {
    pub fn new() -> Self {
        Self
    }

    /// Copy an RGB image into a `CV_8UC3` matrix, keeping RGB channel order
    pub fn to_rgb_mat(&self, image: &LeafImage) -> Result<Mat> {
        let rows = image.height() as i32;
        let cols = image.width() as i32;

        let mut mat = Mat::new_rows_cols_with_default(rows, cols, CV_8UC3, Scalar::all(0.0))
            .map_err(|e| AnalysisError::opencv("allocate RGB matrix", e))?;

        mat.data_bytes_mut()
            .map_err(|e| AnalysisError::opencv("access RGB matrix data", e))?
            .copy_from_slice(image.as_rgb().as_raw());

        Ok(mat)
    }

    /// Convert an RGB matrix to HSV
    ///
    /// Hue is stored as half-degrees in [0, 179] so it fits in 8 bits.
    pub fn rgb_to_hsv(&self, rgb: &Mat) -> Result<Mat> {
        let mut hsv = Mat::default();
        cvt_color_def(rgb, &mut hsv, COLOR_RGB2HSV)
            .map_err(|e| AnalysisError::opencv("RGB to HSV conversion", e))?;
        Ok(hsv)
    }

    /// Convert an RGB matrix to 8-bit grayscale
    pub fn rgb_to_gray(&self, rgb: &Mat) -> Result<Mat> {
        let mut gray = Mat::default();
        cvt_color_def(rgb, &mut gray, COLOR_RGB2GRAY)
            .map_err(|e| AnalysisError::opencv("RGB to grayscale conversion", e))?;
        Ok(gray)
    }

    /// HSV matrix for a leaf image
    pub fn hsv(&self, image: &LeafImage) -> Result<Mat> {
        let rgb = self.to_rgb_mat(image)?;
        self.rgb_to_hsv(&rgb)
    }

    /// Grayscale matrix for a leaf image
    pub fn gray(&self, image: &LeafImage) -> Result<Mat> {
        let rgb = self.to_rgb_mat(image)?;
        self.rgb_to_gray(&rgb)
    }

    /// HSV triple of a single RGB color
    pub fn hsv_of(&self, r: u8, g: u8, b: u8) -> Result<[u8; 3]> {
        let pixel = LeafImage::from_raw(1, 1, 3, vec![r, g, b])?;
        let hsv = self.hsv(&pixel)?;
        let bytes = hsv
            .data_bytes()
            .map_err(|e| AnalysisError::opencv("access HSV matrix data", e))?;
        Ok([bytes[0], bytes[1], bytes[2]])
    }

    /// Copy a `CV_8UC3` matrix in RGB order into an `RgbImage`
    pub fn mat_to_rgb_image(&self, mat: &Mat) -> Result<RgbImage> {
        if mat.typ() != CV_8UC3 {
            return Err(AnalysisError::invalid_input(format!(
                "expected 8-bit 3-channel matrix, got type {}",
                mat.typ()
            )));
        }

        let data = mat
            .data_bytes()
            .map_err(|e| AnalysisError::opencv("access RGB matrix data", e))?
            .to_vec();

        RgbImage::from_raw(mat.cols() as u32, mat.rows() as u32, data)
            .ok_or_else(|| AnalysisError::invalid_input("matrix data does not match dimensions"))
    }

    /// Borrow the bytes of a single-channel 8-bit matrix
    pub fn gray_bytes<'a>(&self, mat: &'a Mat) -> Result<&'a [u8]> {
        if mat.typ() != CV_8UC1 {
            return Err(AnalysisError::invalid_input(format!(
                "expected 8-bit single-channel matrix, got type {}",
                mat.typ()
            )));
        }
        mat.data_bytes()
            .map_err(|e| AnalysisError::opencv("access grayscale matrix data", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_primary_hues() {
        let converter = ColorConverter::new();
        assert_eq!(converter.hsv_of(255, 0, 0).unwrap(), [0, 255, 255]);
        assert_eq!(converter.hsv_of(255, 255, 0).unwrap(), [30, 255, 255]);
        assert_eq!(converter.hsv_of(0, 255, 0).unwrap(), [60, 255, 255]);
        assert_eq!(converter.hsv_of(0, 0, 255).unwrap(), [120, 255, 255]);
    }

    #[test]
    fn test_neutral_has_zero_saturation() {
        let converter = ColorConverter::new();
        let [_, s, v] = converter.hsv_of(200, 200, 200).unwrap();
        assert_eq!(s, 0);
        assert_eq!(v, 200);
    }

    #[test]
    fn test_rgb_mat_roundtrip() {
        let converter = ColorConverter::new();
        let mut rgb = RgbImage::new(3, 2);
        rgb.put_pixel(0, 0, Rgb([255, 0, 0]));
        rgb.put_pixel(2, 1, Rgb([10, 20, 30]));
        let leaf = LeafImage::from_rgb(rgb.clone()).unwrap();

        let mat = converter.to_rgb_mat(&leaf).unwrap();
        assert_eq!(mat.rows(), 2);
        assert_eq!(mat.cols(), 3);

        let back = converter.mat_to_rgb_image(&mat).unwrap();
        assert_eq!(back, rgb);
    }

    #[test]
    fn test_gray_of_uniform_image() {
        let converter = ColorConverter::new();
        let leaf = LeafImage::from_rgb(RgbImage::from_pixel(4, 4, Rgb([90, 90, 90]))).unwrap();
        let gray = converter.gray(&leaf).unwrap();
        let bytes = converter.gray_bytes(&gray).unwrap();
        assert_eq!(bytes.len(), 16);
        assert!(bytes.iter().all(|&b| b == 90));
    }
}
