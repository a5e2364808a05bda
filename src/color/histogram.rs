//! Per-channel RGB histograms

use crate::image_loader::LeafImage;
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

/// Number of bins per channel (one per 8-bit value)
pub const BINS: usize = 256;

/// 256-bin pixel counts for the red, green and blue channels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbHistogram {
    pub red: Vec<u32>,
    pub green: Vec<u32>,
    pub blue: Vec<u32>,
}

impl RgbHistogram {
    /// Count every pixel of the image into its channel bins
    pub fn compute(image: &LeafImage) -> Self {
        let mut red = vec![0u32; BINS];
        let mut green = vec![0u32; BINS];
        let mut blue = vec![0u32; BINS];

        for Rgb([r, g, b]) in image.as_rgb().pixels() {
            red[*r as usize] += 1;
            green[*g as usize] += 1;
            blue[*b as usize] += 1;
        }

        Self { red, green, blue }
    }

    /// Largest single bin count across all three channels
    pub fn peak(&self) -> u32 {
        self.red
            .iter()
            .chain(&self.green)
            .chain(&self.blue)
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Draw the three channels as overlaid bar plots on a black background
    ///
    /// Bars are scaled so the peak bin spans the full height. Overlapping
    /// channels add, so a bin shared by all three renders white.
    pub fn render(&self, width: u32, height: u32) -> RgbImage {
        let mut canvas = RgbImage::new(width, height);
        let peak = self.peak();
        if peak == 0 || width == 0 || height == 0 {
            return canvas;
        }

        let channels: [(&[u32], usize); 3] = [
            (self.red.as_slice(), 0),
            (self.green.as_slice(), 1),
            (self.blue.as_slice(), 2),
        ];

        for x in 0..width {
            let bin = (x as usize * BINS) / width as usize;
            for (counts, channel) in channels {
                // Deserialized histograms may carry fewer than BINS entries
                let count = counts.get(bin).copied().unwrap_or(0);
                let bar = ((count as u64 * height as u64) / peak as u64) as u32;
                for y in (height - bar)..height {
                    canvas.get_pixel_mut(x, y).0[channel] = 255;
                }
            }
        }

        canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(pixels: RgbImage) -> LeafImage {
        LeafImage::from_rgb(pixels).unwrap()
    }

    #[test]
    fn test_counts_sum_to_pixel_count() {
        let mut img = RgbImage::from_pixel(4, 3, Rgb([10, 20, 30]));
        img.put_pixel(0, 0, Rgb([255, 0, 128]));
        let hist = RgbHistogram::compute(&leaf(img));

        for channel in [&hist.red, &hist.green, &hist.blue] {
            assert_eq!(channel.iter().sum::<u32>(), 12);
        }
        assert_eq!(hist.red[10], 11);
        assert_eq!(hist.red[255], 1);
        assert_eq!(hist.blue[128], 1);
        assert_eq!(hist.peak(), 11);
    }

    #[test]
    fn test_render_full_height_peak() {
        let hist = RgbHistogram::compute(&leaf(RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]))));
        let canvas = hist.render(256, 50);

        assert_eq!(canvas.dimensions(), (256, 50));
        // All three channels peak in bin 0
        assert_eq!(canvas.get_pixel(0, 0), &Rgb([255, 255, 255]));
        // Nothing drawn for empty bins
        assert_eq!(canvas.get_pixel(100, 49), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_render_short_deserialized_histogram() {
        let hist: RgbHistogram =
            serde_json::from_str(r#"{"red":[0,4],"green":[2],"blue":[]}"#).unwrap();
        assert_eq!(hist.peak(), 4);

        let canvas = hist.render(256, 8);
        // Bin 1 is the red peak; bins past the stored entries stay empty
        assert_eq!(canvas.get_pixel(1, 0), &Rgb([255, 0, 0]));
        assert_eq!(canvas.get_pixel(0, 7), &Rgb([0, 255, 0]));
        assert_eq!(canvas.get_pixel(200, 7), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_render_empty_canvas() {
        let hist = RgbHistogram {
            red: vec![0; BINS],
            green: vec![0; BINS],
            blue: vec![0; BINS],
        };
        let canvas = hist.render(10, 10);
        assert!(canvas.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }
}
