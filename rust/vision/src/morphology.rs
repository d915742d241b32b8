// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Square-kernel morphology for cleaning binary floor plan masks
//!
//! The kernel is a full `size x size` square anchored at `size / 2`, so even
//! sizes extend one pixel further up/left than down/right. Pixels outside the
//! image never take part in a min/max, which keeps borders from eroding in.

use crate::types::DetectionConfig;
use image::{GrayImage, Luma};

/// Square structuring element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquareKernel {
    size: u32,
}

impl SquareKernel {
    /// Create a kernel; sizes below 1 are clamped to 1
    pub fn new(size: u32) -> Self {
        Self { size: size.max(1) }
    }

    /// Side length in pixels
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Offset of the kernel origin from its top-left cell
    pub fn anchor(&self) -> u32 {
        self.size / 2
    }
}

/// Morphological erosion - shrinks white regions
pub fn erode(image: &GrayImage, kernel: SquareKernel) -> GrayImage {
    rank_filter(image, kernel, 255, u8::min)
}

/// Morphological dilation - expands white regions
pub fn dilate(image: &GrayImage, kernel: SquareKernel) -> GrayImage {
    rank_filter(image, kernel, 0, u8::max)
}

/// Erode `iterations` times
pub fn erode_n(image: &GrayImage, kernel: SquareKernel, iterations: u32) -> GrayImage {
    (0..iterations).fold(image.clone(), |img, _| erode(&img, kernel))
}

/// Dilate `iterations` times
pub fn dilate_n(image: &GrayImage, kernel: SquareKernel, iterations: u32) -> GrayImage {
    (0..iterations).fold(image.clone(), |img, _| dilate(&img, kernel))
}

/// Morphological closing (dilate then erode) - fills small gaps
pub fn morphological_close(image: &GrayImage, kernel: SquareKernel) -> GrayImage {
    erode(&dilate(image, kernel), kernel)
}

/// Clean a binary mask: erode, dilate, then close, always in that order
pub fn clean_mask(mask: &GrayImage, config: &DetectionConfig) -> GrayImage {
    let kernel = SquareKernel::new(config.kernel_dim());
    let eroded = erode_n(mask, kernel, config.erosion_passes());
    let dilated = dilate_n(&eroded, kernel, config.dilation_passes());
    morphological_close(&dilated, kernel)
}

/// Separable min/max over the kernel window: one horizontal pass, one vertical
fn rank_filter(
    image: &GrayImage,
    kernel: SquareKernel,
    identity: u8,
    pick: fn(u8, u8) -> u8,
) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || kernel.size() == 1 {
        return image.clone();
    }

    let size = i64::from(kernel.size());
    let anchor = i64::from(kernel.anchor());

    let window = |center: u32, limit: u32| {
        let start = (i64::from(center) - anchor).max(0);
        let end = (i64::from(center) - anchor + size).min(i64::from(limit));
        start as u32..end as u32
    };

    let mut rows = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let value = window(x, width)
                .fold(identity, |acc, sx| pick(acc, image.get_pixel(sx, y).0[0]));
            rows.put_pixel(x, y, Luma([value]));
        }
    }

    let mut result = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let value = window(y, height)
                .fold(identity, |acc, sy| pick(acc, rows.get_pixel(x, sy).0[0]));
            result.put_pixel(x, y, Luma([value]));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_ops::foreground_count;

    fn mask_with_rect(w: u32, h: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> GrayImage {
        let mut img = GrayImage::new(w, h);
        for y in y0..y1 {
            for x in x0..x1 {
                img.put_pixel(x, y, Luma([255]));
            }
        }
        img
    }

    /// Deterministic speckled mask: a room with 7px walls plus scattered noise
    fn noisy_plan() -> GrayImage {
        let mut img = GrayImage::new(60, 50);
        for x in 5..55 {
            for t in 0..7 {
                img.put_pixel(x, 5 + t, Luma([255]));
                img.put_pixel(x, 38 + t, Luma([255]));
            }
        }
        for y in 5..45 {
            for t in 0..7 {
                img.put_pixel(5 + t, y, Luma([255]));
                img.put_pixel(48 + t, y, Luma([255]));
            }
        }
        // Hole in the top wall and isolated specks
        img.put_pixel(20, 8, Luma([0]));
        let mut seed = 7u32;
        for _ in 0..40 {
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
            let x = (seed >> 8) % 60;
            let y = (seed >> 20) % 50;
            img.put_pixel(x, y, Luma([255]));
        }
        img
    }

    #[test]
    fn test_kernel_anchor() {
        assert_eq!(SquareKernel::new(3).anchor(), 1);
        assert_eq!(SquareKernel::new(2).anchor(), 1);
        assert_eq!(SquareKernel::new(1).anchor(), 0);
        assert_eq!(SquareKernel::new(0).size(), 1);
    }

    #[test]
    fn test_erode_shrinks_rect() {
        let img = mask_with_rect(20, 20, 5, 5, 15, 15);
        let eroded = erode(&img, SquareKernel::new(3));
        assert_eq!(foreground_count(&eroded), 8 * 8);
        assert_eq!(eroded.get_pixel(5, 5).0[0], 0);
        assert_eq!(eroded.get_pixel(6, 6).0[0], 255);
    }

    #[test]
    fn test_dilate_grows_rect() {
        let img = mask_with_rect(20, 20, 5, 5, 15, 15);
        let dilated = dilate(&img, SquareKernel::new(3));
        assert_eq!(foreground_count(&dilated), 12 * 12);
    }

    #[test]
    fn test_even_kernel_is_asymmetric() {
        let mut img = GrayImage::new(5, 5);
        img.put_pixel(2, 2, Luma([255]));

        // Window for pixel p covers p-1..=p, so the dot spreads right/down
        let dilated = dilate(&img, SquareKernel::new(2));
        assert_eq!(foreground_count(&dilated), 4);
        assert_eq!(dilated.get_pixel(3, 3).0[0], 255);
        assert_eq!(dilated.get_pixel(1, 1).0[0], 0);
    }

    #[test]
    fn test_border_pixels_do_not_erode_from_outside() {
        let img = GrayImage::from_pixel(6, 6, Luma([255]));
        assert_eq!(erode(&img, SquareKernel::new(3)), img);
    }

    #[test]
    fn test_matches_imageproc_for_odd_kernel() {
        use imageproc::distance_transform::Norm;

        let img = noisy_plan();
        assert_eq!(
            erode(&img, SquareKernel::new(3)),
            imageproc::morphology::erode(&img, Norm::LInf, 1)
        );
        assert_eq!(
            dilate(&img, SquareKernel::new(5)),
            imageproc::morphology::dilate(&img, Norm::LInf, 2)
        );
    }

    #[test]
    fn test_opening_stays_within_dilation_bound() {
        let img = noisy_plan();
        let kernel = SquareKernel::new(3);

        let opened = dilate(&erode(&img, kernel), kernel);
        let bound = dilate(&img, kernel);

        for (a, b) in opened.pixels().zip(bound.pixels()) {
            assert!(a.0[0] <= b.0[0]);
        }
        assert!(foreground_count(&opened) <= foreground_count(&img));
    }

    #[test]
    fn test_closing_is_idempotent() {
        let img = noisy_plan();
        let kernel = SquareKernel::new(3);

        let once = morphological_close(&img, kernel);
        let twice = morphological_close(&once, kernel);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_clean_mask_removes_specks_and_seals_gap() {
        let img = noisy_plan();
        let cleaned = clean_mask(&img, &DetectionConfig::default());

        // Hole in the wall is sealed
        assert_eq!(cleaned.get_pixel(20, 8).0[0], 255);
        // Wall body survives, room interior stays empty
        assert_eq!(cleaned.get_pixel(8, 25).0[0], 255);
        assert_eq!(cleaned.get_pixel(30, 25).0[0], 0);
    }

    #[test]
    fn test_zero_iterations_is_just_closing() {
        let img = noisy_plan();
        let config = DetectionConfig {
            erosion_iterations: 0.0,
            dilation_iterations: 0.0,
            ..Default::default()
        };
        assert_eq!(
            clean_mask(&img, &config),
            morphological_close(&img, SquareKernel::new(3))
        );
    }
}
