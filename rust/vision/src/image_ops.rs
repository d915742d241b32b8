// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Image loading and binarization for floor plan recognition

use crate::error::{Result, VisionError};
use image::{GrayImage, ImageReader};
use imageproc::contrast::{threshold, ThresholdType};
use std::path::Path;

/// Otsu level: `<= level` is one class, `> level` the other
pub use imageproc::contrast::otsu_level;

/// Load an image file (PNG, JPEG, BMP) as grayscale
///
/// The format is sniffed from the file content, not the extension.
pub fn load_grayscale(path: impl AsRef<Path>) -> Result<GrayImage> {
    let path = path.as_ref();
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|source| VisionError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let gray = reader.decode()?.to_luma8();
    ensure_non_empty(gray)
}

/// Decode an in-memory encoded image as grayscale
pub fn decode_grayscale(bytes: &[u8]) -> Result<GrayImage> {
    let gray = image::load_from_memory(bytes)?.to_luma8();
    ensure_non_empty(gray)
}

fn ensure_non_empty(image: GrayImage) -> Result<GrayImage> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(VisionError::EmptyImage { width, height });
    }
    Ok(image)
}

/// Inverted binary threshold: pixels above `level` become 0, the rest 255
pub fn threshold_inverted(image: &GrayImage, level: u8) -> GrayImage {
    threshold(image, level, ThresholdType::BinaryInverted)
}

/// Otsu binarization with dark ink as foreground
///
/// Wall lines in a scanned plan are dark on a light page; after inversion
/// they are the 255 pixels the later stages operate on. A uniform page
/// yields level 0 and therefore an empty mask.
pub fn binarize(image: &GrayImage) -> GrayImage {
    threshold_inverted(image, otsu_level(image))
}

/// Count pixels with a non-zero value
pub fn foreground_count(image: &GrayImage) -> usize {
    image.pixels().filter(|p| p.0[0] != 0).count()
}
