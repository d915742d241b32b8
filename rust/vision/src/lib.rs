// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor plan outline extraction
//!
//! This crate turns a scanned floor plan into wall outlines:
//! 1. Otsu binarization with dark ink as foreground
//! 2. Morphological cleaning (erode, dilate, close) with a square kernel
//! 3. Canny edge detection on the cleaned mask
//! 4. Hierarchical border following with straight-run compression
//!
//! # Usage
//!
//! ```rust,ignore
//! use plan3d_vision::{detect_contours, load_grayscale, DetectionConfig};
//!
//! let plan = load_grayscale("plan.png")?;
//! let contours = detect_contours(&plan, &DetectionConfig::default());
//! ```

pub mod contours;
pub mod error;
pub mod image_ops;
pub mod morphology;
pub mod types;

// Re-export commonly used types and functions
pub use contours::{canny_edges, compress_chain, trace_contours};
pub use error::{Result, VisionError};
pub use image_ops::{
    binarize, decode_grayscale, foreground_count, load_grayscale, otsu_level, threshold_inverted,
};
pub use morphology::{clean_mask, SquareKernel};
pub use types::{BorderKind, Contour, DetectionConfig, PixelPoint};

use image::GrayImage;

/// Every intermediate image of one detection run, plus the traced contours
#[derive(Debug, Clone)]
pub struct DetectionStages {
    /// Inverted Otsu mask
    pub mask: GrayImage,
    /// Mask after erosion, dilation and closing
    pub cleaned: GrayImage,
    /// Canny edge map of the cleaned mask
    pub edges: GrayImage,
    /// Traced outlines
    pub contours: Vec<Contour>,
}

/// Run the full pipeline and keep every intermediate image
pub fn detect_stages(grayscale: &GrayImage, config: &DetectionConfig) -> DetectionStages {
    let (width, height) = grayscale.dimensions();

    // Step 1: Binarize
    let level = otsu_level(grayscale);
    let mask = threshold_inverted(grayscale, level);
    tracing::debug!(
        width,
        height,
        level,
        foreground = foreground_count(&mask),
        "Binarized"
    );

    // Step 2: Clean speckle noise and reconnect broken walls
    let cleaned = clean_mask(&mask, config);
    tracing::debug!(
        kernel = config.kernel_dim(),
        erosions = config.erosion_passes(),
        dilations = config.dilation_passes(),
        foreground = foreground_count(&cleaned),
        "Cleaned mask"
    );

    // Step 3: Edges
    let edges = canny_edges(&cleaned, config.canny_low, config.canny_high);
    tracing::debug!(edge_pixels = foreground_count(&edges), "Detected edges");

    // Step 4: Outlines
    let contours = trace_contours(&edges);
    tracing::debug!(
        contours = contours.len(),
        points = contours.iter().map(Contour::len).sum::<usize>(),
        "Traced contours"
    );

    DetectionStages {
        mask,
        cleaned,
        edges,
        contours,
    }
}

/// Detect wall outlines in a grayscale floor plan
pub fn detect_contours(grayscale: &GrayImage, config: &DetectionConfig) -> Vec<Contour> {
    detect_stages(grayscale, config).contours
}
