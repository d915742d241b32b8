// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for floor plan contour extraction

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Integer pixel position
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(f64::from(self.x), f64::from(self.y))
    }
}

/// Whether a traced border surrounds a region or a hole inside one
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BorderKind {
    Outer,
    Hole,
}

/// Closed outline traced from an edge map
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contour {
    /// Outline points; the last point connects back to the first
    pub points: Vec<PixelPoint>,
    /// Border classification
    pub border: BorderKind,
    /// Index of the enclosing contour in the same result set
    pub parent: Option<usize>,
}

impl Contour {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A single point cannot form an edge
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2
    }

    /// Outline as plan coordinates for extrusion
    pub fn to_polygon(&self) -> Vec<Point2<f64>> {
        self.points.iter().map(PixelPoint::to_nalgebra).collect()
    }
}

/// Configuration for the mask cleaning and edge detection stages
///
/// Kernel size and iteration counts are real-valued and rounded up before
/// use, so `2.5` means a 3x3 kernel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectionConfig {
    /// Side length of the square structuring element
    pub kernel_size: f64,
    /// Erosion passes before dilation
    pub erosion_iterations: f64,
    /// Dilation passes after erosion
    pub dilation_iterations: f64,
    /// Canny hysteresis low threshold (0-255 scale)
    pub canny_low: f32,
    /// Canny hysteresis high threshold (0-255 scale)
    pub canny_high: f32,
}

impl DetectionConfig {
    /// Kernel side after rounding up, at least 1
    pub fn kernel_dim(&self) -> u32 {
        ceil_count(self.kernel_size).max(1)
    }

    /// Erosion passes after rounding up
    pub fn erosion_passes(&self) -> u32 {
        ceil_count(self.erosion_iterations)
    }

    /// Dilation passes after rounding up
    pub fn dilation_passes(&self) -> u32 {
        ceil_count(self.dilation_iterations)
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            kernel_size: 2.5,
            erosion_iterations: 2.0,
            dilation_iterations: 2.0,
            canny_low: 50.0,
            canny_high: 150.0,
        }
    }
}

fn ceil_count(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.ceil().min(u32::MAX as f64) as u32
    } else {
        0
    }
}
