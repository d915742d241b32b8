// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Edge detection and hierarchical contour tracing

use crate::types::{BorderKind, Contour, PixelPoint};
use image::GrayImage;
use imageproc::contours::BorderType;

/// Apply Canny edge detection
pub fn canny_edges(image: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    imageproc::edges::canny(image, low_threshold, high_threshold)
}

/// Trace every border in an edge map, outer borders and holes alike.
///
/// Contours come back in tracing order with their parent links intact;
/// straight runs are compressed to their end points.
pub fn trace_contours(edges: &GrayImage) -> Vec<Contour> {
    imageproc::contours::find_contours::<i32>(edges)
        .into_iter()
        .map(|c| {
            let points: Vec<PixelPoint> = c
                .points
                .iter()
                .map(|p| PixelPoint::new(p.x, p.y))
                .collect();

            Contour {
                points: compress_chain(&points),
                border: match c.border_type {
                    BorderType::Outer => BorderKind::Outer,
                    BorderType::Hole => BorderKind::Hole,
                },
                parent: c.parent,
            }
        })
        .collect()
}

/// Drop every point that continues the step direction of the previous one.
///
/// The chain is treated as closed, so the first point survives only if the
/// direction changes there. Horizontal, vertical and diagonal runs all
/// collapse to their corners.
pub fn compress_chain(points: &[PixelPoint]) -> Vec<PixelPoint> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let step = |a: PixelPoint, b: PixelPoint| ((b.x - a.x).signum(), (b.y - a.y).signum());

    let kept: Vec<PixelPoint> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            step(prev, cur) != step(cur, next)
        })
        .map(|i| points[i])
        .collect();

    if kept.is_empty() {
        vec![points[0]]
    } else {
        kept
    }
}
