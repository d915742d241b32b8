// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single-image conversion: grayscale plan in, extruded quad mesh out.

use crate::config::PipelineConfig;
use crate::error::Result;
use image::GrayImage;
use plan3d_geometry::{MeshBuilder, QuadMesh};
use plan3d_vision::{decode_grayscale, detect_stages, load_grayscale, Contour, DetectionStages};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Summary of one conversion
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversionStats {
    pub width: u32,
    pub height: u32,
    /// Contours traced, degenerate ones included
    pub contours: usize,
    /// Contours with fewer than two points, not extruded
    pub degenerate_contours: usize,
    pub wall_faces: usize,
    pub has_floor: bool,
    pub vertex_count: usize,
    pub face_count: usize,
}

/// Mesh plus everything computed on the way to it
#[derive(Debug, Clone)]
pub struct Conversion {
    pub mesh: QuadMesh,
    pub stats: ConversionStats,
    /// Intermediate images, kept for debug output
    pub stages: DetectionStages,
}

/// Extrude every contour as walls, then close the mesh with a floor quad.
///
/// Each call starts from an empty mesh, so face indices always count from 1
/// within the returned mesh. Contours are extruded in the order given.
pub fn build_mesh(contours: &[Contour], wall_height: f64) -> Result<MeshBuilder> {
    let mut builder = MeshBuilder::new(wall_height)?;
    for contour in contours {
        builder.add_wall(&contour.to_polygon());
    }
    builder.add_floor();
    Ok(builder)
}

/// Convert an already loaded grayscale floor plan.
pub fn convert_grayscale(gray: &GrayImage, config: &PipelineConfig) -> Result<Conversion> {
    config.validate()?;

    let (width, height) = gray.dimensions();
    let stages = detect_stages(gray, &config.detection);
    tracing::debug!(
        width,
        height,
        contours = stages.contours.len(),
        "Traced outlines"
    );

    let builder = build_mesh(&stages.contours, config.wall_height)?;
    let wall_faces = builder.wall_faces();
    let has_floor = builder.has_floor();
    let degenerate_contours = builder.skipped_outlines();
    let mesh = builder.finish();

    let stats = ConversionStats {
        width,
        height,
        contours: stages.contours.len(),
        degenerate_contours,
        wall_faces,
        has_floor,
        vertex_count: mesh.vertex_count(),
        face_count: mesh.face_count(),
    };
    tracing::debug!(
        vertices = stats.vertex_count,
        faces = stats.face_count,
        skipped = degenerate_contours,
        "Built mesh"
    );

    Ok(Conversion {
        mesh,
        stats,
        stages,
    })
}

/// Decode an encoded image held in memory and convert it.
pub fn convert_bytes(bytes: &[u8], config: &PipelineConfig) -> Result<Conversion> {
    let gray = decode_grayscale(bytes)?;
    convert_grayscale(&gray, config)
}

/// Load an image file and convert it.
pub fn convert_file(path: impl AsRef<Path>, config: &PipelineConfig) -> Result<Conversion> {
    let gray = load_grayscale(path)?;
    convert_grayscale(&gray, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use image::Luma;
    use plan3d_vision::{BorderKind, PixelPoint};

    fn contour(raw: &[(i32, i32)]) -> Contour {
        Contour {
            points: raw.iter().map(|&(x, y)| PixelPoint::new(x, y)).collect(),
            border: BorderKind::Outer,
            parent: None,
        }
    }

    #[test]
    fn test_build_mesh_single_room() {
        let room = contour(&[(10, 10), (90, 10), (90, 90), (10, 90)]);
        let mesh = build_mesh(&[room], 100.0).unwrap().finish();

        assert_eq!(mesh.vertex_count(), 20);
        assert_eq!(mesh.face_count(), 5);
        assert_eq!(*mesh.faces.last().unwrap(), [17, 18, 19, 20]);
    }

    #[test]
    fn test_build_mesh_skips_degenerate_contours() {
        let contours = [
            contour(&[(5, 5)]),
            contour(&[(0, 0), (10, 0), (10, 10)]),
            contour(&[]),
        ];
        let builder = build_mesh(&contours, 50.0).unwrap();

        assert_eq!(builder.wall_faces(), 3);
        assert_eq!(builder.skipped_outlines(), 2);
        assert_eq!(builder.mesh().face_count(), 4);
    }

    #[test]
    fn test_build_mesh_without_contours_is_empty() {
        let builder = build_mesh(&[], 100.0).unwrap();
        assert!(!builder.has_floor());
        assert!(builder.finish().is_empty());
    }

    #[test]
    fn test_blank_plan_gives_empty_mesh() {
        let gray = GrayImage::from_pixel(40, 30, Luma([255]));
        let conversion = convert_grayscale(&gray, &PipelineConfig::default()).unwrap();

        assert!(conversion.mesh.is_empty());
        assert_eq!(conversion.stats.width, 40);
        assert_eq!(conversion.stats.height, 30);
        assert_eq!(conversion.stats.contours, 0);
        assert!(!conversion.stats.has_floor);
    }

    #[test]
    fn test_filled_room_stats_are_consistent() {
        let mut gray = GrayImage::from_pixel(120, 120, Luma([255]));
        for y in 30..90 {
            for x in 30..90 {
                gray.put_pixel(x, y, Luma([0]));
            }
        }

        let conversion = convert_grayscale(&gray, &PipelineConfig::default()).unwrap();
        let stats = conversion.stats;
        let expected_walls: usize = conversion
            .stages
            .contours
            .iter()
            .filter(|c| !c.is_degenerate())
            .map(Contour::len)
            .sum();

        assert!(stats.has_floor);
        assert_eq!(stats.wall_faces, expected_walls);
        assert_eq!(stats.face_count, expected_walls + 1);
        assert_eq!(stats.vertex_count, stats.face_count * 4);
        assert!(conversion.mesh.validate().is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let gray = GrayImage::from_pixel(8, 8, Luma([255]));
        let config = PipelineConfig {
            wall_height: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            convert_grayscale(&gray, &config),
            Err(ConvertError::Config(_))
        ));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let err = convert_bytes(b"definitely not an image", &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, ConvertError::Vision(_)));
    }
}
