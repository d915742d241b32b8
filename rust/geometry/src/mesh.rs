// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Quad mesh data structures

use crate::error::{Error, Result};
use nalgebra::Point3;

/// Axis-aligned footprint of a mesh in the X/Z (plan) plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Footprint {
    /// Width along X
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Depth along Z
    #[inline]
    pub fn depth(&self) -> f64 {
        self.max_z - self.min_z
    }
}

/// Quad mesh with 1-based face indices
///
/// Vertices are Y-up: X and Z span the floor plan, Y is height.
/// Faces reference vertices by their 1-based position in `vertices`,
/// the same numbering OBJ files use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuadMesh {
    /// Vertex positions in insertion order
    pub vertices: Vec<Point3<f64>>,
    /// Quad faces (1-based vertex indices)
    pub faces: Vec<[u32; 4]>,
}

impl QuadMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Append four vertices and one face referencing them, in order.
    ///
    /// Returns the 1-based indices of the new face.
    #[inline]
    pub fn push_quad(&mut self, corners: [Point3<f64>; 4]) -> [u32; 4] {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&corners);
        let face = [base + 1, base + 2, base + 3, base + 4];
        self.faces.push(face);
        face
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get face count
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// X/Z bounding rectangle over all vertices, `None` for an empty mesh
    pub fn bounds(&self) -> Option<Footprint> {
        let first = self.vertices.first()?;
        let init = Footprint {
            min_x: first.x,
            max_x: first.x,
            min_z: first.z,
            max_z: first.z,
        };

        Some(self.vertices.iter().fold(init, |b, v| Footprint {
            min_x: b.min_x.min(v.x),
            max_x: b.max_x.max(v.x),
            min_z: b.min_z.min(v.z),
            max_z: b.max_z.max(v.z),
        }))
    }

    /// Check face indices: each face must hold 4 distinct indices in `[1, vertex_count]`
    pub fn validate(&self) -> Result<()> {
        let count = self.vertices.len() as u64;

        for (face_idx, face) in self.faces.iter().enumerate() {
            for (i, &index) in face.iter().enumerate() {
                if index == 0 || u64::from(index) > count {
                    return Err(Error::InvalidFace {
                        face: face_idx,
                        reason: format!("index {} outside 1..={}", index, count),
                    });
                }
                if face[..i].contains(&index) {
                    return Err(Error::InvalidFace {
                        face: face_idx,
                        reason: format!("index {} repeated", index),
                    });
                }
            }
        }

        Ok(())
    }
}
