// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion operations - converting plan outlines to wall panels and a floor quad

use crate::error::{Error, Result};
use crate::mesh::QuadMesh;
use nalgebra::{Point2, Point3};

/// Default wall height in plan units (pixels)
pub const DEFAULT_WALL_HEIGHT: f64 = 100.0;

/// Builds the quad mesh for a single floor plan.
///
/// One builder per image: walls first, floor last, then [`MeshBuilder::finish`].
/// Plan coordinates map to `(x, 0, y)` on the ground and `(x, height, y)` on top.
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    mesh: QuadMesh,
    wall_height: f64,
    wall_faces: usize,
    skipped_outlines: usize,
    has_floor: bool,
}

impl MeshBuilder {
    /// Create a builder extruding walls to `wall_height`
    pub fn new(wall_height: f64) -> Result<Self> {
        if !wall_height.is_finite() || wall_height <= 0.0 {
            return Err(Error::InvalidHeight(wall_height));
        }

        Ok(Self {
            mesh: QuadMesh::new(),
            wall_height,
            wall_faces: 0,
            skipped_outlines: 0,
            has_floor: false,
        })
    }

    /// Wall height used for extrusion
    #[inline]
    pub fn wall_height(&self) -> f64 {
        self.wall_height
    }

    /// Extrude a closed outline into wall panels.
    ///
    /// Every edge `(p[i], p[i+1])`, including the closing edge from the last
    /// point back to the first, becomes one quad with corners
    /// bottom-near, bottom-far, top-far, top-near. Outlines with fewer than
    /// two points cannot form an edge and are skipped.
    ///
    /// Returns the number of panels added.
    pub fn add_wall(&mut self, outline: &[Point2<f64>]) -> usize {
        let n = outline.len();
        if n < 2 {
            self.skipped_outlines += 1;
            return 0;
        }

        self.mesh.vertices.reserve(n * 4);
        self.mesh.faces.reserve(n);

        let h = self.wall_height;
        for i in 0..n {
            let p1 = outline[i];
            let p2 = outline[(i + 1) % n];

            self.mesh.push_quad([
                Point3::new(p1.x, 0.0, p1.y),
                Point3::new(p2.x, 0.0, p2.y),
                Point3::new(p2.x, h, p2.y),
                Point3::new(p1.x, h, p1.y),
            ]);
        }

        self.wall_faces += n;
        n
    }

    /// Append the floor quad spanning the X/Z bounds of everything built so far.
    ///
    /// Does nothing (and returns `false`) when no vertices exist yet.
    pub fn add_floor(&mut self) -> bool {
        let Some(b) = self.mesh.bounds() else {
            return false;
        };

        self.mesh.push_quad([
            Point3::new(b.min_x, 0.0, b.min_z),
            Point3::new(b.max_x, 0.0, b.min_z),
            Point3::new(b.max_x, 0.0, b.max_z),
            Point3::new(b.min_x, 0.0, b.max_z),
        ]);
        self.has_floor = true;
        true
    }

    /// Number of wall panels added
    #[inline]
    pub fn wall_faces(&self) -> usize {
        self.wall_faces
    }

    /// Number of outlines skipped as degenerate
    #[inline]
    pub fn skipped_outlines(&self) -> usize {
        self.skipped_outlines
    }

    /// Whether a floor quad was emitted
    #[inline]
    pub fn has_floor(&self) -> bool {
        self.has_floor
    }

    /// Mesh built so far
    #[inline]
    pub fn mesh(&self) -> &QuadMesh {
        &self.mesh
    }

    /// Consume the builder and return the mesh
    pub fn finish(self) -> QuadMesh {
        self.mesh
    }
}
