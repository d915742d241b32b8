// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! plan3d Geometry
//!
//! Quad-mesh construction for extruded floor plans: wall panels raised from
//! plan outlines, a bounding floor quad, and Wavefront OBJ serialization.

pub mod error;
pub mod extrusion;
pub mod mesh;
pub mod obj;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3};

pub use error::{Error, Result};
pub use extrusion::{MeshBuilder, DEFAULT_WALL_HEIGHT};
pub use mesh::{Footprint, QuadMesh};
pub use obj::{load_obj, parse_obj, save_obj, to_obj_string, write_obj, OBJ_EXTENSION};
