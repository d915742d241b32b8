// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wavefront OBJ reading and writing for quad meshes
//!
//! Output layout is strictly append-only:
//!
//! ```text
//! v 10 0 20
//! v 50 0 20
//! ...
//! f 1 2 3 4
//! ```
//!
//! Coordinates use `f64`'s `Display`, so integral values print without a
//! fractional part.

use crate::error::{Error, Result};
use crate::mesh::QuadMesh;
use nalgebra::Point3;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// File extension for OBJ output
pub const OBJ_EXTENSION: &str = "obj";

/// Write all vertex lines, then all face lines
pub fn write_obj<W: Write>(mesh: &QuadMesh, mut writer: W) -> Result<()> {
    for v in &mesh.vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for f in &mesh.faces {
        writeln!(writer, "f {} {} {} {}", f[0], f[1], f[2], f[3])?;
    }
    writer.flush()?;
    Ok(())
}

/// Create (or truncate) `path` and write the mesh to it
pub fn save_obj(mesh: &QuadMesh, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_obj(mesh, BufWriter::new(file))
}

/// Render the mesh to an OBJ string
pub fn to_obj_string(mesh: &QuadMesh) -> String {
    let mut buf = Vec::with_capacity(mesh.vertex_count() * 24 + mesh.face_count() * 20);
    // Writing into a Vec cannot fail
    let _ = write_obj(mesh, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Options for reading quad meshes: polygons kept as written.
fn quad_load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: false,
        single_index: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Parse OBJ text whose faces are all quads.
///
/// Every object and group in the file is appended into one mesh, in file
/// order. Comments, normals, texture coordinates and materials are ignored;
/// vertices no face references are dropped.
pub fn parse_obj(text: &str) -> Result<QuadMesh> {
    let mut reader = text.as_bytes();
    read_quads(&mut reader)
}

/// Read and parse an OBJ file
pub fn load_obj(path: impl AsRef<Path>) -> Result<QuadMesh> {
    let file = File::open(path.as_ref())?;
    read_quads(&mut BufReader::new(file))
}

fn read_quads<R: BufRead>(reader: &mut R) -> Result<QuadMesh> {
    let (models, _materials) = tobj::load_obj_buf(reader, &quad_load_options(), |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })?;

    let mut mesh = QuadMesh::new();
    for model in &models {
        append_quads(&mut mesh, &model.mesh)?;
    }
    Ok(mesh)
}

/// Append one model's positions and faces, shifting its 0-based local
/// indices to 1-based indices into the whole mesh.
fn append_quads(mesh: &mut QuadMesh, model: &tobj::Mesh) -> Result<()> {
    let offset = mesh.vertices.len() as u32;
    let first_face = mesh.faces.len();

    mesh.vertices.extend(
        model
            .positions
            .chunks_exact(3)
            .map(|p| Point3::new(p[0], p[1], p[2])),
    );
    let vertex_count = mesh.vertices.len() as u32;

    // An all-triangle model reports no arities
    if model.face_arities.is_empty() && !model.indices.is_empty() {
        return Err(Error::InvalidFace {
            face: first_face,
            reason: "expected quads, found triangles".to_string(),
        });
    }
    if let Some(arity) = model.face_arities.iter().find(|&&n| n != 4) {
        return Err(Error::InvalidFace {
            face: first_face,
            reason: format!("expected 4 vertex indices, found {}", arity),
        });
    }

    for (i, quad) in model.indices.chunks_exact(4).enumerate() {
        let mut face = [0u32; 4];
        for (slot, &local) in face.iter_mut().zip(quad) {
            let index = offset + local + 1;
            if index > vertex_count {
                return Err(Error::InvalidFace {
                    face: first_face + i,
                    reason: format!("index {} exceeds {} vertices", index, vertex_count),
                });
            }
            *slot = index;
        }
        mesh.faces.push(face);
    }
    Ok(())
}
