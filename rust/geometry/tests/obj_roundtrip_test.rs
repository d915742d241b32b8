// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Writing a built mesh to disk and reading it back.

use plan3d_geometry::{load_obj, save_obj, MeshBuilder, Point2, QuadMesh};

fn build_plan() -> QuadMesh {
    let mut builder = MeshBuilder::new(100.0).expect("valid height");

    // Outer room
    builder.add_wall(&[
        Point2::new(12.0, 8.0),
        Point2::new(188.0, 8.0),
        Point2::new(188.0, 140.0),
        Point2::new(12.0, 140.0),
    ]);
    // Inner partition traced as a thin line
    builder.add_wall(&[Point2::new(100.0, 8.0), Point2::new(100.0, 140.0)]);
    // Stray speck, too small to extrude
    builder.add_wall(&[Point2::new(50.0, 50.0)]);
    builder.add_floor();

    builder.finish()
}

#[test]
fn test_saved_file_parses_back_to_same_counts() {
    let mesh = build_plan();
    assert_eq!(mesh.face_count(), 4 + 2 + 1);
    assert_eq!(mesh.vertex_count(), 4 * mesh.face_count());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.obj");
    save_obj(&mesh, &path).unwrap();

    let parsed = load_obj(&path).unwrap();
    assert_eq!(parsed.vertex_count(), mesh.vertex_count());
    assert_eq!(parsed.face_count(), mesh.face_count());
    assert_eq!(parsed, mesh);
    assert!(parsed.validate().is_ok());

    let n = parsed.vertex_count() as u32;
    for face in &parsed.faces {
        assert!(face.iter().all(|&i| i >= 1 && i <= n));
    }
    assert_eq!(*parsed.faces.last().unwrap(), [n - 3, n - 2, n - 1, n]);
}

#[test]
fn test_save_overwrites_previous_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.obj");

    save_obj(&build_plan(), &path).unwrap();
    save_obj(&QuadMesh::new(), &path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    assert!(load_obj(&path).unwrap().is_empty());
}

#[test]
fn test_vertex_lines_precede_face_lines() {
    let text = plan3d_geometry::to_obj_string(&build_plan());
    let first_face = text.lines().position(|l| l.starts_with("f ")).unwrap();
    assert!(text.lines().take(first_face).all(|l| l.starts_with("v ")));
    assert!(text.lines().skip(first_face).all(|l| l.starts_with("f ")));
}
