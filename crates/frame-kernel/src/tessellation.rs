//! Mesh-based measurements for truck solids.
//!
//! truck has no analytic mass properties, so volume is taken from a
//! triangulation of the boundary.

use nalgebra::Point3 as NPoint3;
use truck_meshalgo::prelude::*;
use truck_meshalgo::tessellation::MeshableShape;

type TruckSolid = truck_modeling::Solid;

/// Triangles of the solid's boundary, outward-oriented.
pub fn boundary_triangles(solid: &TruckSolid, tolerance: f64) -> Vec<[NPoint3<f64>; 3]> {
    let meshed_solid = solid.triangulation(tolerance);
    let mut triangles = Vec::new();

    for shell in meshed_solid.boundaries().iter() {
        for face in shell.face_iter() {
            let maybe_mesh: Option<PolygonMesh> = face.surface();
            let Some(face_mesh) = maybe_mesh else {
                continue;
            };
            let face_mesh = if !face.orientation() {
                let mut m = face_mesh;
                m.invert();
                m
            } else {
                face_mesh
            };

            let positions = face_mesh.positions();
            for tri in face_mesh.tri_faces() {
                let corner = |i: usize| {
                    let p = positions[tri[i].pos];
                    NPoint3::new(p[0], p[1], p[2])
                };
                triangles.push([corner(0), corner(1), corner(2)]);
            }
        }
    }
    triangles
}

/// Signed volume enclosed by outward-oriented triangles.
pub fn mesh_volume(triangles: &[[NPoint3<f64>; 3]]) -> f64 {
    triangles
        .iter()
        .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)))
        .sum::<f64>()
        / 6.0
}
