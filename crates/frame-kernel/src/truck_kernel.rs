//! TruckKernel: B-rep geometry kernel wrapping truck's API.

use std::collections::HashMap;

use nalgebra::{Isometry3, Point3 as NPoint3, Vector3 as NVector3};
use tracing::debug;

use crate::cell::newell_normal;
use crate::tessellation;
use crate::traits::GeometryKernel;
use crate::types::*;

// Import truck types selectively to avoid shadowing std::result::Result
use truck_modeling::builder;
use truck_modeling::topology::{Edge, Solid, Wire};
use truck_modeling::{InnerSpace, Matrix4, Point3, Vector3};

/// Geometry kernel backed by the truck BREP library.
pub struct TruckKernel {
    next_handle: u64,
    solids: HashMap<u64, Solid>,
    /// Tolerance handed to truck-shapeops booleans.
    boolean_tolerance: f64,
    /// Chord tolerance for the triangulation used by `volume`.
    mesh_tolerance: f64,
}

impl TruckKernel {
    pub fn new() -> Self {
        Self::with_tolerances(0.05, 0.01)
    }

    pub fn with_tolerances(boolean_tolerance: f64, mesh_tolerance: f64) -> Self {
        Self {
            next_handle: 1,
            solids: HashMap::new(),
            boolean_tolerance,
            mesh_tolerance,
        }
    }

    fn alloc_handle(&mut self) -> SolidHandle {
        let h = SolidHandle(self.next_handle);
        self.next_handle += 1;
        h
    }

    pub(crate) fn store_solid(&mut self, solid: Solid) -> SolidHandle {
        let handle = self.alloc_handle();
        self.solids.insert(handle.id(), solid);
        handle
    }

    pub(crate) fn get_solid(&self, handle: &SolidHandle) -> Result<&Solid, KernelError> {
        self.solids
            .get(&handle.id())
            .ok_or(KernelError::SolidNotFound { handle: *handle })
    }

    fn vertex_points(&self, handle: &SolidHandle) -> Result<Vec<NPoint3<f64>>, KernelError> {
        let solid = self.get_solid(handle)?;
        let mut points = Vec::new();
        for shell in solid.boundaries().iter() {
            for v in shell.vertex_iter() {
                let p = v.point();
                points.push(NPoint3::new(p.x, p.y, p.z));
            }
        }
        Ok(points)
    }
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

#[rustfmt::skip]
fn to_matrix4(transform: &Isometry3<f64>) -> Matrix4 {
    let m = transform.to_homogeneous();
    // cgmath takes columns first.
    Matrix4::new(
        m[(0, 0)], m[(1, 0)], m[(2, 0)], m[(3, 0)],
        m[(0, 1)], m[(1, 1)], m[(2, 1)], m[(3, 1)],
        m[(0, 2)], m[(1, 2)], m[(2, 2)], m[(3, 2)],
        m[(0, 3)], m[(1, 3)], m[(2, 3)], m[(3, 3)],
    )
}

impl GeometryKernel for TruckKernel {
    fn extrude_loop(
        &mut self,
        outline: &[NPoint3<f64>],
        direction: &NVector3<f64>,
        distance: f64,
    ) -> Result<SolidHandle, KernelError> {
        if outline.len() < 3 {
            return Err(KernelError::ExtrudeFailed {
                reason: "loop has fewer than 3 points".to_string(),
            });
        }
        let dir = Vector3::new(direction.x, direction.y, direction.z);
        if dir.magnitude() < 1e-12 {
            return Err(KernelError::ExtrudeFailed {
                reason: "extrude direction has zero length".to_string(),
            });
        }
        let sweep_vec = dir.normalize() * distance;

        // tsweep expects the face normal to agree with the sweep.
        let sweep_n = NVector3::new(sweep_vec.x, sweep_vec.y, sweep_vec.z);
        let ordered: Vec<Point3> = if newell_normal(outline).dot(&sweep_n) >= 0.0 {
            outline.iter().map(|p| Point3::new(p.x, p.y, p.z)).collect()
        } else {
            outline
                .iter()
                .rev()
                .map(|p| Point3::new(p.x, p.y, p.z))
                .collect()
        };

        // Create all vertices first so edges share endpoints.
        let n = ordered.len();
        let vertices: Vec<_> = ordered.iter().map(|&p| builder::vertex(p)).collect();
        let mut wire_edges: Vec<Edge> = Vec::new();
        for i in 0..n {
            let j = (i + 1) % n;
            let edge = Edge::new(
                &vertices[i],
                &vertices[j],
                truck_modeling::geometry::Curve::Line(truck_modeling::geometry::Line(
                    ordered[i], ordered[j],
                )),
            );
            wire_edges.push(edge);
        }
        let wire = Wire::from_iter(wire_edges);

        let face = builder::try_attach_plane(&[wire]).map_err(|e| KernelError::ExtrudeFailed {
            reason: format!("failed to create planar face: {}", e),
        })?;

        let solid = builder::tsweep(&face, sweep_vec);
        Ok(self.store_solid(solid))
    }

    fn boolean_union(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError> {
        let solid_a = self.get_solid(a)?.clone();
        let solid_b = self.get_solid(b)?.clone();

        let result = truck_shapeops::or(&solid_a, &solid_b, self.boolean_tolerance)
            .ok_or_else(|| KernelError::BooleanFailed {
                reason: "truck or() returned None".to_string(),
            })?;
        debug!(?a, ?b, "truck union");
        Ok(self.store_solid(result))
    }

    fn boolean_subtract(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError> {
        let solid_a = self.get_solid(a)?.clone();
        let mut solid_b = self.get_solid(b)?.clone();

        // Subtraction = A ∩ ¬B. not() mutates in place.
        solid_b.not();
        let result = truck_shapeops::and(&solid_a, &solid_b, self.boolean_tolerance)
            .ok_or_else(|| KernelError::BooleanFailed {
                reason: "truck and() returned None for subtraction".to_string(),
            })?;
        debug!(?a, ?b, "truck subtract");
        Ok(self.store_solid(result))
    }

    fn boolean_intersect(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError> {
        let solid_a = self.get_solid(a)?.clone();
        let solid_b = self.get_solid(b)?.clone();

        let result = truck_shapeops::and(&solid_a, &solid_b, self.boolean_tolerance)
            .ok_or_else(|| KernelError::BooleanFailed {
                reason: "truck and() returned None".to_string(),
            })?;
        debug!(?a, ?b, "truck intersect");
        Ok(self.store_solid(result))
    }

    fn copy_solid(&mut self, solid: &SolidHandle) -> Result<SolidHandle, KernelError> {
        let copy = self.get_solid(solid)?.clone();
        Ok(self.store_solid(copy))
    }

    fn transform_solid(
        &mut self,
        solid: &SolidHandle,
        transform: &Isometry3<f64>,
    ) -> Result<SolidHandle, KernelError> {
        let moved = builder::transformed(self.get_solid(solid)?, to_matrix4(transform));
        Ok(self.store_solid(moved))
    }

    fn bounding_box(&self, solid: &SolidHandle) -> Result<Aabb, KernelError> {
        let mut b = Aabb::empty();
        for p in self.vertex_points(solid)? {
            b.include_point(&p);
        }
        Ok(b)
    }

    fn oriented_bounds(
        &self,
        solid: &SolidHandle,
        frame: &Isometry3<f64>,
    ) -> Result<Aabb, KernelError> {
        let mut b = Aabb::empty();
        for p in self.vertex_points(solid)? {
            b.include_point(&frame.inverse_transform_point(&p));
        }
        Ok(b)
    }

    fn volume(&self, solid: &SolidHandle) -> Result<f64, KernelError> {
        let truck_solid = self.get_solid(solid)?;
        let triangles = tessellation::boundary_triangles(truck_solid, self.mesh_tolerance);
        Ok(tessellation::mesh_volume(&triangles))
    }

    fn release(&mut self, solid: SolidHandle) {
        self.solids.remove(&solid.id());
    }

    fn live_solids(&self) -> usize {
        self.solids.len()
    }
}
