//! CellKernel: exact polyhedral kernel over unions of disjoint convex cells.
//!
//! Every solid is a list of convex cells with pairwise disjoint interiors, so
//! volume is a plain sum and booleans reduce to half-space clipping. Planar
//! cuts produce exact results, which makes this the kernel the joint engine is
//! tested against.

use std::collections::HashMap;

use nalgebra::{Isometry3, Point3, Vector3};
use tracing::debug;

use crate::cell::{intersect_cells, subtract_cell, CellTolerance, ConvexCell};
use crate::traits::GeometryKernel;
use crate::types::*;

/// A solid: disjoint convex cells. May be empty.
#[derive(Debug, Clone, Default)]
struct CellSolid {
    cells: Vec<ConvexCell>,
}

impl CellSolid {
    fn bounds(&self) -> Aabb {
        self.cells
            .iter()
            .fold(Aabb::empty(), |acc, c| acc.union(&c.bounds()))
    }
}

/// Convex-cell geometry kernel.
pub struct CellKernel {
    next_handle: u64,
    solids: HashMap<u64, CellSolid>,
    tolerance: CellTolerance,
}

impl CellKernel {
    pub fn new() -> Self {
        Self::with_tolerance(CellTolerance::default())
    }

    pub fn with_tolerance(tolerance: CellTolerance) -> Self {
        Self {
            next_handle: 1,
            solids: HashMap::new(),
            tolerance,
        }
    }

    pub fn tolerance(&self) -> &CellTolerance {
        &self.tolerance
    }

    fn alloc_handle(&mut self) -> SolidHandle {
        let h = SolidHandle(self.next_handle);
        self.next_handle += 1;
        h
    }

    fn store(&mut self, solid: CellSolid) -> SolidHandle {
        let handle = self.alloc_handle();
        self.solids.insert(handle.id(), solid);
        handle
    }

    fn get(&self, handle: &SolidHandle) -> Result<&CellSolid, KernelError> {
        self.solids
            .get(&handle.id())
            .ok_or(KernelError::SolidNotFound { handle: *handle })
    }

    fn subtract_cells(&self, from: &[ConvexCell], tool: &[ConvexCell]) -> Vec<ConvexCell> {
        let mut current = from.to_vec();
        for b in tool {
            current = current
                .iter()
                .flat_map(|a| subtract_cell(a, b, &self.tolerance))
                .collect();
        }
        current
    }
}

impl Default for CellKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryKernel for CellKernel {
    fn extrude_loop(
        &mut self,
        outline: &[Point3<f64>],
        direction: &Vector3<f64>,
        distance: f64,
    ) -> Result<SolidHandle, KernelError> {
        let Some(dir) = direction.try_normalize(1e-12) else {
            return Err(KernelError::ExtrudeFailed {
                reason: "extrude direction has zero length".to_string(),
            });
        };
        let cell = ConvexCell::prism(outline, &(dir * distance), &self.tolerance).map_err(
            |reason| {
                if reason.contains("not convex") {
                    KernelError::NotSupported {
                        operation: format!("extrude_loop: {reason}"),
                    }
                } else {
                    KernelError::ExtrudeFailed { reason }
                }
            },
        )?;
        Ok(self.store(CellSolid { cells: vec![cell] }))
    }

    fn boolean_union(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError> {
        let solid_a = self.get(a)?;
        let solid_b = self.get(b)?;
        let mut cells = solid_a.cells.clone();
        cells.extend(self.subtract_cells(&solid_b.cells, &solid_a.cells));
        debug!(cells = cells.len(), "cell union");
        Ok(self.store(CellSolid { cells }))
    }

    fn boolean_subtract(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError> {
        let solid_a = self.get(a)?;
        let solid_b = self.get(b)?;
        let cells = if solid_a.bounds().overlaps(&solid_b.bounds()) {
            self.subtract_cells(&solid_a.cells, &solid_b.cells)
        } else {
            solid_a.cells.clone()
        };
        debug!(cells = cells.len(), "cell subtract");
        Ok(self.store(CellSolid { cells }))
    }

    fn boolean_intersect(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError> {
        let solid_a = self.get(a)?;
        let solid_b = self.get(b)?;
        let mut cells = Vec::new();
        for ca in &solid_a.cells {
            for cb in &solid_b.cells {
                if let Some(c) = intersect_cells(ca, cb, &self.tolerance) {
                    cells.push(c);
                }
            }
        }
        debug!(cells = cells.len(), "cell intersect");
        Ok(self.store(CellSolid { cells }))
    }

    fn copy_solid(&mut self, solid: &SolidHandle) -> Result<SolidHandle, KernelError> {
        let copy = self.get(solid)?.clone();
        Ok(self.store(copy))
    }

    fn transform_solid(
        &mut self,
        solid: &SolidHandle,
        transform: &Isometry3<f64>,
    ) -> Result<SolidHandle, KernelError> {
        let cells = self
            .get(solid)?
            .cells
            .iter()
            .map(|c| c.transformed(transform))
            .collect();
        Ok(self.store(CellSolid { cells }))
    }

    fn bounding_box(&self, solid: &SolidHandle) -> Result<Aabb, KernelError> {
        Ok(self.get(solid)?.bounds())
    }

    fn oriented_bounds(
        &self,
        solid: &SolidHandle,
        frame: &Isometry3<f64>,
    ) -> Result<Aabb, KernelError> {
        let mut b = Aabb::empty();
        for cell in &self.get(solid)?.cells {
            for v in cell.vertices() {
                b.include_point(&frame.inverse_transform_point(v));
            }
        }
        Ok(b)
    }

    fn volume(&self, solid: &SolidHandle) -> Result<f64, KernelError> {
        Ok(self.get(solid)?.cells.iter().map(|c| c.volume()).sum())
    }

    fn release(&mut self, solid: SolidHandle) {
        self.solids.remove(&solid.id());
    }

    fn live_solids(&self) -> usize {
        self.solids.len()
    }
}
