use nalgebra::{Isometry3, Point3, Vector3};

use crate::types::*;

/// Solid-modeling operations consumed by the joint engine.
///
/// Implemented by `CellKernel` (exact convex-cell reference kernel) and
/// `TruckKernel` (truck B-rep backend). Booleans never consume their inputs;
/// every returned handle is owned by the caller until passed to `release`.
pub trait GeometryKernel {
    /// Extrude a closed planar loop along `direction` by signed `distance`.
    fn extrude_loop(
        &mut self,
        outline: &[Point3<f64>],
        direction: &Vector3<f64>,
        distance: f64,
    ) -> Result<SolidHandle, KernelError>;

    /// Boolean union of two solids.
    fn boolean_union(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError>;

    /// Boolean subtraction: a minus b.
    fn boolean_subtract(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError>;

    /// Boolean intersection of two solids.
    fn boolean_intersect(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError>;

    /// Independent copy of a solid.
    fn copy_solid(&mut self, solid: &SolidHandle) -> Result<SolidHandle, KernelError>;

    /// Copy of a solid with `transform` applied to every point.
    fn transform_solid(
        &mut self,
        solid: &SolidHandle,
        transform: &Isometry3<f64>,
    ) -> Result<SolidHandle, KernelError>;

    /// Axis-aligned bounding box in the solid's own coordinates.
    fn bounding_box(&self, solid: &SolidHandle) -> Result<Aabb, KernelError>;

    /// Bounding box of the solid expressed in `frame` coordinates, where
    /// `frame` maps frame coordinates into the solid's coordinates.
    fn oriented_bounds(
        &self,
        solid: &SolidHandle,
        frame: &Isometry3<f64>,
    ) -> Result<Aabb, KernelError>;

    /// Enclosed volume.
    fn volume(&self, solid: &SolidHandle) -> Result<f64, KernelError>;

    /// Drop a solid. Releasing an unknown handle is a no-op.
    fn release(&mut self, solid: SolidHandle);

    /// Number of solids currently held by the kernel.
    fn live_solids(&self) -> usize;
}
