//! Fault-injecting kernel wrapper.
//!
//! `FlakyKernel` forwards every call to an inner kernel, failing the
//! operations armed on its `FaultSwitch`. The switch is shared, so a test can
//! arm faults after the kernel has been handed to a `FrameBuilder`.

use std::cell::RefCell;
use std::rc::Rc;

use frame_kernel::{Aabb, CellKernel, GeometryKernel, KernelError, SolidHandle};
use nalgebra::{Isometry3, Point3, Vector3};

/// Kernel operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultOp {
    Extrude,
    Union,
    Subtract,
    Intersect,
    Transform,
}

#[derive(Debug, Clone, Copy)]
struct Fault {
    op: FaultOp,
    /// Matching calls to let through before failing.
    skip: usize,
    /// Keep failing after the first trip.
    persistent: bool,
}

#[derive(Debug, Default)]
struct FaultState {
    armed: Option<Fault>,
    tripped: usize,
}

/// Shared handle arming faults on a `FlakyKernel`.
#[derive(Debug, Clone, Default)]
pub struct FaultSwitch(Rc<RefCell<FaultState>>);

impl FaultSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `(skip + 1)`-th call to `op` from now, once.
    pub fn fail_after(&self, op: FaultOp, skip: usize) {
        self.0.borrow_mut().armed = Some(Fault {
            op,
            skip,
            persistent: false,
        });
    }

    /// Fail every call to `op` until cleared.
    pub fn fail_always(&self, op: FaultOp) {
        self.0.borrow_mut().armed = Some(Fault {
            op,
            skip: 0,
            persistent: true,
        });
    }

    pub fn clear(&self) {
        self.0.borrow_mut().armed = None;
    }

    /// Number of failures injected so far.
    pub fn tripped(&self) -> usize {
        self.0.borrow().tripped
    }

    fn check(&self, op: FaultOp) -> Result<(), KernelError> {
        let mut state = self.0.borrow_mut();
        let Some(fault) = state.armed.as_mut() else {
            return Ok(());
        };
        if fault.op != op {
            return Ok(());
        }
        if fault.skip > 0 {
            fault.skip -= 1;
            return Ok(());
        }
        if !fault.persistent {
            state.armed = None;
        }
        state.tripped += 1;
        let reason = format!("injected {:?} fault", op);
        Err(match op {
            FaultOp::Extrude => KernelError::ExtrudeFailed { reason },
            FaultOp::Transform => KernelError::Other { message: reason },
            FaultOp::Union | FaultOp::Subtract | FaultOp::Intersect => {
                KernelError::BooleanFailed { reason }
            }
        })
    }
}

/// Kernel wrapper failing the operations armed on its switch.
pub struct FlakyKernel<K: GeometryKernel = CellKernel> {
    inner: K,
    switch: FaultSwitch,
}

impl<K: GeometryKernel> FlakyKernel<K> {
    pub fn new(inner: K, switch: FaultSwitch) -> Self {
        Self { inner, switch }
    }

    pub fn inner(&self) -> &K {
        &self.inner
    }
}

impl<K: GeometryKernel> GeometryKernel for FlakyKernel<K> {
    fn extrude_loop(
        &mut self,
        outline: &[Point3<f64>],
        direction: &Vector3<f64>,
        distance: f64,
    ) -> Result<SolidHandle, KernelError> {
        self.switch.check(FaultOp::Extrude)?;
        self.inner.extrude_loop(outline, direction, distance)
    }

    fn boolean_union(&mut self, a: &SolidHandle, b: &SolidHandle) -> Result<SolidHandle, KernelError> {
        self.switch.check(FaultOp::Union)?;
        self.inner.boolean_union(a, b)
    }

    fn boolean_subtract(&mut self, a: &SolidHandle, b: &SolidHandle) -> Result<SolidHandle, KernelError> {
        self.switch.check(FaultOp::Subtract)?;
        self.inner.boolean_subtract(a, b)
    }

    fn boolean_intersect(&mut self, a: &SolidHandle, b: &SolidHandle) -> Result<SolidHandle, KernelError> {
        self.switch.check(FaultOp::Intersect)?;
        self.inner.boolean_intersect(a, b)
    }

    fn copy_solid(&mut self, solid: &SolidHandle) -> Result<SolidHandle, KernelError> {
        self.inner.copy_solid(solid)
    }

    fn transform_solid(
        &mut self,
        solid: &SolidHandle,
        transform: &Isometry3<f64>,
    ) -> Result<SolidHandle, KernelError> {
        self.switch.check(FaultOp::Transform)?;
        self.inner.transform_solid(solid, transform)
    }

    fn bounding_box(&self, solid: &SolidHandle) -> Result<Aabb, KernelError> {
        self.inner.bounding_box(solid)
    }

    fn oriented_bounds(&self, solid: &SolidHandle, frame: &Isometry3<f64>) -> Result<Aabb, KernelError> {
        self.inner.oriented_bounds(solid, frame)
    }

    fn volume(&self, solid: &SolidHandle) -> Result<f64, KernelError> {
        self.inner.volume(solid)
    }

    fn release(&mut self, solid: SolidHandle) {
        self.inner.release(solid)
    }

    fn live_solids(&self) -> usize {
        self.inner.live_solids()
    }
}
