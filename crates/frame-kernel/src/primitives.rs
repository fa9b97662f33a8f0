//! Loop builders and small solids on top of `GeometryKernel::extrude_loop`.
//!
//! Kernels only know how to sweep planar loops; boxes and cutters are built
//! from loops here.

use std::f64::consts::PI;

use nalgebra::{Point3, Vector3};

use crate::traits::GeometryKernel;
use crate::types::{KernelError, SolidHandle};

/// Rectangle centered on `center`, spanned by unit axes `x` and `y`.
/// Counter-clockwise seen from `x × y`.
pub fn rectangle_loop(
    center: &Point3<f64>,
    x: &Vector3<f64>,
    y: &Vector3<f64>,
    width: f64,
    height: f64,
) -> Vec<Point3<f64>> {
    let hx = x * (width / 2.0);
    let hy = y * (height / 2.0);
    vec![
        center - hx - hy,
        center + hx - hy,
        center + hx + hy,
        center - hx + hy,
    ]
}

/// Square of side `2 * half` centered on `center`.
pub fn square_loop(
    center: &Point3<f64>,
    x: &Vector3<f64>,
    y: &Vector3<f64>,
    half: f64,
) -> Vec<Point3<f64>> {
    rectangle_loop(center, x, y, half * 2.0, half * 2.0)
}

/// Regular polygon inscribed in a circle of `radius`.
pub fn polygon_loop(
    center: &Point3<f64>,
    x: &Vector3<f64>,
    y: &Vector3<f64>,
    radius: f64,
    segments: usize,
) -> Vec<Point3<f64>> {
    let n = segments.max(3);
    (0..n)
        .map(|i| {
            let a = 2.0 * PI * i as f64 / n as f64;
            center + x * (radius * a.cos()) + y * (radius * a.sin())
        })
        .collect()
}

/// Box from the origin to `(w, h, d)`.
pub fn extrude_box(
    kernel: &mut dyn GeometryKernel,
    w: f64,
    h: f64,
    d: f64,
) -> Result<SolidHandle, KernelError> {
    let outline = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(w, 0.0, 0.0),
        Point3::new(w, h, 0.0),
        Point3::new(0.0, h, 0.0),
    ];
    kernel.extrude_loop(&outline, &Vector3::z(), d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rectangle_loop_is_centered() {
        let l = rectangle_loop(
            &Point3::new(1.0, 1.0, 0.0),
            &Vector3::x(),
            &Vector3::y(),
            2.0,
            4.0,
        );
        assert_relative_eq!(l[0], Point3::new(0.0, -1.0, 0.0));
        assert_relative_eq!(l[2], Point3::new(2.0, 3.0, 0.0));
    }

    #[test]
    fn polygon_loop_has_requested_segments() {
        let l = polygon_loop(&Point3::origin(), &Vector3::x(), &Vector3::y(), 1.0, 8);
        assert_eq!(l.len(), 8);
        for p in &l {
            assert_relative_eq!(p.coords.norm(), 1.0, epsilon = 1e-12);
        }
    }
}
