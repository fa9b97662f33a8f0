//! Convex polyhedral cells and the clipping operations the cell kernel is built on.
//!
//! A cell is a closed convex polyhedron stored as outward-oriented planar
//! polygons (counter-clockwise seen from outside). Every boolean reduces to
//! clipping cells against the face planes of other cells.

use nalgebra::{Isometry3, Point3, Vector3};

use crate::types::Aabb;

/// Distance and volume thresholds for cell clipping.
#[derive(Debug, Clone, Copy)]
pub struct CellTolerance {
    /// Points closer than this to a plane are considered on it.
    pub distance: f64,
    /// Cells smaller than this volume are discarded as slivers.
    pub volume: f64,
}

impl Default for CellTolerance {
    fn default() -> Self {
        Self {
            distance: 1e-9,
            volume: 1e-15,
        }
    }
}

/// Oriented plane. The retained half-space is behind it (signed distance <= 0).
#[derive(Debug, Clone, Copy)]
pub(crate) struct Plane {
    pub point: Point3<f64>,
    pub normal: Vector3<f64>,
}

impl Plane {
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }

    /// Positive in front, negative behind.
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        (point - self.point).dot(&self.normal)
    }

    pub fn flipped(&self) -> Self {
        Self {
            point: self.point,
            normal: -self.normal,
        }
    }
}

/// Area-weighted normal of a polygon (Newell's method). Its length is twice the area.
pub(crate) fn newell_normal(poly: &[Point3<f64>]) -> Vector3<f64> {
    let mut n = Vector3::zeros();
    let count = poly.len();
    for i in 0..count {
        let a = poly[i];
        let b = poly[(i + 1) % count];
        n.x += (a.y - b.y) * (a.z + b.z);
        n.y += (a.z - b.z) * (a.x + b.x);
        n.z += (a.x - b.x) * (a.y + b.y);
    }
    n
}

/// Drop consecutive duplicates, including the wrap-around pair.
pub(crate) fn dedup_loop(points: &[Point3<f64>], eps: f64) -> Vec<Point3<f64>> {
    let mut out: Vec<Point3<f64>> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().map_or(true, |q| (p - q).norm() > eps) {
            out.push(*p);
        }
    }
    while out.len() > 1 && (out[0] - out[out.len() - 1]).norm() <= eps {
        out.pop();
    }
    out
}

/// A closed convex polyhedron.
#[derive(Debug, Clone)]
pub(crate) struct ConvexCell {
    faces: Vec<Vec<Point3<f64>>>,
}

impl ConvexCell {
    /// Sweep a convex planar loop by `sweep`.
    pub fn prism(
        outline: &[Point3<f64>],
        sweep: &Vector3<f64>,
        tol: &CellTolerance,
    ) -> Result<Self, String> {
        let outline = dedup_loop(outline, tol.distance);
        if outline.len() < 3 {
            return Err(format!("loop has {} distinct points", outline.len()));
        }
        let normal = newell_normal(&outline);
        let Some(unit_normal) = normal.try_normalize(1e-300) else {
            return Err("loop has zero area".to_string());
        };
        let scale = outline
            .iter()
            .map(|p| (p - outline[0]).norm())
            .fold(0.0_f64, f64::max);
        if normal.norm() < tol.distance * scale {
            return Err("loop has zero area".to_string());
        }
        for p in &outline {
            if (p - outline[0]).dot(&unit_normal).abs() > tol.distance.max(1e-12 * scale) {
                return Err("loop is not planar".to_string());
            }
        }
        let height = unit_normal.dot(sweep);
        if height.abs() <= tol.distance {
            return Err("sweep lies in the loop plane".to_string());
        }
        let count = outline.len();
        for i in 0..count {
            let e1 = outline[(i + 1) % count] - outline[i];
            let e2 = outline[(i + 2) % count] - outline[(i + 1) % count];
            if e1.cross(&e2).dot(&unit_normal) < -1e-9 * e1.norm() * e2.norm() {
                return Err("loop is not convex".to_string());
            }
        }

        // Base ring ordered so that its normal agrees with the sweep.
        let base: Vec<Point3<f64>> = if height > 0.0 {
            outline
        } else {
            outline.into_iter().rev().collect()
        };
        let mut faces = Vec::with_capacity(count + 2);
        faces.push(base.iter().rev().cloned().collect());
        faces.push(base.iter().map(|p| p + sweep).collect());
        for i in 0..count {
            let a = base[i];
            let b = base[(i + 1) % count];
            faces.push(vec![a, b, b + sweep, a + sweep]);
        }
        Ok(Self { faces })
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.faces.iter().flatten()
    }

    /// Supporting planes of every non-degenerate face, pointing outward.
    pub fn planes(&self) -> Vec<Plane> {
        self.faces
            .iter()
            .filter_map(|face| {
                let n = newell_normal(face);
                if n.norm() < 1e-300 {
                    return None;
                }
                let centroid = polygon_centroid(face);
                Some(Plane::new(centroid, n))
            })
            .collect()
    }

    pub fn bounds(&self) -> Aabb {
        let mut b = Aabb::empty();
        for v in self.vertices() {
            b.include_point(v);
        }
        b
    }

    /// Enclosed volume via the divergence theorem, fanned from the vertex centroid.
    pub fn volume(&self) -> f64 {
        let mut sum = Vector3::zeros();
        let mut count = 0usize;
        for v in self.vertices() {
            sum += v.coords;
            count += 1;
        }
        if count == 0 {
            return 0.0;
        }
        let c = Point3::from(sum / count as f64);
        let mut vol = 0.0;
        for face in &self.faces {
            let p0 = face[0] - c;
            for i in 1..face.len().saturating_sub(1) {
                let p1 = face[i] - c;
                let p2 = face[i + 1] - c;
                vol += p0.dot(&p1.cross(&p2));
            }
        }
        vol / 6.0
    }

    pub fn transformed(&self, transform: &Isometry3<f64>) -> Self {
        Self {
            faces: self
                .faces
                .iter()
                .map(|face| face.iter().map(|p| transform.transform_point(p)).collect())
                .collect(),
        }
    }

    /// Keep the part of the cell behind `plane`.
    ///
    /// Returns the cell unchanged when it lies entirely behind, `None` when it
    /// lies entirely in front.
    pub fn clip(&self, plane: &Plane, eps: f64) -> Option<ConvexCell> {
        let mut min_d = f64::INFINITY;
        let mut max_d = f64::NEG_INFINITY;
        for v in self.vertices() {
            let d = plane.signed_distance(v);
            min_d = min_d.min(d);
            max_d = max_d.max(d);
        }
        if max_d <= eps {
            return Some(self.clone());
        }
        if min_d >= -eps {
            return None;
        }

        let mut faces = Vec::with_capacity(self.faces.len() + 1);
        let mut cap: Vec<Point3<f64>> = Vec::new();
        for face in &self.faces {
            let n = face.len();
            let mut out = Vec::with_capacity(n + 2);
            for i in 0..n {
                let cur = face[i];
                let next = face[(i + 1) % n];
                let dc = plane.signed_distance(&cur);
                let dn = plane.signed_distance(&next);
                if dc <= eps {
                    out.push(cur);
                    if dc >= -eps {
                        cap.push(cur);
                    }
                }
                if (dc < -eps && dn > eps) || (dc > eps && dn < -eps) {
                    let t = dc / (dc - dn);
                    let p = cur + (next - cur) * t;
                    out.push(p);
                    cap.push(p);
                }
            }
            let out = dedup_loop(&out, eps);
            if out.len() >= 3 && newell_normal(&out).norm() > eps * eps {
                faces.push(out);
            }
        }

        let cap = order_around(&unique_points(&cap, eps), &plane.normal);
        if cap.len() >= 3 {
            faces.push(cap);
        }
        if faces.len() < 4 {
            return None;
        }
        Some(ConvexCell { faces })
    }
}

fn polygon_centroid(poly: &[Point3<f64>]) -> Point3<f64> {
    let mut sum = Vector3::zeros();
    for p in poly {
        sum += p.coords;
    }
    Point3::from(sum / poly.len().max(1) as f64)
}

fn unique_points(points: &[Point3<f64>], eps: f64) -> Vec<Point3<f64>> {
    let mut out: Vec<Point3<f64>> = Vec::with_capacity(points.len());
    for p in points {
        if !out.iter().any(|q| (p - q).norm() <= eps * 10.0) {
            out.push(*p);
        }
    }
    out
}

/// Sort coplanar points counter-clockwise around `normal`.
fn order_around(points: &[Point3<f64>], normal: &Vector3<f64>) -> Vec<Point3<f64>> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let c = polygon_centroid(points);
    let helper = if normal.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let u = normal.cross(&helper).normalize();
    let v = normal.cross(&u);
    let mut keyed: Vec<(f64, Point3<f64>)> = points
        .iter()
        .map(|p| {
            let d = p - c;
            (d.dot(&v).atan2(d.dot(&u)), *p)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    keyed.into_iter().map(|(_, p)| p).collect()
}

/// Disjoint convex pieces covering `a` minus `b`.
pub(crate) fn subtract_cell(a: &ConvexCell, b: &ConvexCell, tol: &CellTolerance) -> Vec<ConvexCell> {
    if !a.bounds().overlaps(&b.bounds()) {
        return vec![a.clone()];
    }
    let mut pieces = Vec::new();
    let mut rest = a.clone();
    for plane in b.planes() {
        if let Some(outside) = rest.clip(&plane.flipped(), tol.distance) {
            if outside.volume() > tol.volume {
                pieces.push(outside);
            }
        }
        match rest.clip(&plane, tol.distance) {
            Some(inside) => rest = inside,
            None => return pieces,
        }
    }
    pieces
}

/// The common part of two cells, if it has volume.
pub(crate) fn intersect_cells(
    a: &ConvexCell,
    b: &ConvexCell,
    tol: &CellTolerance,
) -> Option<ConvexCell> {
    if !a.bounds().overlaps(&b.bounds()) {
        return None;
    }
    let mut rest = a.clone();
    for plane in b.planes() {
        rest = rest.clip(&plane, tol.distance)?;
    }
    (rest.volume() > tol.volume).then_some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(size: f64) -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(size, 0.0, 0.0),
            Point3::new(size, size, 0.0),
            Point3::new(0.0, size, 0.0),
        ]
    }

    #[test]
    fn prism_volume_independent_of_sweep_sign() {
        let tol = CellTolerance::default();
        let up = ConvexCell::prism(&square(2.0), &Vector3::new(0.0, 0.0, 3.0), &tol).unwrap();
        let down = ConvexCell::prism(&square(2.0), &Vector3::new(0.0, 0.0, -3.0), &tol).unwrap();
        assert_relative_eq!(up.volume(), 12.0, epsilon = 1e-12);
        assert_relative_eq!(down.volume(), 12.0, epsilon = 1e-12);
        assert_eq!(up.planes().len(), 6);
    }

    #[test]
    fn planes_point_outward() {
        let tol = CellTolerance::default();
        let cell = ConvexCell::prism(&square(1.0), &Vector3::new(0.0, 0.0, 1.0), &tol).unwrap();
        let inside = Point3::new(0.5, 0.5, 0.5);
        for plane in cell.planes() {
            assert!(plane.signed_distance(&inside) < 0.0);
        }
    }

    #[test]
    fn non_convex_loop_rejected() {
        let tol = CellTolerance::default();
        let arrow = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(1.0, 0.5, 0.0),
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ];
        assert!(ConvexCell::prism(&arrow, &Vector3::z(), &tol).is_err());
    }

    #[test]
    fn diagonal_clip_halves_cube() {
        let tol = CellTolerance::default();
        let cube = ConvexCell::prism(&square(1.0), &Vector3::new(0.0, 0.0, 1.0), &tol).unwrap();
        let plane = Plane::new(Point3::new(0.5, 0.5, 0.0), Vector3::new(1.0, 1.0, 0.0));
        let kept = cube.clip(&plane, tol.distance).unwrap();
        assert_relative_eq!(kept.volume(), 0.5, epsilon = 1e-12);
        let other = cube.clip(&plane.flipped(), tol.distance).unwrap();
        assert_relative_eq!(other.volume(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn subtract_pieces_are_disjoint_and_complete() {
        let tol = CellTolerance::default();
        let a = ConvexCell::prism(&square(2.0), &Vector3::new(0.0, 0.0, 2.0), &tol).unwrap();
        let b = ConvexCell::prism(&square(1.0), &Vector3::new(0.0, 0.0, 1.0), &tol)
            .unwrap()
            .transformed(&Isometry3::translation(1.5, 1.5, 1.5));
        let pieces = subtract_cell(&a, &b, &tol);
        let total: f64 = pieces.iter().map(|p| p.volume()).sum();
        assert_relative_eq!(total, 8.0 - 0.125, epsilon = 1e-9);
        let common = intersect_cells(&a, &b, &tol).unwrap();
        assert_relative_eq!(common.volume(), 0.125, epsilon = 1e-12);
    }
}
