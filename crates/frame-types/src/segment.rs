use nalgebra::{Isometry3, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// One end of a member's construction axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisEnd {
    Start,
    End,
}

impl AxisEnd {
    pub fn opposite(self) -> Self {
        match self {
            AxisEnd::Start => AxisEnd::End,
            AxisEnd::End => AxisEnd::Start,
        }
    }
}

/// A straight construction segment (a member's canonical axis).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl Segment {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Unit direction from start to end, or `None` for a zero-length segment.
    pub fn direction(&self) -> Option<Vector3<f64>> {
        (self.end - self.start).try_normalize(1e-12)
    }

    pub fn midpoint(&self) -> Point3<f64> {
        nalgebra::center(&self.start, &self.end)
    }

    pub fn endpoint(&self, end: AxisEnd) -> Point3<f64> {
        match end {
            AxisEnd::Start => self.start,
            AxisEnd::End => self.end,
        }
    }

    /// Unclamped parameter of the projection of `p` onto the segment's line.
    pub fn parameter_of(&self, p: &Point3<f64>) -> f64 {
        let d = self.end - self.start;
        let len2 = d.norm_squared();
        if len2 < 1e-24 {
            return 0.0;
        }
        (p - self.start).dot(&d) / len2
    }

    /// Distance from `p` to the infinite line through the segment.
    pub fn distance_to_line(&self, p: &Point3<f64>) -> f64 {
        let d = self.end - self.start;
        let len = d.norm();
        if len < 1e-12 {
            return (p - self.start).norm();
        }
        (p - self.start).cross(&d).norm() / len
    }

    /// The segment lengthened by `margin` past each end.
    pub fn extended(&self, margin: f64) -> Self {
        match self.direction() {
            Some(dir) => Self {
                start: self.start - dir * margin,
                end: self.end + dir * margin,
            },
            None => *self,
        }
    }

    /// The infinite line carrying the segment.
    pub fn line(&self) -> Line3 {
        Line3::new(self.start, self.direction().unwrap_or_else(Vector3::zeros))
    }

    pub fn translated(&self, offset: &Vector3<f64>) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }

    pub fn transformed(&self, placement: &Isometry3<f64>) -> Self {
        Self {
            start: placement.transform_point(&self.start),
            end: placement.transform_point(&self.end),
        }
    }

    pub fn inverse_transformed(&self, placement: &Isometry3<f64>) -> Self {
        Self {
            start: placement.inverse_transform_point(&self.start),
            end: placement.inverse_transform_point(&self.end),
        }
    }
}

/// An infinite line through `point` along unit `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line3 {
    pub point: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Line3 {
    pub fn new(point: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self { point, direction }
    }

    /// Intersection with another line.
    ///
    /// Returns the midpoint of the closest approach, or `None` when the lines
    /// are parallel (the solve denominator falls below `tol`).
    pub fn intersect(&self, other: &Line3, tol: f64) -> Option<Point3<f64>> {
        let d1 = self.direction;
        let d2 = other.direction;
        let r = self.point - other.point;
        let a = d1.dot(&d1);
        let b = d1.dot(&d2);
        let c = d2.dot(&d2);
        let d = d1.dot(&r);
        let e = d2.dot(&r);
        let denom = a * c - b * b;
        if denom.abs() < tol {
            return None;
        }
        let s = (b * e - c * d) / denom;
        let t = (a * e - b * d) / denom;
        let p1 = self.point + d1 * s;
        let p2 = other.point + d2 * t;
        Some(nalgebra::center(&p1, &p2))
    }

    pub fn transformed(&self, placement: &Isometry3<f64>) -> Self {
        Self {
            point: placement.transform_point(&self.point),
            direction: placement.transform_vector(&self.direction),
        }
    }

    pub fn inverse_transformed(&self, placement: &Isometry3<f64>) -> Self {
        Self {
            point: placement.inverse_transform_point(&self.point),
            direction: placement.inverse_transform_vector(&self.direction),
        }
    }
}
