//! Decomposition of cross-sections into convex polygons.
//!
//! Kernels extrude convex loops most reliably, so every section family is
//! expressed as a set of convex pieces that tile the section. Coordinates are
//! section X/Y with the section centered on its bounding box.

use std::f64::consts::PI;

use frame_types::{ProfileSpec, ProfileType};

use crate::types::SweepError;

pub type Polygon2 = Vec<[f64; 2]>;

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon2 {
    vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]]
}

fn invalid(reason: impl Into<String>) -> SweepError {
    SweepError::InvalidSection {
        reason: reason.into(),
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), SweepError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be positive, got {value}")))
    }
}

/// Convex pieces tiling the section of `profile`.
pub fn convex_pieces(profile: &ProfileSpec, circle_segments: usize) -> Result<Vec<Polygon2>, SweepError> {
    if profile.profile_type.is_outline_based() {
        return outline_pieces(&profile.outline, &profile.holes);
    }

    let (w, h) = (profile.width, profile.height);
    require_positive("width", w)?;
    require_positive("height", h)?;
    let (hw, hh) = (w / 2.0, h / 2.0);

    match profile.profile_type {
        ProfileType::Rectangular => match profile.wall_thickness {
            None => Ok(vec![rect(-hw, -hh, hw, hh)]),
            Some(t) => {
                require_positive("wall thickness", t)?;
                if 2.0 * t >= w.min(h) {
                    return Err(invalid("wall thickness closes the tube"));
                }
                Ok(vec![
                    rect(-hw, hh - t, hw, hh),
                    rect(-hw, -hh, hw, -hh + t),
                    rect(-hw, -hh + t, -hw + t, hh - t),
                    rect(hw - t, -hh + t, hw, hh - t),
                ])
            }
        },
        ProfileType::Circular => {
            let n = circle_segments.max(3);
            let r = hw;
            let ring = |radius: f64| -> Polygon2 {
                (0..n)
                    .map(|i| {
                        let a = 2.0 * PI * i as f64 / n as f64;
                        [radius * a.cos(), radius * a.sin()]
                    })
                    .collect()
            };
            match profile.wall_thickness {
                None => Ok(vec![ring(r)]),
                Some(t) => {
                    require_positive("wall thickness", t)?;
                    if t >= r {
                        return Err(invalid("wall thickness closes the tube"));
                    }
                    let outer = ring(r);
                    let inner = ring(r - t);
                    Ok((0..n)
                        .map(|i| {
                            let j = (i + 1) % n;
                            vec![outer[i], outer[j], inner[j], inner[i]]
                        })
                        .collect())
                }
            }
        }
        ProfileType::H => {
            let (f, web) = (profile.flange_thickness, profile.web_thickness);
            require_positive("flange thickness", f)?;
            require_positive("web thickness", web)?;
            if 2.0 * f >= h || web >= w {
                return Err(invalid("H section flanges or web too thick"));
            }
            Ok(vec![
                rect(-hw, hh - f, hw, hh),
                rect(-hw, -hh, hw, -hh + f),
                rect(-web / 2.0, -hh + f, web / 2.0, hh - f),
            ])
        }
        ProfileType::L => {
            let t = profile.web_thickness;
            require_positive("leg thickness", t)?;
            if t >= w || t >= h {
                return Err(invalid("L section legs too thick"));
            }
            Ok(vec![
                rect(-hw, -hh, -hw + t, hh),
                rect(-hw + t, -hh, hw, -hh + t),
            ])
        }
        ProfileType::T => {
            let (f, web) = (profile.flange_thickness, profile.web_thickness);
            require_positive("flange thickness", f)?;
            require_positive("web thickness", web)?;
            if f >= h || web >= w {
                return Err(invalid("T section flange or web too thick"));
            }
            Ok(vec![
                rect(-hw, hh - f, hw, hh),
                rect(-web / 2.0, -hh, web / 2.0, hh - f),
            ])
        }
        ProfileType::U => {
            let t = profile.web_thickness;
            require_positive("leg thickness", t)?;
            if t >= w || 2.0 * t >= h {
                return Err(invalid("U section legs too thick"));
            }
            Ok(vec![
                rect(-hw, -hh, -hw + t, hh),
                rect(-hw + t, hh - t, hw, hh),
                rect(-hw + t, -hh, hw, -hh + t),
            ])
        }
        ProfileType::Dxf | ProfileType::Csv => Err(invalid("outline section without outline")),
    }
}

fn signed_area(poly: &[[f64; 2]]) -> f64 {
    let n = poly.len();
    (0..n)
        .map(|i| {
            let a = poly[i];
            let b = poly[(i + 1) % n];
            a[0] * b[1] - b[0] * a[1]
        })
        .sum::<f64>()
        / 2.0
}

fn is_convex(poly: &[[f64; 2]]) -> bool {
    let n = poly.len();
    let orientation = signed_area(poly).signum();
    (0..n).all(|i| {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        let c = poly[(i + 2) % n];
        let cross = (b[0] - a[0]) * (c[1] - b[1]) - (b[1] - a[1]) * (c[0] - b[0]);
        cross * orientation >= -1e-12
    })
}

/// Pieces for an explicit outline. Centered on the outline's bounding box.
fn outline_pieces(outline: &[[f64; 2]], holes: &[Vec<[f64; 2]>]) -> Result<Vec<Polygon2>, SweepError> {
    if outline.len() < 3 {
        return Err(invalid("outline needs at least 3 points"));
    }
    let mut min = [f64::INFINITY; 2];
    let mut max = [f64::NEG_INFINITY; 2];
    for p in outline {
        for i in 0..2 {
            min[i] = min[i].min(p[i]);
            max[i] = max[i].max(p[i]);
        }
    }
    let center = [(min[0] + max[0]) / 2.0, (min[1] + max[1]) / 2.0];
    let recenter = |poly: &[[f64; 2]]| -> Polygon2 {
        poly.iter().map(|p| [p[0] - center[0], p[1] - center[1]]).collect()
    };
    let outer = recenter(outline);
    if signed_area(&outer).abs() < 1e-18 {
        return Err(invalid("outline has zero area"));
    }

    let valid_holes: Vec<Polygon2> = holes
        .iter()
        .filter(|h| h.len() >= 3)
        .map(|h| recenter(h))
        .collect();
    if valid_holes.is_empty() && is_convex(&outer) {
        return Ok(vec![outer]);
    }

    // Flatten vertices for earcutr: outer ring first, then holes.
    let total_points = outer.len() + valid_holes.iter().map(|h| h.len()).sum::<usize>();
    let mut vertices = Vec::with_capacity(total_points * 2);
    let mut points = Vec::with_capacity(total_points);
    for p in &outer {
        vertices.extend_from_slice(p);
        points.push(*p);
    }
    let mut hole_indices = Vec::with_capacity(valid_holes.len());
    for hole in &valid_holes {
        hole_indices.push(vertices.len() / 2);
        for p in hole {
            vertices.extend_from_slice(p);
            points.push(*p);
        }
    }

    let indices = earcutr::earcut(&vertices, &hole_indices, 2).map_err(|e| {
        SweepError::Triangulation {
            reason: format!("{:?}", e),
        }
    })?;
    if indices.is_empty() {
        return Err(SweepError::Triangulation {
            reason: "no triangles produced".to_string(),
        });
    }

    Ok(indices
        .chunks_exact(3)
        .map(|tri| vec![points[tri[0]], points[tri[1]], points[tri[2]]])
        .filter(|tri| signed_area(tri).abs() > 1e-18)
        .collect())
}

/// Total area of a set of pieces.
pub fn pieces_area(pieces: &[Polygon2]) -> f64 {
    pieces.iter().map(|p| signed_area(p).abs()).sum()
}
