use serde::{Deserialize, Serialize};

/// Cross-section family of a structural member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProfileType {
    Circular,
    Rectangular,
    H,
    L,
    T,
    U,
    /// Outline imported from a DXF drawing.
    Dxf,
    /// Outline imported from a CSV point list.
    Csv,
}

impl ProfileType {
    /// Whether the section is described by an explicit outline rather than dimensions.
    pub fn is_outline_based(&self) -> bool {
        matches!(self, ProfileType::Dxf | ProfileType::Csv)
    }
}

/// Profile metadata needed to sweep a member's cross-section.
///
/// Dimensions are in model units. Section X runs across the width, section Y
/// across the height; the section is centered on its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSpec {
    /// Section family.
    pub profile_type: ProfileType,
    /// Extent along section X. Diameter for circular sections.
    pub width: f64,
    /// Extent along section Y. Equal to `width` for circular sections.
    pub height: f64,
    /// Wall thickness for tubes. `None` means a solid section.
    #[serde(default)]
    pub wall_thickness: Option<f64>,
    /// Flange thickness for H and T sections.
    #[serde(default)]
    pub flange_thickness: f64,
    /// Web thickness for H and T sections, leg thickness for L and U.
    #[serde(default)]
    pub web_thickness: f64,
    /// Outer outline for DXF/CSV sections, in section coordinates.
    #[serde(default)]
    pub outline: Vec<[f64; 2]>,
    /// Inner outlines (holes) for DXF/CSV sections.
    #[serde(default)]
    pub holes: Vec<Vec<[f64; 2]>>,
}

impl ProfileSpec {
    fn dimensioned(profile_type: ProfileType, width: f64, height: f64) -> Self {
        Self {
            profile_type,
            width,
            height,
            wall_thickness: None,
            flange_thickness: 0.0,
            web_thickness: 0.0,
            outline: Vec::new(),
            holes: Vec::new(),
        }
    }

    /// Solid rectangular bar.
    pub fn rectangular(width: f64, height: f64) -> Self {
        Self::dimensioned(ProfileType::Rectangular, width, height)
    }

    /// Rectangular hollow section.
    pub fn rectangular_tube(width: f64, height: f64, wall: f64) -> Self {
        Self {
            wall_thickness: Some(wall),
            ..Self::rectangular(width, height)
        }
    }

    /// Solid round bar.
    pub fn circular(diameter: f64) -> Self {
        Self::dimensioned(ProfileType::Circular, diameter, diameter)
    }

    /// Round tube.
    pub fn circular_tube(diameter: f64, wall: f64) -> Self {
        Self {
            wall_thickness: Some(wall),
            ..Self::circular(diameter)
        }
    }

    /// H / I beam: two flanges across the width joined by a web.
    pub fn h_beam(width: f64, height: f64, flange: f64, web: f64) -> Self {
        Self {
            flange_thickness: flange,
            web_thickness: web,
            ..Self::dimensioned(ProfileType::H, width, height)
        }
    }

    /// Equal or unequal angle with legs of thickness `leg`.
    pub fn angle(width: f64, height: f64, leg: f64) -> Self {
        Self {
            web_thickness: leg,
            ..Self::dimensioned(ProfileType::L, width, height)
        }
    }

    /// Tee: flange across the top, web down the middle.
    pub fn tee(width: f64, height: f64, flange: f64, web: f64) -> Self {
        Self {
            flange_thickness: flange,
            web_thickness: web,
            ..Self::dimensioned(ProfileType::T, width, height)
        }
    }

    /// Channel: web on the left, flanges along top and bottom.
    pub fn channel(width: f64, height: f64, leg: f64) -> Self {
        Self {
            web_thickness: leg,
            ..Self::dimensioned(ProfileType::U, width, height)
        }
    }

    /// Outline-based section. Width and height are taken from the outline bounds.
    pub fn from_outline(
        profile_type: ProfileType,
        outline: Vec<[f64; 2]>,
        holes: Vec<Vec<[f64; 2]>>,
    ) -> Self {
        let (width, height) = outline_extent(&outline);
        Self {
            outline,
            holes,
            ..Self::dimensioned(profile_type, width, height)
        }
    }

    pub fn is_hollow(&self) -> bool {
        self.wall_thickness.is_some() || !self.holes.is_empty()
    }

    /// Width and height of the section bounding box.
    pub fn extent(&self) -> (f64, f64) {
        if self.profile_type.is_outline_based() && !self.outline.is_empty() {
            outline_extent(&self.outline)
        } else {
            (self.width, self.height)
        }
    }

    /// The same section with any hollow filled in.
    pub fn envelope(&self) -> Self {
        Self {
            wall_thickness: None,
            holes: Vec::new(),
            ..self.clone()
        }
    }
}

fn outline_extent(outline: &[[f64; 2]]) -> (f64, f64) {
    if outline.is_empty() {
        return (0.0, 0.0);
    }
    let mut min = [f64::INFINITY; 2];
    let mut max = [f64::NEG_INFINITY; 2];
    for p in outline {
        for i in 0..2 {
            min[i] = min[i].min(p[i]);
            max[i] = max[i].max(p[i]);
        }
    }
    (max[0] - min[0], max[1] - min[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_extent_comes_from_bounds() {
        let spec = ProfileSpec::from_outline(
            ProfileType::Csv,
            vec![[0.0, 0.0], [3.0, 0.0], [3.0, 1.0], [1.0, 2.0]],
            Vec::new(),
        );
        assert_eq!(spec.extent(), (3.0, 2.0));
        assert!(!spec.is_hollow());
    }

    #[test]
    fn envelope_fills_tube() {
        let tube = ProfileSpec::rectangular_tube(0.05, 0.04, 0.003);
        assert!(tube.is_hollow());
        let env = tube.envelope();
        assert!(!env.is_hollow());
        assert_eq!(env.extent(), (0.05, 0.04));
    }

    #[test]
    fn profile_spec_round_trips_through_json() {
        let spec = ProfileSpec::h_beam(0.1, 0.2, 0.01, 0.006);
        let json = serde_json::to_string(&spec).unwrap();
        let back: ProfileSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, back);
    }
}
