use serde::{Deserialize, Serialize};

/// Joint geometry applied at a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JointType {
    /// Thin flush trim at the axis intersection; no miter angle.
    None,
    /// Symmetric bevel along the bisector plane.
    Miter,
    /// First member butts against the second, which runs through.
    Straight,
    /// Second member butts against the first, which runs through.
    Straight2,
    /// Branch notched against a continuous member.
    T,
    /// Single member trimmed against a user-picked planar face.
    Trim,
}

impl std::fmt::Display for JointType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            JointType::None => "none",
            JointType::Miter => "miter",
            JointType::Straight => "straight",
            JointType::Straight2 => "straight2",
            JointType::T => "t",
            JointType::Trim => "trim",
        };
        f.write_str(name)
    }
}
