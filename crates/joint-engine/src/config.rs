//! Tunable lengths and tolerances for joint resolution.

use serde::{Deserialize, Serialize};

/// Engine configuration. Every field has a default, so partial JSON is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JointConfig {
    /// Endpoints closer than this are coincident; also the parallelism threshold.
    pub tolerance: f64,
    /// Floor for cutter loop half-size and extrusion length.
    pub min_cutter_extent: f64,
    /// Cutter reach as a multiple of the cut body's bounding diagonal.
    pub cutter_extent_factor: f64,
    /// Axis extension past each end when regenerating with extension.
    pub extension_margin: f64,
    /// Outward push of the flush cut used by the `None` joint.
    pub flush_cut_epsilon: f64,
    /// Gap applied to butt joints when the request carries none.
    pub default_gap: f64,
}

impl Default for JointConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            min_cutter_extent: 200.0,
            cutter_extent_factor: 2.0,
            extension_margin: 200.0,
            flush_cut_epsilon: 0.01,
            default_gap: 0.0,
        }
    }
}

impl JointConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Preset for models drawn in millimetres: looser coincidence, longer reach.
    pub fn millimetres() -> Self {
        Self {
            tolerance: 1e-3,
            min_cutter_extent: 20_000.0,
            extension_margin: 20_000.0,
            flush_cut_epsilon: 1.0,
            ..Self::default()
        }
    }

    /// Cutter half-size and extrusion length for a body with the given bounding diagonal.
    pub fn cutter_reach(&self, diagonal: f64) -> f64 {
        self.min_cutter_extent
            .max(self.cutter_extent_factor * diagonal)
    }
}
