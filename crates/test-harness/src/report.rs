//! Structured text reports of a frame, for reading in failing test output.

use std::fmt;

use crate::helpers::{member_volume, HarnessError};
use crate::workflow::FrameBuilder;

/// A frame report: members, passes, kernel state.
pub struct FrameReport {
    pub members: Vec<MemberEntry>,
    pub passes: Vec<PassEntry>,
    pub live_solids: usize,
}

/// One member's line.
pub struct MemberEntry {
    pub name: String,
    pub profile: String,
    pub axis_length: f64,
    pub volume: f64,
    pub generation: u64,
    pub split: bool,
}

/// One pass summary with its skip reasons.
pub struct PassEntry {
    pub summary: String,
    pub skipped: Vec<(String, String)>,
}

impl FrameReport {
    /// Build a report from the current builder state.
    pub fn from_builder(m: &FrameBuilder) -> Result<Self, HarnessError> {
        let mut members = Vec::new();
        for (id, member) in m.store().iter() {
            let (w, h) = member.profile_extent();
            members.push(MemberEntry {
                name: m.name_of(id).unwrap_or(member.name.as_str()).to_string(),
                profile: format!("{:?} {:.3} x {:.3}", member.profile().profile_type, w, h),
                axis_length: member.axis().length(),
                volume: member_volume(m.kernel(), member)?,
                generation: member.generation(),
                split: member.body().is_split(),
            });
        }
        let passes = m
            .reports()
            .iter()
            .map(|r| PassEntry {
                summary: r.to_string(),
                skipped: r
                    .skipped
                    .iter()
                    .map(|s| {
                        let names: Vec<&str> =
                            s.members.iter().map(|id| m.name_of(*id).unwrap_or("?")).collect();
                        (names.join(" + "), s.reason.clone())
                    })
                    .collect(),
            })
            .collect();
        Ok(Self {
            members,
            passes,
            live_solids: m.live_solids(),
        })
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Frame Report ===\n\n");

        out.push_str(&format!("Members ({}):\n", self.members.len()));
        for (i, e) in self.members.iter().enumerate() {
            let split = if e.split { " [SPLIT]" } else { "" };
            out.push_str(&format!(
                "  [{}] \"{}\" {}{}\n      axis {:.4} | volume {:.6e} | generation {}\n",
                i, e.name, e.profile, split, e.axis_length, e.volume, e.generation,
            ));
        }

        out.push_str(&format!("\nPasses ({}):\n", self.passes.len()));
        for p in &self.passes {
            out.push_str(&format!("  {}\n", p.summary));
            for (members, reason) in &p.skipped {
                out.push_str(&format!("      skipped {}: {}\n", members, reason));
            }
        }

        let status = if self.live_solids == self.members.len() {
            "OK"
        } else {
            "LEAK"
        };
        out.push_str(&format!(
            "\nKernel: {} live solids for {} members ({})\n",
            self.live_solids,
            self.members.len(),
            status
        ));
        out
    }
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
