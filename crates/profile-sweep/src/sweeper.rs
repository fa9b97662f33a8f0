use frame_kernel::{GeometryKernel, SolidHandle};
use tracing::debug;

use crate::frame::SectionFrame;
use crate::section::convex_pieces;
use crate::types::{SweepError, SweepRequest};

/// Rebuilds member bodies from their construction axis and profile metadata.
pub trait ProfileExtrusionService {
    /// Sweep the request's section along its segment. The result is owned by the caller.
    fn regenerate_member_body(
        &self,
        kernel: &mut dyn GeometryKernel,
        request: &SweepRequest,
    ) -> Result<SolidHandle, SweepError>;
}

/// Reference sweeper: extrudes each convex piece of the section and unions them.
#[derive(Debug, Clone)]
pub struct SectionSweeper {
    /// Polygon resolution for circular sections.
    pub circle_segments: usize,
}

impl SectionSweeper {
    pub fn new(circle_segments: usize) -> Self {
        Self {
            circle_segments: circle_segments.max(3),
        }
    }
}

impl Default for SectionSweeper {
    fn default() -> Self {
        Self::new(32)
    }
}

impl ProfileExtrusionService for SectionSweeper {
    fn regenerate_member_body(
        &self,
        kernel: &mut dyn GeometryKernel,
        request: &SweepRequest,
    ) -> Result<SolidHandle, SweepError> {
        let frame = SectionFrame::new(
            &request.segment,
            &request.local_up,
            request.rotation,
            &request.offset,
        )?;
        let length = request.segment.length();
        let pieces = convex_pieces(&request.profile, self.circle_segments)?;

        let mut body: Option<SolidHandle> = None;
        for piece in &pieces {
            let outline: Vec<_> = piece.iter().map(|p| frame.point(p[0], p[1])).collect();
            let solid = match kernel.extrude_loop(&outline, &frame.axis, length) {
                Ok(s) => s,
                Err(e) => {
                    if let Some(b) = body {
                        kernel.release(b);
                    }
                    return Err(e.into());
                }
            };
            body = Some(match body {
                None => solid,
                Some(acc) => {
                    let merged = kernel.boolean_union(&acc, &solid);
                    kernel.release(acc);
                    kernel.release(solid);
                    merged?
                }
            });
        }

        debug!(
            profile = ?request.profile.profile_type,
            pieces = pieces.len(),
            length,
            "swept member body"
        );
        body.ok_or_else(|| SweepError::InvalidSection {
            reason: "section has no pieces".to_string(),
        })
    }
}
