pub mod frame;
pub mod section;
pub mod sweeper;
pub mod types;

pub use frame::{usable_up, SectionFrame};
pub use section::convex_pieces;
pub use sweeper::{ProfileExtrusionService, SectionSweeper};
pub use types::*;
