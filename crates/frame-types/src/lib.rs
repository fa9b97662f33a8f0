pub mod joint;
pub mod profile;
pub mod segment;

pub use joint::*;
pub use profile::*;
pub use segment::*;
