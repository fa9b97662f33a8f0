pub mod cell;
pub mod cell_kernel;
pub mod primitives;
#[cfg(feature = "truck")]
pub mod tessellation;
pub mod traits;
#[cfg(feature = "truck")]
pub mod truck_kernel;
pub mod types;

pub use cell::CellTolerance;
pub use cell_kernel::CellKernel;
pub use traits::*;
#[cfg(feature = "truck")]
pub use truck_kernel::TruckKernel;
pub use types::*;
