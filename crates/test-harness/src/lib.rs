//! Test harness for frame joint development.
//!
//! Provides programmatic tools for scripting multi-step frame workflows,
//! checking results at every step, and printing diagnostic reports.
//!
//! # Key Components
//!
//! - [`FrameBuilder`]: Fluent API for building and joining frames
//! - [`flaky`]: Fault-injecting kernel wrapper
//! - [`report`]: Structured text frame descriptions
//! - [`helpers`]: Error type, profile shortcuts, geometry math
//! - [`assertions`]: Assertion helpers with diagnostics

pub mod assertions;
pub mod flaky;
pub mod helpers;
pub mod report;
pub mod workflow;

pub use flaky::{FaultOp, FaultSwitch, FlakyKernel};
pub use helpers::HarnessError;
pub use report::FrameReport;
pub use workflow::FrameBuilder;
