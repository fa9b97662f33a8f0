//! Assertion helpers with diagnostic output.
//!
//! Every failure names the check, the expected and actual values, and the
//! tolerance, so a failing scenario can be read without a debugger.

use frame_kernel::GeometryKernel;
use joint_engine::PassReport;

use crate::helpers::{axis_value, HarnessError};
use crate::workflow::FrameBuilder;

fn fail(detail: String) -> Result<(), HarnessError> {
    Err(HarnessError::AssertionFailed { detail })
}

/// Assert a member's body volume.
pub fn assert_volume(
    m: &FrameBuilder,
    name: &str,
    expected: f64,
    tol: f64,
) -> Result<(), HarnessError> {
    let actual = m.volume(name)?;
    if (actual - expected).abs() > tol {
        return fail(format!(
            "[{}] volume: expected {:.9}, got {:.9} (tol={})",
            name, expected, actual, tol
        ));
    }
    Ok(())
}

/// Assert the world-space extent of a member along one axis (0 = X, 1 = Y, 2 = Z).
pub fn assert_world_extent(
    m: &FrameBuilder,
    name: &str,
    axis: usize,
    expected_min: f64,
    expected_max: f64,
    tol: f64,
) -> Result<(), HarnessError> {
    let bb = m.world_bounds(name)?;
    let (min, max) = (axis_value(&bb.min, axis), axis_value(&bb.max, axis));
    let label = ["x", "y", "z"].get(axis).copied().unwrap_or("?");
    if (min - expected_min).abs() > tol || (max - expected_max).abs() > tol {
        return fail(format!(
            "[{}] {} extent: expected [{:.6}, {:.6}], got [{:.6}, {:.6}] (tol={})",
            name, label, expected_min, expected_max, min, max, tol
        ));
    }
    Ok(())
}

/// Assert applied and skipped counts of a pass.
pub fn assert_pass_counts(
    report: &PassReport,
    applied: usize,
    skipped: usize,
) -> Result<(), HarnessError> {
    if report.applied_count() != applied || report.skipped_count() != skipped {
        let reasons: Vec<&str> = report.skipped.iter().map(|s| s.reason.as_str()).collect();
        return fail(format!(
            "expected {} applied, {} skipped; got \"{}\". Skip reasons: [{}]",
            applied,
            skipped,
            report,
            reasons.join("; ")
        ));
    }
    Ok(())
}

/// Assert the kernel holds exactly `expected` solids.
pub fn assert_live_solids(kernel: &dyn GeometryKernel, expected: usize) -> Result<(), HarnessError> {
    let actual = kernel.live_solids();
    if actual != expected {
        return fail(format!(
            "live solids: expected {}, got {} ({} leaked)",
            expected,
            actual,
            actual as i64 - expected as i64
        ));
    }
    Ok(())
}

/// Assert two members carry the same volume.
pub fn assert_same_volume(
    m: &FrameBuilder,
    a: &str,
    b: &str,
    tol: f64,
) -> Result<(), HarnessError> {
    let (va, vb) = (m.volume(a)?, m.volume(b)?);
    if (va - vb).abs() > tol {
        return fail(format!(
            "[{} vs {}] volumes differ: {:.9} vs {:.9} (tol={})",
            a, b, va, vb, tol
        ));
    }
    Ok(())
}
