//! Rich assertion helpers with diagnostic output.
//!
//! Every failure names the context, the expected value and the actual value.

use carcass_engine::ErrorKind;
use carcass_types::{Axis, Dimensions, Piece, PlacementStrategy, Position, Space};

use crate::helpers::{format_dimensions, max_dimension_delta, HarnessError};
use crate::oracle::OracleVerdict;

/// Assert two boxes match on every axis within `tol`.
pub fn assert_dims_eq(
    actual: &Dimensions,
    expected: &Dimensions,
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let delta = max_dimension_delta(actual, expected);
    if delta <= tol {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] expected {}, got {} (max delta {:.6}, tol={})",
                ctx,
                format_dimensions(expected),
                format_dimensions(actual),
                delta,
                tol,
            ),
        })
    }
}

/// Assert two centers match on every axis within `tol`.
pub fn assert_position_eq(
    actual: &Position,
    expected: &Position,
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    for axis in Axis::ALL {
        let (a, e) = (actual.along(axis), expected.along(axis));
        if (a - e).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] position {:?}: expected {:.3}, got {:.3} (tol={})",
                    ctx, axis, e, a, tol,
                ),
            });
        }
    }
    Ok(())
}

/// Assert a space is an active leaf.
pub fn assert_leaf(space: &Space, ctx: &str) -> Result<(), HarnessError> {
    if space.is_leaf() && space.is_active {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] '{}' is not an active leaf ({} children, is_active={})",
                ctx,
                space.name,
                space.children().len(),
                space.is_active,
            ),
        })
    }
}

/// Assert how the engine placed a piece.
pub fn assert_strategy(
    piece: &Piece,
    expected: PlacementStrategy,
    ctx: &str,
) -> Result<(), HarnessError> {
    let actual = piece.placement.map(|p| p.strategy);
    if actual == Some(expected) {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] '{}': expected strategy {:?}, got {:?}",
                ctx, piece.name, expected, actual,
            ),
        })
    }
}

/// Assert an operation was rejected by the engine with `kind`.
pub fn assert_rejected<T: std::fmt::Debug>(
    result: &Result<T, HarnessError>,
    kind: ErrorKind,
    ctx: &str,
) -> Result<(), HarnessError> {
    match result {
        Err(HarnessError::Rejected { kind: actual, .. }) if *actual == kind => Ok(()),
        Err(HarnessError::Rejected { kind: actual, message }) => {
            Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] expected {:?} rejection, got {:?}: {}",
                    ctx, kind, actual, message,
                ),
            })
        }
        other => Err(HarnessError::AssertionFailed {
            detail: format!("[{}] expected {:?} rejection, got {:?}", ctx, kind, other),
        }),
    }
}

/// Assert every verdict passed, reporting the first that did not.
pub fn assert_all_pass(verdicts: &[OracleVerdict], ctx: &str) -> Result<(), HarnessError> {
    match verdicts.iter().find(|v| !v.passed) {
        None => Ok(()),
        Some(v) => Err(HarnessError::OracleFailure {
            oracle: v.oracle_name.clone(),
            detail: format!("[{}] {}", ctx, v.detail),
        }),
    }
}
