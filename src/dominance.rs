//! # Dominance Primitives
//!
//! Componentwise order comparisons between points in objective space. These
//! sit in the innermost loops of the enumerator, so all of them return as
//! soon as a counterexample coordinate is seen.

use crate::EnumError;

/// Checks whether `a` is componentwise less than or equal to `b`
///
/// # Errors
///
/// [`EnumError::ShapeMismatch`] if the lengths differ.
pub fn leq(a: &[isize], b: &[isize]) -> Result<bool, EnumError> {
    check_shape(a, b)?;
    Ok(leq_raw(a, b))
}

/// Checks whether `a` is strictly below `b`, i.e., `a <= b` componentwise
/// and `a != b`
///
/// # Errors
///
/// [`EnumError::ShapeMismatch`] if the lengths differ.
pub fn strict_lt(a: &[isize], b: &[isize]) -> Result<bool, EnumError> {
    check_shape(a, b)?;
    Ok(strict_lt_raw(a, b))
}

fn check_shape(a: &[isize], b: &[isize]) -> Result<(), EnumError> {
    if a.len() != b.len() {
        return Err(EnumError::ShapeMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(())
}

/// [`leq`] for points of guaranteed equal length
pub(crate) fn leq_raw(a: &[isize], b: &[isize]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).all(|(a, b)| a <= b)
}

/// [`strict_lt`] for points of guaranteed equal length
pub(crate) fn strict_lt_raw(a: &[isize], b: &[isize]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    let mut strict = false;
    for (a, b) in a.iter().zip(b) {
        if b < a {
            return false;
        }
        strict |= a != b;
    }
    strict
}
