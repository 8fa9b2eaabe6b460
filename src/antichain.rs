//! # Antichain Maintenance
//!
//! Both the co-Pareto cover and the negative-result buffer are antichains
//! over objective space. [`clean`] prunes a candidate cover down to its
//! maximal elements, [`NegativeBuffer`] keeps the maximal known-infeasible
//! points. Sizes stay small relative to the objective space, so flat vectors
//! with quadratic maintenance beat anything fancier here.

use crate::{dominance, types::Point};

/// Reduces a list of points to those not strictly below any other listed
/// point
///
/// Equal points are not strictly below each other, so duplicates survive a
/// pass. All points must have the same number of coordinates. Quadratic in
/// the input length.
pub fn clean(points: Vec<Point>) -> Vec<Point> {
    let keep: Vec<bool> = points
        .iter()
        .map(|point| {
            !points
                .iter()
                .any(|other| dominance::strict_lt_raw(point, other))
        })
        .collect();
    points
        .into_iter()
        .zip(keep)
        .filter_map(|(point, keep)| keep.then_some(point))
        .collect()
}

/// A buffer of negative oracle results
///
/// Only maximal infeasible points are stored: a point `p` is known infeasible
/// iff `p <= n` for some stored witness `n`, and installing a new witness
/// drops every stored point below it. Keeping maximal elements only loses no
/// deducible infeasibility while keeping [`NegativeBuffer::contains`] cheap.
#[derive(Debug, Clone, Default)]
pub struct NegativeBuffer {
    maximal: Vec<Point>,
}

impl NegativeBuffer {
    /// Checks whether the infeasibility of a point follows from a stored
    /// witness
    ///
    /// If this returns true, the oracle must not be asked about the point.
    pub fn contains(&self, point: &[isize]) -> bool {
        self.maximal
            .iter()
            .any(|witness| dominance::leq_raw(point, witness))
    }

    /// Installs a new infeasible witness, dropping the witnesses it subsumes
    pub fn add(&mut self, point: Point) {
        self.maximal
            .retain(|witness| !dominance::leq_raw(witness, &point));
        self.maximal.push(point);
    }

    /// Gets the number of stored witnesses
    pub fn len(&self) -> usize {
        self.maximal.len()
    }

    /// Checks if no negative results have been recorded
    pub fn is_empty(&self) -> bool {
        self.maximal.is_empty()
    }
}
