//! # Options
//!
//! Resource limits for a run of the enumerator.

/// Limits for a call to [`Enumerator::solve`](crate::Enumerator::solve)
///
/// Limits are checked against the cumulative [`Stats`](crate::Stats) of the
/// enumerator, between cover candidates. A descent in progress always runs to
/// completion, so an oracle-call limit can be overshot by the cost of one
/// descent; in exchange, a limited run followed by a resumed one issues
/// exactly the same oracle calls as a single unlimited run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Limits {
    /// The maximum number of Pareto points to discover
    pub pps: Option<usize>,
    /// The maximum number of cover candidates to examine
    pub candidates: Option<usize>,
    /// The maximum number of calls to the feasibility oracle
    pub oracle_calls: Option<usize>,
}

impl Limits {
    /// No limits
    pub fn none() -> Limits {
        Limits {
            pps: None,
            candidates: None,
            oracle_calls: None,
        }
    }
}
