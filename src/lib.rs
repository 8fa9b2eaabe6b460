//! # Lowtide
//!
//! Complete Pareto front enumeration for monotone feasibility oracles over
//! bounded integer domains.
//!
//! The caller supplies a feasibility predicate over the points of a finite
//! product of integer intervals. The predicate must be _monotone_: whenever a
//! point is feasible, every componentwise-larger point is feasible as well.
//! [`enumerate`] returns the complete set of minimal feasible points (the
//! Pareto front of the predicate) and never queries a point whose answer
//! already follows from earlier answers and monotonicity. The search keeps an
//! antichain of upper witnesses covering every undiscovered front element and
//! localizes each new element by coordinate-wise binary search \[1\].
//!
//! Coordinates are `isize`. Upper bounds must lie below `isize::MAX` (the
//! descent searches the half-open interval `[lo, hi + 1)`) and interval
//! widths must not overflow `isize`; within that domain the midpoint form
//! `min + (max - min - 1) / 2` keeps all intermediate values in range.
//!
//! ## Example
//!
//! ```
//! let front = lowtide::enumerate(|p: &[isize]| p[0] + p[1] >= 0, &[(-3, 3), (-3, 3)])?;
//! assert_eq!(front.len(), 7);
//! # Ok::<(), lowtide::EnumError>(())
//! ```
//!
//! ## References
//!
//! - \[1\] Ruediger Ehlers: _Computing the Complete Pareto Front_, 2015.

use std::fmt;

pub mod antichain;
pub mod dominance;

pub mod options;
pub use options::Limits;

pub mod types;
use types::ParetoFront;

mod solver;
pub use crate::solver::Enumerator;

#[cfg(feature = "build-binary")]
pub mod cli;

/// The feasibility oracle driving an enumeration
///
/// The oracle classifies integer points as feasible or infeasible and must be
/// monotone: if `p` is feasible and `p <= q` componentwise, `q` must be
/// feasible too. It may carry external state, but repeated calls on the same
/// point must yield the same answer for the duration of one enumeration.
/// Non-monotone or inconsistent oracles make the result meaningless, though
/// they never cause a redundant query to be issued.
///
/// Any `FnMut(&[isize]) -> bool` closure is an oracle; fallible oracles go
/// through [`Fallible`].
pub trait FeasibilityOracle {
    /// Classifies a point as feasible or infeasible
    fn check(&mut self, point: &[isize]) -> anyhow::Result<bool>;
}

impl<F> FeasibilityOracle for F
where
    F: FnMut(&[isize]) -> bool,
{
    fn check(&mut self, point: &[isize]) -> anyhow::Result<bool> {
        Ok(self(point))
    }
}

/// Adapter making a fallible closure a [`FeasibilityOracle`]
///
/// Errors returned by the closure abort the enumeration and surface as
/// [`EnumError::Oracle`].
pub struct Fallible<F>(pub F);

impl<F> FeasibilityOracle for Fallible<F>
where
    F: FnMut(&[isize]) -> anyhow::Result<bool>,
{
    fn check(&mut self, point: &[isize]) -> anyhow::Result<bool> {
        (self.0)(point)
    }
}

/// Enumerates the complete Pareto front of a monotone feasibility oracle
///
/// `bounds` gives the inclusive lower and upper limit of every objective
/// dimension; the returned front contains exactly the feasible points of the
/// domain with no feasible point strictly below them, in unspecified order.
/// An empty `bounds` slice describes the singleton zero-dimensional domain.
///
/// This is the pure entry point; for limits, statistics, or logging, drive an
/// [`Enumerator`] directly.
///
/// # Errors
///
/// [`EnumError::InvalidBounds`] if a lower bound exceeds its upper bound, and
/// [`EnumError::Oracle`] carrying any error the oracle raised. In both cases
/// no partial result is returned.
pub fn enumerate<O>(oracle: O, bounds: &[(isize, isize)]) -> Result<ParetoFront, EnumError>
where
    O: FeasibilityOracle,
{
    let mut enumerator = Enumerator::new(oracle, bounds)?;
    match enumerator.solve(Limits::none()) {
        Ok(()) => Ok(enumerator.into_pareto_front()),
        Err(Termination::Error(err)) => Err(err),
        Err(term) => unreachable!("unlimited run without logger terminated early: {term}"),
    }
}

/// Errors aborting an enumeration
#[derive(Debug, thiserror::Error)]
pub enum EnumError {
    /// A dimension with a lower bound exceeding its upper bound
    #[error("invalid bounds in dimension {dim}: lower bound {lo} exceeds upper bound {hi}")]
    InvalidBounds {
        /// Index of the offending dimension
        dim: usize,
        /// The lower bound
        lo: isize,
        /// The upper bound
        hi: isize,
    },
    /// Points of different dimension counts were compared
    #[error("point has {found} coordinates, expected {expected}")]
    ShapeMismatch {
        /// The expected dimension count
        expected: usize,
        /// The dimension count found
        found: usize,
    },
    /// The oracle failed
    #[error("oracle failure: {0}")]
    Oracle(anyhow::Error),
}

/// Early termination reasons for [`Enumerator::solve`]
#[derive(Debug)]
pub enum Termination {
    /// Terminated because of maximum number of Pareto points reached
    PPLimit,
    /// Terminated because of maximum number of candidates reached
    CandidatesLimit,
    /// Terminated because of maximum number of oracle calls reached
    OracleCallsLimit,
    /// Termination because an attached logger failed
    LoggerError(LoggerError),
    /// A hard error aborted the enumeration
    Error(EnumError),
}

impl From<EnumError> for Termination {
    fn from(err: EnumError) -> Self {
        Termination::Error(err)
    }
}

impl From<LoggerError> for Termination {
    fn from(le: LoggerError) -> Self {
        Termination::LoggerError(le)
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::PPLimit => {
                write!(f, "Enumerator terminated early because of Pareto point limit")
            }
            Termination::CandidatesLimit => {
                write!(f, "Enumerator terminated early because of candidate limit")
            }
            Termination::OracleCallsLimit => {
                write!(f, "Enumerator terminated early because of oracle call limit")
            }
            Termination::LoggerError(le) => write!(f, "{}", le),
            Termination::Error(err) => write!(f, "{}", err),
        }
    }
}

/// Algorithm phases that the enumerator can be in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Outer loop over cover candidates
    OuterLoop,
    /// Coordinate-wise descent from a feasible witness
    Descent,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::OuterLoop => write!(f, "outer-loop"),
            Phase::Descent => write!(f, "descent"),
        }
    }
}

/// Statistics of the enumerator
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Stats {
    /// The number of calls to [`Enumerator::solve`]
    pub n_solve_calls: usize,
    /// The number of Pareto points found
    pub n_pareto_points: usize,
    /// The number of cover candidates examined
    pub n_candidates: usize,
    /// The number of calls to the feasibility oracle
    pub n_oracle_calls: usize,
    /// The number of answers deduced from the negative buffer rather than the oracle
    pub n_deduced: usize,
    /// The number of dimensions of the objective space
    pub n_dims: usize,
}

/// A logger to attach to an enumerator
pub trait WriteEnumLog {
    /// Adds a cover candidate to the log
    fn log_candidate(&mut self, candidate: &[isize], phase: Phase) -> Result<(), LoggerError>;
    /// Adds an oracle call to the log
    fn log_oracle_call(
        &mut self,
        point: &[isize],
        feasible: bool,
        phase: Phase,
    ) -> Result<(), LoggerError>;
    /// Adds a discovered Pareto point to the log
    fn log_pareto_point(&mut self, point: &[isize]) -> Result<(), LoggerError>;
}

/// Error type for loggers
pub struct LoggerError {
    ierror: Box<dyn fmt::Display>,
}

impl LoggerError {
    /// Wraps any displayable error
    pub fn new<IE: fmt::Display + 'static>(ierror: IE) -> Self {
        LoggerError {
            ierror: Box::new(ierror),
        }
    }
}

impl fmt::Display for LoggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LoggerError: {}", self.ierror)
    }
}

impl fmt::Debug for LoggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LoggerError: {}", self.ierror)
    }
}
