//! # The Enumeration Driver
//!
//! Walks the objective space from the top corner downward. A worklist of
//! upper witnesses (the co-Pareto cover) dominates every undiscovered Pareto
//! point at all times; the front element of the worklist is the next
//! candidate. Feasible candidates are reduced to a Pareto point by
//! coordinate-wise binary search, after which the cover is refined around the
//! new point and re-cleaned. Negative oracle answers feed a buffer of maximal
//! infeasible witnesses consulted before every query, which is what makes the
//! oracle-call sequence free of redundant calls.

use std::collections::VecDeque;

use crate::{
    antichain::{self, NegativeBuffer},
    dominance,
    options::Limits,
    types::{ParetoFront, Point},
    EnumError, FeasibilityOracle, Phase, Stats, Termination, WriteEnumLog,
};

/// The Pareto front enumerator
///
/// Holds the oracle, the discovered front, and the search state between
/// calls to [`Enumerator::solve`]. A run that terminated early because of a
/// [`Limits`] bound can be resumed by calling [`Enumerator::solve`] again
/// with laxer limits; the continuation issues exactly the oracle calls the
/// uninterrupted run would have issued.
pub struct Enumerator<O> {
    /// The feasibility oracle
    oracle: O,
    /// The lower and upper bound of every dimension
    bounds: Vec<(isize, isize)>,
    /// The Pareto front discovered so far
    pareto_front: ParetoFront,
    /// The co-Pareto cover: an antichain of upper witnesses dominating every
    /// undiscovered Pareto point; the front element is the next candidate
    cover: VecDeque<Point>,
    /// The maximal points known to be infeasible
    neg_buffer: NegativeBuffer,
    /// Running statistics
    stats: Stats,
    /// Limits for the current run
    lims: Limits,
    /// Logger to log with
    logger: Option<Box<dyn WriteEnumLog>>,
}

impl<O> Enumerator<O> {
    /// Gets the Pareto front discovered so far
    pub fn pareto_front(&self) -> ParetoFront {
        self.pareto_front.clone()
    }

    /// Consumes the enumerator, returning the Pareto front discovered so far
    pub fn into_pareto_front(self) -> ParetoFront {
        self.pareto_front
    }

    /// Gets tracked statistics from the enumerator
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Gets the domain bounds the enumerator was created with
    pub fn bounds(&self) -> &[(isize, isize)] {
        &self.bounds
    }

    /// Attaches a logger to the enumerator
    pub fn attach_logger<L: WriteEnumLog + 'static>(&mut self, logger: L) {
        self.logger = Some(Box::new(logger));
    }

    /// Detaches the logger from the enumerator
    pub fn detach_logger(&mut self) -> Option<Box<dyn WriteEnumLog>> {
        self.logger.take()
    }
}

impl<O> Enumerator<O>
where
    O: FeasibilityOracle,
{
    /// Initializes an enumerator over the domain given by `bounds`, both
    /// ends inclusive in every dimension
    ///
    /// The cover is seeded with the top corner of the domain, which
    /// dominates every feasible point. An empty `bounds` slice describes the
    /// singleton zero-dimensional domain.
    ///
    /// # Errors
    ///
    /// [`EnumError::InvalidBounds`] if a lower bound exceeds its upper bound.
    pub fn new(oracle: O, bounds: &[(isize, isize)]) -> Result<Self, EnumError> {
        for (dim, &(lo, hi)) in bounds.iter().enumerate() {
            if lo > hi {
                return Err(EnumError::InvalidBounds { dim, lo, hi });
            }
        }
        let top: Point = bounds.iter().map(|&(_, hi)| hi).collect();
        Ok(Enumerator {
            oracle,
            bounds: bounds.to_vec(),
            pareto_front: ParetoFront::default(),
            cover: VecDeque::from(vec![top]),
            neg_buffer: NegativeBuffer::default(),
            stats: Stats {
                n_dims: bounds.len(),
                ..Stats::default()
            },
            lims: Limits::none(),
            logger: None,
        })
    }

    /// Enumerates Pareto points under the given limits. If not fully
    /// enumerated, errors an early termination reason.
    pub fn solve(&mut self, limits: Limits) -> Result<(), Termination> {
        self.stats.n_solve_calls += 1;
        self.lims = limits;
        self.alg_main()
    }

    /// The enumeration main loop
    fn alg_main(&mut self) -> Result<(), Termination> {
        while !self.cover.is_empty() {
            self.check_limits()?;
            self.stats.n_candidates += 1;
            if let Some(logger) = &mut self.logger {
                logger.log_candidate(&self.cover[0], Phase::OuterLoop)?;
            }
            if self.neg_buffer.contains(&self.cover[0]) {
                // known infeasible, the oracle is never touched
                self.stats.n_deduced += 1;
                self.cover.pop_front();
                continue;
            }
            let candidate = self.cover[0].clone();
            if self.oracle_call(&candidate, Phase::OuterLoop)? {
                let point = self.descend(candidate)?;
                if let Some(logger) = &mut self.logger {
                    logger.log_pareto_point(&point)?;
                }
                self.refine_cover(&point);
                self.pareto_front.push(point);
                self.stats.n_pareto_points += 1;
            } else {
                self.neg_buffer.add(candidate);
                self.cover.pop_front();
            }
        }
        Ok(())
    }

    /// Localizes a Pareto point below the feasible witness `x`
    ///
    /// Pushes each coordinate in turn down to its minimum feasible value by
    /// binary search over `[lo, x[dim] + 1)`, holding the other coordinates
    /// fixed. Fresh negative answers go to the buffer; midpoints the buffer
    /// already subsumes take the infeasible branch without reaching the
    /// oracle. The result is minimal in every coordinate, hence on the front.
    fn descend(&mut self, mut x: Point) -> Result<Point, Termination> {
        for dim in 0..self.bounds.len() {
            let mut min = self.bounds[dim].0;
            let mut max = x[dim] + 1;
            while max - min > 1 {
                let mid = min + (max - min - 1) / 2;
                x[dim] = mid;
                if self.neg_buffer.contains(&x) {
                    self.stats.n_deduced += 1;
                    min = mid + 1;
                } else if self.oracle_call(&x, Phase::Descent)? {
                    max = mid + 1;
                } else {
                    self.neg_buffer.add(x.clone());
                    min = mid + 1;
                }
            }
            x[dim] = min;
        }
        Ok(x)
    }

    /// Refines the cover after the discovery of the Pareto point `x`
    ///
    /// Cover elements not above `x` still cover regions disjoint from `x`'s
    /// upward closure and are kept. An element `s` with `x <= s` is replaced
    /// by one shrunk copy per dimension where `x` sits above its lower
    /// bound, with that coordinate set to `x[dim] - 1`; together the copies
    /// cover every point below `s` that is not above `x`. Cleaning restores
    /// the antichain invariant afterwards.
    fn refine_cover(&mut self, x: &[isize]) {
        let mut refined = Vec::with_capacity(self.cover.len() + self.bounds.len());
        for s in self.cover.drain(..) {
            if !dominance::leq_raw(x, &s) {
                refined.push(s);
                continue;
            }
            for (dim, &(lo, _)) in self.bounds.iter().enumerate() {
                if x[dim] > lo {
                    let mut shrunk = s.clone();
                    shrunk[dim] = x[dim] - 1;
                    refined.push(shrunk);
                }
            }
        }
        self.cover = antichain::clean(refined).into();
    }

    /// Queries the oracle on a point, tracking stats and logging
    fn oracle_call(&mut self, point: &[isize], phase: Phase) -> Result<bool, Termination> {
        let feasible = self.oracle.check(point).map_err(EnumError::Oracle)?;
        self.stats.n_oracle_calls += 1;
        if let Some(logger) = &mut self.logger {
            logger.log_oracle_call(point, feasible, phase)?;
        }
        Ok(feasible)
    }

    /// Checks the cumulative statistics against the limits of the current run
    fn check_limits(&self) -> Result<(), Termination> {
        if let Some(limit) = self.lims.pps {
            if self.stats.n_pareto_points >= limit {
                return Err(Termination::PPLimit);
            }
        }
        if let Some(limit) = self.lims.candidates {
            if self.stats.n_candidates >= limit {
                return Err(Termination::CandidatesLimit);
            }
        }
        if let Some(limit) = self.lims.oracle_calls {
            if self.stats.n_oracle_calls >= limit {
                return Err(Termination::OracleCallsLimit);
            }
        }
        Ok(())
    }
}
