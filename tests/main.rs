use std::cell::Cell;
use std::collections::HashSet;

use itertools::Itertools;
use rand::{rngs::StdRng, Rng, SeedableRng};

use lowtide::{
    dominance, enumerate, types::ParetoFront, EnumError, Enumerator, Fallible, FeasibilityOracle,
    Limits, Termination,
};

macro_rules! check_pf_shape {
    ($pf:expr, $t:expr) => {{
        let pps_set: HashSet<Vec<isize>> = $pf.into_iter().collect();
        let shape_set: HashSet<Vec<isize>> = $t.into_iter().collect();
        assert_eq!(pps_set, shape_set);
    }};
}

/// Wraps an infallible oracle and panics whenever a call's answer follows
/// from an earlier answer and monotonicity. Exact repetitions are a special
/// case of both checks.
struct NonRedundant<F> {
    inner: F,
    answered_true: Vec<Vec<isize>>,
    answered_false: Vec<Vec<isize>>,
}

impl<F> NonRedundant<F> {
    fn new(inner: F) -> Self {
        NonRedundant {
            inner,
            answered_true: vec![],
            answered_false: vec![],
        }
    }
}

impl<F: FnMut(&[isize]) -> bool> FeasibilityOracle for NonRedundant<F> {
    fn check(&mut self, point: &[isize]) -> anyhow::Result<bool> {
        for q in &self.answered_true {
            assert!(
                !dominance::leq(q, point).unwrap(),
                "called the oracle on {point:?} although feasibility follows from {q:?}"
            );
        }
        for q in &self.answered_false {
            assert!(
                !dominance::leq(point, q).unwrap(),
                "called the oracle on {point:?} although infeasibility follows from {q:?}"
            );
        }
        let feasible = (self.inner)(point);
        if feasible {
            self.answered_true.push(point.to_vec());
        } else {
            self.answered_false.push(point.to_vec());
        }
        Ok(feasible)
    }
}

fn assert_antichain(front: &ParetoFront) {
    for (i, a) in front.iter().enumerate() {
        for (j, b) in front.iter().enumerate() {
            if i != j {
                assert_ne!(a, b, "duplicate Pareto point {a:?}");
                assert!(
                    !dominance::strict_lt(a, b).unwrap(),
                    "{a:?} strictly below {b:?}"
                );
            }
        }
    }
}

fn minimal_elements(points: &[Vec<isize>]) -> HashSet<Vec<isize>> {
    points
        .iter()
        .filter(|point| {
            !points
                .iter()
                .any(|other| dominance::strict_lt(other, point).unwrap())
        })
        .cloned()
        .collect()
}

#[test]
fn simple() {
    let front = enumerate(
        |p: &[isize]| p[0] > 5 || (p[1] >= 3 && p[2] > 7),
        &[(0, 10), (0, 10), (0, 10)],
    )
    .unwrap();
    check_pf_shape!(front, vec![vec![6, 0, 0], vec![0, 3, 8]]);
}

#[test]
fn single_dim_call_count() {
    let calls = Cell::new(0);
    let front = enumerate(
        |p: &[isize]| {
            calls.set(calls.get() + 1);
            p[0] >= 7
        },
        &[(0, 15)],
    )
    .unwrap();
    check_pf_shape!(front, vec![vec![7]]);
    // one call on the top element plus a binary search over 16 values
    assert!(calls.get() <= 5, "{} oracle calls", calls.get());
}

#[test]
fn diagonal() {
    let front = enumerate(|p: &[isize]| p[0] + p[1] >= 0, &[(-3, 3), (-3, 3)]).unwrap();
    check_pf_shape!(
        front,
        vec![
            vec![-3, 3],
            vec![-2, 2],
            vec![-1, 1],
            vec![0, 0],
            vec![1, -1],
            vec![2, -2],
            vec![3, -3],
        ]
    );
}

#[test]
fn binary_hypercube() {
    let front = enumerate(
        |p: &[isize]| p.iter().sum::<isize>() >= 2,
        &[(0, 1), (0, 1), (0, 1), (0, 1)],
    )
    .unwrap();
    assert_eq!(front.len(), 6);
    for point in &front {
        assert_eq!(point.iter().sum::<isize>(), 2);
        assert!(point.iter().all(|&c| c == 0 || c == 1));
    }
    assert_antichain(&front);
}

#[test]
fn constant_true() {
    let front = enumerate(|_: &[isize]| true, &[(-5, 5), (3, 8), (0, 0)]).unwrap();
    check_pf_shape!(front, vec![vec![-5, 3, 0]]);
}

#[test]
fn constant_false() {
    let front = enumerate(|_: &[isize]| false, &[(-5, 5), (3, 8), (0, 0)]).unwrap();
    assert!(front.is_empty());
}

#[test]
fn zero_dims() {
    let front = enumerate(|_: &[isize]| true, &[]).unwrap();
    check_pf_shape!(front, vec![Vec::<isize>::new()]);
    let front = enumerate(|_: &[isize]| false, &[]).unwrap();
    assert!(front.is_empty());
}

#[test]
fn degenerate_coordinate() {
    let front = enumerate(|p: &[isize]| p[1] >= 2, &[(2, 2), (0, 4)]).unwrap();
    check_pf_shape!(front, vec![vec![2, 2]]);
}

#[test]
fn invalid_bounds() {
    let res = enumerate(|_: &[isize]| true, &[(0, 4), (3, 2)]);
    assert!(matches!(
        res,
        Err(EnumError::InvalidBounds {
            dim: 1,
            lo: 3,
            hi: 2
        })
    ));
}

#[test]
fn oracle_failure() {
    // an oracle built for two dimensions probed with three
    let res = enumerate(
        Fallible(|p: &[isize]| {
            anyhow::ensure!(p.len() == 2, "expected 2 coordinates, got {}", p.len());
            Ok(p[0] + p[1] >= 0)
        }),
        &[(0, 3), (0, 3), (0, 3)],
    );
    assert!(matches!(res, Err(EnumError::Oracle(_))));
}

#[test]
fn permutation_law() {
    let bounds = [(0, 10), (0, 10), (0, 10)];
    let front = enumerate(|p: &[isize]| p[0] > 5 || (p[1] >= 3 && p[2] > 7), &bounds).unwrap();
    // the same instance with dimensions 0 and 2 exchanged
    let permuted = enumerate(|p: &[isize]| p[2] > 5 || (p[1] >= 3 && p[0] > 7), &bounds).unwrap();
    let mapped: HashSet<Vec<isize>> = front
        .into_iter()
        .map(|p| vec![p[2], p[1], p[0]])
        .collect();
    check_pf_shape!(permuted, mapped);
}

#[test]
fn shrinkage_law() {
    // shrinking the feasible set: every point of the shrunk front dominates
    // some point of the original front
    let bounds = [(-3, 3), (-3, 3)];
    let original = enumerate(|p: &[isize]| p[0] + p[1] >= 0, &bounds).unwrap();
    let shrunk = enumerate(|p: &[isize]| p[0] + p[1] >= 2, &bounds).unwrap();
    for x in &shrunk {
        assert!(
            original.iter().any(|y| dominance::leq(y, x).unwrap()),
            "{x:?} not above any point of the original front"
        );
    }
}

#[test]
fn idempotence() {
    let bounds = [(0, 6), (0, 6), (0, 6)];
    let first = enumerate(|p: &[isize]| 2 * p[0] + p[1] + 3 * p[2] >= 7, &bounds).unwrap();
    let second = enumerate(|p: &[isize]| 2 * p[0] + p[1] + 3 * p[2] >= 7, &bounds).unwrap();
    let first: HashSet<Vec<isize>> = first.into_iter().collect();
    check_pf_shape!(second, first);
}

#[test]
fn limits_and_resume() {
    let bounds = [(0, 10), (0, 10), (0, 10)];
    let oracle = |p: &[isize]| p[0] > 5 || (p[1] >= 3 && p[2] > 7);

    let mut reference = Enumerator::new(NonRedundant::new(oracle), &bounds).unwrap();
    reference.solve(Limits::none()).unwrap();
    let unlimited_calls = reference.stats().n_oracle_calls;

    let mut limited = Enumerator::new(NonRedundant::new(oracle), &bounds).unwrap();
    let res = limited.solve(Limits {
        pps: Some(1),
        ..Limits::none()
    });
    assert!(matches!(res, Err(Termination::PPLimit)));
    assert_eq!(limited.stats().n_pareto_points, 1);

    // resuming must issue exactly the calls the uninterrupted run issues;
    // the instrumented oracle additionally rejects any repetition
    limited.solve(Limits::none()).unwrap();
    assert_eq!(limited.stats().n_oracle_calls, unlimited_calls);
    check_pf_shape!(
        limited.into_pareto_front(),
        vec![vec![6, 0, 0], vec![0, 3, 8]]
    );
}

#[test]
fn candidate_limit() {
    let res = Enumerator::new(|_: &[isize]| true, &[(0, 3), (0, 3)])
        .unwrap()
        .solve(Limits {
            candidates: Some(0),
            ..Limits::none()
        });
    assert!(matches!(res, Err(Termination::CandidatesLimit)));
}

#[test]
fn random_antichains() {
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let n_dims = rng.gen_range(3..=6);
        let n_points = rng.gen_range(1..=10);
        let bounds: Vec<(isize, isize)> = (0..n_dims)
            .map(|_| {
                let lo: isize = rng.gen_range(-10..10);
                (lo, lo + rng.gen_range(1..=20))
            })
            .collect();
        let generators: Vec<Vec<isize>> = (0..n_points)
            .map(|_| {
                bounds
                    .iter()
                    .map(|&(lo, hi)| rng.gen_range(lo..hi))
                    .collect()
            })
            .collect();

        let gens = generators.clone();
        let oracle = NonRedundant::new(move |point: &[isize]| {
            gens.iter().any(|a| dominance::leq(a, point).unwrap())
        });
        let front = enumerate(oracle, &bounds).unwrap();
        assert_antichain(&front);
        check_pf_shape!(front, minimal_elements(&generators));
    }
}

#[test]
fn brute_force_small() {
    // random monotone oracles from nonnegative weighted sums, checked
    // against an exhaustive scan of the domain
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let bounds = [(-2, 4), (-2, 4), (-2, 4)];
        let weights: Vec<isize> = (0..3).map(|_| rng.gen_range(0..=3)).collect();
        let threshold: isize = rng.gen_range(-5..15);
        let oracle = |p: &[isize]| {
            p.iter()
                .zip(&weights)
                .map(|(c, w)| c * w)
                .sum::<isize>()
                >= threshold
        };

        let feasible: Vec<Vec<isize>> = bounds
            .iter()
            .map(|&(lo, hi)| lo..=hi)
            .multi_cartesian_product()
            .filter(|p| oracle(p))
            .collect();
        let expected: HashSet<Vec<isize>> = minimal_elements(&feasible);

        let front = enumerate(NonRedundant::new(oracle), &bounds).unwrap();
        assert_antichain(&front);
        check_pf_shape!(front, expected);
    }
}
