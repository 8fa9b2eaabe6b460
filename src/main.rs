use std::collections::HashSet;

use anyhow::{anyhow, bail, ensure};
use cpu_time::ProcessTime;
use lowtide::{
    cli::{Cli, HarnessSummary},
    dominance, Enumerator, Fallible, Limits,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn main() -> anyhow::Result<()> {
    let cli = Cli::init();
    cli.print_header()?;

    let seed = match cli.seed {
        Some(seed) => seed,
        None => rand::thread_rng().gen(),
    };
    cli.info(&format!("random seed: {}", seed))?;

    demonstration(&cli)?;

    cli.info(&format!("running {} randomized rounds", cli.rounds))?;
    let start = ProcessTime::now();
    let mut summary = HarnessSummary::default();
    for round in 0..cli.rounds {
        let round_seed = seed.wrapping_add(round as u64);
        if let Err(err) = random_round(round_seed, &mut summary) {
            cli.error(&format!("round with seed {} failed: {:#}", round_seed, err))?;
            std::process::exit(1);
        }
    }
    summary.n_rounds = cli.rounds;
    cli.print_stats(summary, start.elapsed())?;
    cli.info("all rounds passed")?;
    Ok(())
}

/// Enumerates a fixed three-dimensional instance with the CLI logger
/// attached, printing the discovered front
fn demonstration(cli: &Cli) -> anyhow::Result<()> {
    cli.info("enumerating the demonstration instance")?;
    let oracle = |p: &[isize]| p[0] > 5 || (p[1] >= 3 && p[2] > 7);
    let mut enumerator = Enumerator::new(oracle, &[(0, 10), (0, 10), (0, 10)])?;
    enumerator.attach_logger(cli.new_cli_logger());
    enumerator
        .solve(Limits::none())
        .map_err(|term| anyhow!("{}", term))?;
    cli.print_pareto_front(enumerator.pareto_front())?;
    let front = enumerator.into_pareto_front();
    ensure!(
        front.len() == 2 && front.contains(&[6, 0, 0]) && front.contains(&[0, 3, 8]),
        "demonstration instance produced a wrong front"
    );
    Ok(())
}

/// Runs one randomized round: builds an instance from a random generator
/// antichain, enumerates it through an instrumented oracle that rejects any
/// call whose answer follows from an earlier one, and compares the result
/// against the minimal generator points
fn random_round(seed: u64, summary: &mut HarnessSummary) -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let n_dims = rng.gen_range(5..=11);
    let n_points = rng.gen_range(1..=15);
    let bounds: Vec<(isize, isize)> = (0..n_dims)
        .map(|_| {
            let lo: isize = rng.gen_range(-50..50);
            (lo, lo + rng.gen_range(1..=100))
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
    let mut positive: Vec<Vec<isize>> = Vec::new();
    let mut negative: Vec<Vec<isize>> = Vec::new();
    let oracle = Fallible(move |point: &[isize]| {
        for q in &positive {
            if dominance::leq(q, point)? {
                bail!(
                    "redundant call: feasibility of {:?} follows from {:?}",
                    point,
                    q
                );
            }
        }
        for q in &negative {
            if dominance::leq(point, q)? {
                bail!(
                    "redundant call: infeasibility of {:?} follows from {:?}",
                    point,
                    q
                );
            }
        }
        let mut feasible = false;
        for a in &gens {
            if dominance::leq(a, point)? {
                feasible = true;
                break;
            }
        }
        if feasible {
            positive.push(point.to_vec());
        } else {
            negative.push(point.to_vec());
        }
        Ok(feasible)
    });

    let mut enumerator = Enumerator::new(oracle, &bounds)?;
    enumerator
        .solve(Limits::none())
        .map_err(|term| anyhow!("{}", term))?;
    let stats = enumerator.stats();
    summary.n_pareto_points += stats.n_pareto_points;
    summary.n_oracle_calls += stats.n_oracle_calls;
    summary.n_deduced += stats.n_deduced;

    let front: HashSet<Vec<isize>> = enumerator.into_pareto_front().into_iter().collect();
    let expected = minimal_elements(&generators)?;
    ensure!(
        front == expected,
        "enumerated front {:?} differs from the minimal generators {:?}",
        front,
        expected
    );
    Ok(())
}

/// Gets the generator points with no other generator strictly below them
fn minimal_elements(points: &[Vec<isize>]) -> anyhow::Result<HashSet<Vec<isize>>> {
    let mut minimal = HashSet::new();
    'outer: for point in points {
        for other in points {
            if dominance::strict_lt(other, point)? {
                continue 'outer;
            }
        }
        minimal.insert(point.clone());
    }
    Ok(minimal)
}
