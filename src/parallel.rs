//! Chromosome grouping and parallel replicate utilities using Rayon.

use crate::interval::Interval;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

/// Group intervals by chromosome. Input order is preserved within each
/// group.
pub fn group_by_chromosome<'a, I>(intervals: I) -> FxHashMap<String, Vec<Interval>>
where
    I: IntoIterator<Item = &'a Interval>,
{
    let mut groups: FxHashMap<String, Vec<Interval>> = FxHashMap::default();

    for interval in intervals {
        groups
            .entry(interval.chrom.clone())
            .or_default()
            .push(interval.clone());
    }

    groups
}

/// Run `f` once per replicate in parallel, each with its own generator
/// seeded from `base_seed + index`. Results come back in replicate order,
/// so output does not depend on the thread count.
pub fn run_seeded_replicates<T, F>(count: usize, base_seed: u64, f: F) -> Vec<T>
where
    F: Fn(usize, &mut SmallRng) -> T + Sync + Send,
    T: Send,
{
    (0..count)
        .into_par_iter()
        .map(|index| {
            let mut rng = SmallRng::seed_from_u64(base_seed.wrapping_add(index as u64));
            f(index, &mut rng)
        })
        .collect()
}
