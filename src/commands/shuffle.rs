//! Shuffle command implementation.
//!
//! Repositions query regions at random inside a universe, producing one
//! draw of a null distribution for co-localization enrichment tests.
//!
//! Pipeline, per chromosome when `by_chrom` is set and once otherwise:
//! 1. Filter query/universe pairs that cannot fit ([`RegionValidator`])
//! 2. Pick a hosting span per region, weighted by span width ([`WeightedSampler`])
//! 3. Draw the offset inside the host and clamp to the chromosome ([`PlacementResolver`])
//!
//! All host indices are drawn before any placement offsets, so a fixed
//! seed reproduces the same output.

use crate::bed::read_intervals;
use crate::commands::partition::ChromPartitioner;
use crate::commands::placement::PlacementResolver;
use crate::commands::sampler::WeightedSampler;
use crate::commands::universe::{Universe, UniverseBuilder};
use crate::commands::validate::{check_included, RegionValidator};
use crate::error::{Result, ShuffleError};
use crate::genome::Genome;
use crate::interval::Interval;
use crate::output::{BedLayout, BedWriter};
use crate::parallel::run_seeded_replicates;
use log::debug;
use rand::Rng;
use std::io::Write;
use std::path::Path;

/// Placement options shared by every shuffle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShuffleOptions {
    /// Fraction of each region's width that must fall inside the universe.
    pub included: f64,
    /// Shuffle each chromosome independently.
    pub by_chrom: bool,
}

impl Default for ShuffleOptions {
    fn default() -> Self {
        Self {
            included: 1.0,
            by_chrom: false,
        }
    }
}

impl ShuffleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the included fraction.
    pub fn with_included(mut self, included: f64) -> Self {
        self.included = included;
        self
    }

    /// Set per-chromosome mode.
    pub fn with_by_chrom(mut self, by_chrom: bool) -> Self {
        self.by_chrom = by_chrom;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_included(self.included)
    }
}

/// Diagnostics from one shuffle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ShuffleStats {
    /// Query regions received
    pub queries: usize,
    /// Regions placed in the output
    pub placed: usize,
    /// Query regions removed for being wider than every universe span
    pub queries_dropped: usize,
    /// Universe spans removed for being narrower than every query region
    pub universe_dropped: usize,
    /// Placements cut short at a chromosome boundary
    pub shortened: usize,
    /// Pipeline runs (chromosomes in per-chromosome mode, otherwise 1)
    pub partitions: usize,
}

impl ShuffleStats {
    /// Accumulate another run's counts.
    pub fn merge(&mut self, other: &ShuffleStats) {
        self.queries += other.queries;
        self.placed += other.placed;
        self.queries_dropped += other.queries_dropped;
        self.universe_dropped += other.universe_dropped;
        self.shortened += other.shortened;
        self.partitions += other.partitions;
    }
}

impl std::fmt::Display for ShuffleStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Queries: {}, Placed: {}, Dropped queries: {}, Dropped universe: {}, Shortened: {}, Partitions: {}",
            self.queries,
            self.placed,
            self.queries_dropped,
            self.universe_dropped,
            self.shortened,
            self.partitions
        )
    }
}

/// A shuffled interval set with its diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shuffled {
    pub intervals: Vec<Interval>,
    pub stats: ShuffleStats,
}

/// Shuffle `query` within `universe` (the whole genome when `None`).
///
/// The generator is used as-is; seed it before calling for reproducible
/// output.
pub fn shuffle<R: Rng + ?Sized>(
    query: &[Interval],
    sizes: &Genome,
    universe: Option<&[Interval]>,
    options: &ShuffleOptions,
    rng: &mut R,
) -> Result<Shuffled> {
    options.validate()?;
    let universe = UniverseBuilder::new().build(universe, sizes);
    shuffle_universe(query, sizes, &universe, options, rng)
}

/// Shuffle `query` within an already built universe.
pub fn shuffle_universe<R: Rng + ?Sized>(
    query: &[Interval],
    sizes: &Genome,
    universe: &Universe,
    options: &ShuffleOptions,
    rng: &mut R,
) -> Result<Shuffled> {
    options.validate()?;

    if options.by_chrom {
        ChromPartitioner::new(options.included)?.by_chromosome(query, sizes, universe, rng)
    } else {
        check_universe_chromosomes(universe, sizes)?;
        let (intervals, stats) =
            shuffle_partition(query, universe.intervals(), sizes, options.included, rng)?;
        Ok(Shuffled { intervals, stats })
    }
}

/// Every span of a shared universe can host a placement, so each needs a
/// chromosome length.
fn check_universe_chromosomes(universe: &Universe, sizes: &Genome) -> Result<()> {
    match universe
        .chromosomes()
        .into_iter()
        .find(|chrom| !sizes.has_chrom(chrom))
    {
        Some(chrom) => Err(ShuffleError::UnknownChromosome(chrom.to_string())),
        None => Ok(()),
    }
}

/// One validate → sample → place run over `query` and `universe`.
pub(crate) fn shuffle_partition<R: Rng + ?Sized>(
    query: &[Interval],
    universe: &[Interval],
    sizes: &Genome,
    included: f64,
    rng: &mut R,
) -> Result<(Vec<Interval>, ShuffleStats)> {
    let valid = RegionValidator::new(included)?.filter(query, universe)?;

    let sampler = WeightedSampler::new(&valid.universe)?;
    let hosts = sampler.sample(&valid.adjusted, rng)?;
    let draws: Vec<f64> = (0..hosts.len()).map(|_| rng.gen::<f64>()).collect();

    let resolver = PlacementResolver::new(included)?;
    let mut intervals = Vec::with_capacity(valid.query.len());
    let mut shortened = 0;
    for ((region, &host_idx), &u) in valid.query.iter().zip(&hosts).zip(&draws) {
        let host = &valid.universe[host_idx];
        let chrom_len = sizes
            .chrom_size(&host.chrom)
            .ok_or_else(|| ShuffleError::UnknownChromosome(host.chrom.clone()))?;
        let placement = resolver.resolve(region, host, chrom_len, u);
        if placement.shortened {
            shortened += 1;
        }
        intervals.push(placement.interval);
    }

    debug!(
        "placed {} of {} regions over {} universe spans",
        intervals.len(),
        query.len(),
        valid.universe.len()
    );

    let stats = ShuffleStats {
        queries: query.len(),
        placed: intervals.len(),
        queries_dropped: valid.queries_dropped,
        universe_dropped: valid.universe_dropped,
        shortened,
        partitions: 1,
    };
    Ok((intervals, stats))
}

/// Shuffle command configuration.
#[derive(Debug, Clone)]
pub struct ShuffleCommand {
    pub options: ShuffleOptions,
    /// Base seed; replicate `i` uses `seed + i`. Drawn from entropy when unset.
    pub seed: Option<u64>,
    /// Number of independent shuffles to produce
    pub replicates: usize,
}

impl Default for ShuffleCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ShuffleCommand {
    pub fn new() -> Self {
        Self {
            options: ShuffleOptions::default(),
            seed: None,
            replicates: 1,
        }
    }

    /// Set the included fraction.
    pub fn with_included(mut self, included: f64) -> Self {
        self.options.included = included;
        self
    }

    /// Set per-chromosome mode.
    pub fn with_by_chrom(mut self, by_chrom: bool) -> Self {
        self.options.by_chrom = by_chrom;
        self
    }

    /// Set the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of replicates.
    pub fn with_replicates(mut self, replicates: usize) -> Self {
        self.replicates = replicates;
        self
    }

    fn base_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::thread_rng().gen())
    }

    /// Produce `replicates` independent shuffles in parallel.
    ///
    /// The universe is built once and shared. Results are in replicate
    /// order and depend only on the seed, not on the thread count.
    pub fn replicates(
        &self,
        query: &[Interval],
        sizes: &Genome,
        universe: Option<&[Interval]>,
    ) -> Result<Vec<Shuffled>> {
        self.options.validate()?;
        if self.replicates == 0 {
            return Err(ShuffleError::InvalidParameter(
                "replicates must be at least 1".to_string(),
            ));
        }

        let universe = UniverseBuilder::new().build(universe, sizes);
        let seed = self.base_seed();
        debug!("shuffling {} replicates from seed {}", self.replicates, seed);

        run_seeded_replicates(self.replicates, seed, |_, rng| {
            shuffle_universe(query, sizes, &universe, &self.options, rng)
        })
        .into_iter()
        .collect()
    }

    /// Execute shuffle on BED files, writing every replicate to `output`.
    pub fn run<P: AsRef<Path>, W: Write>(
        &self,
        query: P,
        genome: &Genome,
        universe: Option<P>,
        output: &mut W,
    ) -> Result<ShuffleStats> {
        let query = read_intervals(query)?;
        let universe = universe.map(read_intervals).transpose()?;

        let results = self.replicates(&query, genome, universe.as_deref())?;

        let mut writer = BedWriter::new(output);
        let mut stats = ShuffleStats::default();
        if let [single] = results.as_slice() {
            let layout = BedLayout::for_intervals(&single.intervals);
            writer.write_all(&single.intervals, layout, None)?;
            stats.merge(&single.stats);
        } else {
            for (i, shuffled) in results.iter().enumerate() {
                let name = format!("shuffle_{}", i + 1);
                writer.write_all(&shuffled.intervals, BedLayout::Bed6, Some(&name))?;
                stats.merge(&shuffled.stats);
            }
        }
        writer.flush()?;

        Ok(stats)
    }
}
