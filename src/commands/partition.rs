//! Per-chromosome shuffling.
//!
//! Each chromosome's query regions are shuffled only within that
//! chromosome's part of the universe, so no region changes chromosome.
//! Chromosomes are visited in genome-file order and their results
//! concatenated, which keeps output reproducible under a fixed seed.

use crate::commands::shuffle::{shuffle_partition, Shuffled};
use crate::commands::universe::Universe;
use crate::commands::validate::check_included;
use crate::error::{Result, ShuffleError};
use crate::genome::Genome;
use crate::interval::Interval;
use crate::parallel::group_by_chromosome;
use log::debug;
use rand::Rng;

/// Runs the shuffle pipeline independently on every query chromosome.
#[derive(Debug, Clone, Copy)]
pub struct ChromPartitioner {
    included: f64,
}

impl ChromPartitioner {
    pub fn new(included: f64) -> Result<Self> {
        check_included(included)?;
        Ok(Self { included })
    }

    /// Shuffle `query` chromosome by chromosome.
    ///
    /// Fails with `MissingChromosomeCoverage` if the universe has no span on
    /// a query chromosome, and with `UnknownChromosome` if a covered query
    /// chromosome is not in `sizes`. Both checks run before any sampling.
    /// Chromosomes without query regions are skipped, whatever the
    /// universe holds for them.
    pub fn by_chromosome<R: Rng + ?Sized>(
        &self,
        query: &[Interval],
        sizes: &Genome,
        universe: &Universe,
        rng: &mut R,
    ) -> Result<Shuffled> {
        let query_groups = group_by_chromosome(query);
        let universe_groups = group_by_chromosome(universe.intervals());

        // Reported in query order
        if let Some(chrom) = query
            .iter()
            .map(|iv| iv.chrom.as_str())
            .find(|chrom| !universe_groups.contains_key(*chrom))
        {
            return Err(ShuffleError::MissingChromosomeCoverage(chrom.to_string()));
        }

        if let Some(chrom) = query
            .iter()
            .map(|iv| iv.chrom.as_str())
            .find(|chrom| !sizes.has_chrom(chrom))
        {
            return Err(ShuffleError::UnknownChromosome(chrom.to_string()));
        }

        let chroms: Vec<&String> = sizes
            .chromosomes()
            .filter(|chrom| query_groups.contains_key(chrom.as_str()))
            .collect();

        let mut result = Shuffled::default();
        for chrom in chroms {
            let chrom_query = &query_groups[chrom.as_str()];
            let chrom_universe = &universe_groups[chrom.as_str()];
            debug!(
                "{}: shuffling {} regions over {} universe spans",
                chrom,
                chrom_query.len(),
                chrom_universe.len()
            );

            let (intervals, stats) =
                shuffle_partition(chrom_query, chrom_universe, sizes, self.included, rng)?;
            result.intervals.extend(intervals);
            result.stats.merge(&stats);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::universe::UniverseBuilder;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn genome() -> Genome {
        [("chr2", 500u64), ("chr1", 1000), ("chr3", 300)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_regions_stay_on_their_chromosome() {
        let sizes = genome();
        let universe = UniverseBuilder::new().build(None, &sizes);
        let query = vec![
            Interval::new("chr1", 0, 100),
            Interval::new("chr2", 0, 50),
            Interval::new("chr1", 500, 520),
        ];
        let mut rng = SmallRng::seed_from_u64(8);

        let result = ChromPartitioner::new(1.0)
            .unwrap()
            .by_chromosome(&query, &sizes, &universe, &mut rng)
            .unwrap();

        // Genome order: chr2 first, then chr1 in query order
        let chroms: Vec<&str> = result.intervals.iter().map(|iv| iv.chrom.as_str()).collect();
        assert_eq!(chroms, vec!["chr2", "chr1", "chr1"]);
        let widths: Vec<u64> = result.intervals.iter().map(Interval::len).collect();
        assert_eq!(widths, vec![50, 100, 20]);
        assert_eq!(result.stats.partitions, 2);
        assert_eq!(result.stats.placed, 3);
    }

    #[test]
    fn test_missing_coverage() {
        let sizes = genome();
        let universe =
            UniverseBuilder::new().build(Some(&[Interval::new("chr1", 0, 1000)][..]), &sizes);
        let query = vec![Interval::new("chr1", 0, 10), Interval::new("chr3", 0, 10)];
        let mut rng = SmallRng::seed_from_u64(8);

        let err = ChromPartitioner::new(1.0)
            .unwrap()
            .by_chromosome(&query, &sizes, &universe, &mut rng)
            .unwrap_err();

        assert!(matches!(err, ShuffleError::MissingChromosomeCoverage(c) if c == "chr3"));
    }

    #[test]
    fn test_uncovered_chromosome_without_queries_is_fine() {
        let sizes = genome();
        let universe =
            UniverseBuilder::new().build(Some(&[Interval::new("chr1", 0, 1000)][..]), &sizes);
        let query = vec![Interval::new("chr1", 0, 10)];
        let mut rng = SmallRng::seed_from_u64(8);

        let result = ChromPartitioner::new(1.0)
            .unwrap()
            .by_chromosome(&query, &sizes, &universe, &mut rng)
            .unwrap();

        assert_eq!(result.intervals.len(), 1);
        assert_eq!(result.intervals[0].chrom, "chr1");
    }

    #[test]
    fn test_query_chromosome_outside_genome_lacks_coverage() {
        let sizes = genome();
        let universe = UniverseBuilder::new().build(None, &sizes);
        let query = vec![Interval::new("chr1", 0, 10), Interval::new("chrM", 0, 10)];
        let mut rng = SmallRng::seed_from_u64(8);

        let err = ChromPartitioner::new(1.0)
            .unwrap()
            .by_chromosome(&query, &sizes, &universe, &mut rng)
            .unwrap_err();

        assert!(matches!(err, ShuffleError::MissingChromosomeCoverage(c) if c == "chrM"));
    }

    #[test]
    fn test_covered_chromosome_without_size() {
        let sizes = genome();
        let universe = UniverseBuilder::new().build(
            Some(&[Interval::new("chr1", 0, 1000), Interval::new("chrM", 0, 100)][..]),
            &sizes,
        );
        let query = vec![Interval::new("chrM", 0, 10)];
        let mut rng = SmallRng::seed_from_u64(8);

        let err = ChromPartitioner::new(1.0)
            .unwrap()
            .by_chromosome(&query, &sizes, &universe, &mut rng)
            .unwrap_err();

        assert!(matches!(err, ShuffleError::UnknownChromosome(c) if c == "chrM"));
    }

    #[test]
    fn test_unqueried_universe_chromosome_without_size_is_skipped() {
        let sizes = genome();
        let universe = UniverseBuilder::new().build(
            Some(&[Interval::new("chr1", 0, 1000), Interval::new("chrUn", 0, 100)][..]),
            &sizes,
        );
        let query = vec![Interval::new("chr1", 0, 10)];
        let mut rng = SmallRng::seed_from_u64(8);

        let result = ChromPartitioner::new(1.0)
            .unwrap()
            .by_chromosome(&query, &sizes, &universe, &mut rng)
            .unwrap();

        assert_eq!(result.intervals.len(), 1);
        assert_eq!(result.intervals[0].chrom, "chr1");
    }

    #[test]
    fn test_partition_failure_aborts_call() {
        let sizes = genome();
        let universe = UniverseBuilder::new().build(
            Some(&[Interval::new("chr1", 0, 1000), Interval::new("chr2", 0, 10)][..]),
            &sizes,
        );
        let query = vec![Interval::new("chr1", 0, 10), Interval::new("chr2", 0, 100)];
        let mut rng = SmallRng::seed_from_u64(8);

        let err = ChromPartitioner::new(1.0)
            .unwrap()
            .by_chromosome(&query, &sizes, &universe, &mut rng)
            .unwrap_err();

        assert!(matches!(err, ShuffleError::ExhaustedUniverse));
    }

    #[test]
    fn test_empty_query() {
        let sizes = genome();
        let universe = UniverseBuilder::new().build(None, &sizes);
        let mut rng = SmallRng::seed_from_u64(8);

        let result = ChromPartitioner::new(1.0)
            .unwrap()
            .by_chromosome(&[], &sizes, &universe, &mut rng)
            .unwrap();

        assert!(result.intervals.is_empty());
    }
}
