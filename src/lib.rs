//! GRIT shuffle: randomized genomic interval sets.
//!
//! This library repositions query regions at random inside a permissible
//! genomic space (the universe), producing the null sets used by
//! co-localization enrichment tests.
//!
//! # Features
//!
//! - **Width-weighted placement**: universe spans are chosen in proportion
//!   to their width, so fragmented universes do not bias shuffles
//! - **Boundary aware**: placements never leave their chromosome
//! - **Per-chromosome mode**: regions keep their chromosome
//! - **Reproducible**: the caller owns the random generator
//!
//! # Example
//!
//! ```rust
//! use grit_shuffle::prelude::*;
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//!
//! let genome: Genome = [("chr1", 10_000u64), ("chr2", 5_000)].into_iter().collect();
//! let query = vec![Interval::new("chr1", 100, 200), Interval::new("chr2", 0, 50)];
//!
//! let mut rng = SmallRng::seed_from_u64(42);
//! let result = shuffle(&query, &genome, None, &ShuffleOptions::new(), &mut rng).unwrap();
//!
//! assert_eq!(result.intervals.len(), 2);
//! assert_eq!(result.intervals[0].len(), 100);
//! ```

pub mod bed;
pub mod commands;
pub mod error;
pub mod genome;
pub mod interval;
pub mod output;
pub mod parallel;

// Re-export commonly used types
pub use bed::{read_intervals, BedReader};
pub use commands::{shuffle, ShuffleCommand, ShuffleOptions, ShuffleStats, Shuffled};
pub use error::ShuffleError;
pub use genome::Genome;
pub use interval::{Interval, Strand};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bed::{read_intervals, BedReader};
    pub use crate::commands::{
        shuffle, shuffle_universe, ChromPartitioner, PlacementResolver, RegionValidator,
        ShuffleCommand, ShuffleOptions, ShuffleStats, Shuffled, Universe, UniverseBuilder,
        WeightedSampler,
    };
    pub use crate::error::ShuffleError;
    pub use crate::genome::Genome;
    pub use crate::interval::{Interval, Strand};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_basic_workflow() {
        use crate::bed::parse_intervals;
        use crate::commands::{shuffle, ShuffleOptions};
        use crate::genome::Genome;
        use rand::rngs::SmallRng;
        use rand::SeedableRng;

        let genome = Genome::from_reader("chr1\t5000\nchr2\t3000\n".as_bytes()).unwrap();
        let query = parse_intervals("chr1\t100\t200\nchr1\t150\t250\nchr2\t300\t400\n").unwrap();
        let universe = parse_intervals("chr1\t0\t1000\nchr1\t500\t2000\nchr2\t0\t800\n").unwrap();

        let options = ShuffleOptions::new().with_by_chrom(true);
        let mut rng = SmallRng::seed_from_u64(1);
        let result =
            shuffle(&query, &genome, Some(universe.as_slice()), &options, &mut rng).unwrap();

        assert_eq!(result.intervals.len(), 3);
        for iv in &result.intervals {
            assert_eq!(iv.len(), 100);
            match iv.chrom.as_str() {
                "chr1" => assert!(iv.end <= 2000),
                "chr2" => assert!(iv.end <= 800),
                other => panic!("unexpected chromosome {other}"),
            }
        }
    }
}
