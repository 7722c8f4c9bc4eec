//! Errors raised by the shuffle pipeline.

use crate::bed::BedError;
use thiserror::Error;

/// Fatal shuffle conditions. Any of these aborts the whole call; no
/// partial result is produced.
#[derive(Error, Debug)]
pub enum ShuffleError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("No universe region is wide enough to host any query region")]
    ExhaustedUniverse,

    #[error("Every query region is wider than the widest universe region")]
    NoEligibleRegions,

    #[error("Universe has no coverage on chromosome '{0}' but the query does")]
    MissingChromosomeCoverage(String),

    #[error("Chromosome '{0}' is missing from the genome file")]
    UnknownChromosome(String),

    #[error(transparent)]
    Bed(#[from] BedError),
}

pub type Result<T> = std::result::Result<T, ShuffleError>;
