//! Shuffle pipeline components.

pub mod partition;
pub mod placement;
pub mod sampler;
pub mod shuffle;
pub mod universe;
pub mod validate;

pub use partition::ChromPartitioner;
pub use placement::{Placement, PlacementResolver};
pub use sampler::WeightedSampler;
pub use shuffle::{
    shuffle, shuffle_universe, ShuffleCommand, ShuffleOptions, ShuffleStats, Shuffled,
};
pub use universe::{Universe, UniverseBuilder};
pub use validate::{adjusted_width, RegionValidator, ValidRegions};
