//! Query/universe compatibility filtering.
//!
//! Removes universe spans narrower than every adjusted query width and
//! query regions whose full width exceeds every universe span. The surviving universe is
//! returned sorted by descending width, which the weighted sampler's
//! prefix search depends on.

use crate::error::{Result, ShuffleError};
use crate::interval::Interval;
use log::warn;

/// Width of `width` that must lie inside the hosting universe span.
#[inline]
pub fn adjusted_width(width: u64, included: f64) -> u64 {
    (width as f64 * included).round() as u64
}

/// Check that `included` is a fraction in `[0, 1]`.
pub fn check_included(included: f64) -> Result<()> {
    if (0.0..=1.0).contains(&included) {
        Ok(())
    } else {
        Err(ShuffleError::InvalidParameter(format!(
            "included must be between 0 and 1, got {}",
            included
        )))
    }
}

/// Output of [`RegionValidator::filter`].
#[derive(Debug, Clone, Default)]
pub struct ValidRegions {
    /// Surviving query regions, in input order.
    pub query: Vec<Interval>,
    /// Adjusted width of each surviving query region.
    pub adjusted: Vec<u64>,
    /// Surviving universe spans, widest first.
    pub universe: Vec<Interval>,
    /// Query regions removed for being wider than every universe span.
    pub queries_dropped: usize,
    /// Universe spans removed for being narrower than every query region.
    pub universe_dropped: usize,
}

/// Filters query and universe regions that cannot be paired.
#[derive(Debug, Clone, Copy)]
pub struct RegionValidator {
    included: f64,
}

impl RegionValidator {
    /// Create a validator. Fails with `InvalidParameter` unless
    /// `included` is in `[0, 1]`.
    pub fn new(included: f64) -> Result<Self> {
        check_included(included)?;
        Ok(Self { included })
    }

    pub fn included(&self) -> f64 {
        self.included
    }

    /// Filter `query` and `universe` against each other.
    pub fn filter(&self, query: &[Interval], universe: &[Interval]) -> Result<ValidRegions> {
        if query.is_empty() {
            return Ok(ValidRegions::default());
        }

        let adjusted: Vec<u64> = query
            .iter()
            .map(|iv| adjusted_width(iv.len(), self.included))
            .collect();
        let min_width = adjusted.iter().copied().min().unwrap_or(0);

        // Stable, so equal widths keep universe order
        let mut sorted: Vec<Interval> = universe.to_vec();
        sorted.sort_by(|a, b| b.len().cmp(&a.len()));

        let universe_total = sorted.len();
        sorted.retain(|iv| iv.len() >= min_width);
        let universe_dropped = universe_total - sorted.len();
        if universe_dropped > 0 {
            warn!(
                "{} universe regions are narrower than the smallest query region and were removed",
                universe_dropped
            );
        }
        if sorted.is_empty() {
            return Err(ShuffleError::ExhaustedUniverse);
        }

        let max_width = sorted[0].len();
        let (kept_query, kept_adjusted): (Vec<Interval>, Vec<u64>) = query
            .iter()
            .zip(adjusted)
            .filter(|(iv, _)| iv.len() <= max_width)
            .map(|(iv, width)| (iv.clone(), width))
            .unzip();

        let queries_dropped = query.len() - kept_query.len();
        if queries_dropped > 0 {
            warn!(
                "{} query regions are wider than the widest universe region and were removed",
                queries_dropped
            );
        }
        if kept_query.is_empty() {
            return Err(ShuffleError::NoEligibleRegions);
        }

        Ok(ValidRegions {
            query: kept_query,
            adjusted: kept_adjusted,
            universe: sorted,
            queries_dropped,
            universe_dropped,
        })
    }
}
