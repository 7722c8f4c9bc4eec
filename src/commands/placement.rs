//! Final coordinate placement inside a sampled universe span.

use crate::commands::validate::{adjusted_width, check_included};
use crate::error::Result;
use crate::interval::Interval;
use log::warn;

/// A placed region and whether it had to be cut to fit its chromosome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub interval: Interval,
    pub shortened: bool,
}

/// Turns a hosting span and a uniform draw into output coordinates.
///
/// Only `round(width * included)` bases must fall inside the host; the
/// remaining `overhang` bases may lie outside it. Results never leave
/// `[0, chrom_len]`.
#[derive(Debug, Clone, Copy)]
pub struct PlacementResolver {
    included: f64,
}

impl PlacementResolver {
    pub fn new(included: f64) -> Result<Self> {
        check_included(included)?;
        Ok(Self { included })
    }

    /// Place `query` in `host` using uniform draw `u` in `[0, 1)`.
    ///
    /// The output strand is the host's, not the query's.
    pub fn resolve(&self, query: &Interval, host: &Interval, chrom_len: u64, u: f64) -> Placement {
        let width = query.len();
        let adjusted = adjusted_width(width, self.included) as i64;
        let min_start = -((width as i64 - adjusted) as f64);
        let max_start = host.len() as f64 - adjusted as f64;

        let offset = u * (min_start + max_start) - min_start;
        let mut start = (host.start as i64 + offset.round() as i64).max(0);
        let mut end = start + adjusted;

        let chrom_len = chrom_len as i64;
        let mut shortened = false;
        if end > chrom_len {
            start -= end - chrom_len;
            end = chrom_len;
            if start < 0 {
                warn!(
                    "region {}:{}-{} is longer than {} ({} bp); shortened",
                    query.chrom, query.start, query.end, host.chrom, chrom_len
                );
                start = 0;
                shortened = true;
            }
        }

        Placement {
            interval: Interval::new(host.chrom.clone(), start as u64, end as u64)
                .with_strand(host.strand),
            shortened,
        }
    }
}
