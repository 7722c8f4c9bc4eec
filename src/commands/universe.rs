//! Universe construction.
//!
//! The universe is the disjoint set of genomic spans where shuffled
//! intervals may be placed. It is either the whole genome (one span per
//! chromosome) or the interval union of a caller-supplied set.

use crate::genome::Genome;
use crate::interval::{Interval, Strand};
use crate::parallel::group_by_chromosome;

/// A merged, pairwise-disjoint set of placement spans.
///
/// Chromosomes appear in genome-file order; chromosomes unknown to the
/// genome follow in lexicographic order. Within a chromosome spans are
/// sorted by start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Universe {
    intervals: Vec<Interval>,
}

impl Universe {
    /// Borrow the universe spans.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Consume the universe, returning its spans.
    pub fn into_intervals(self) -> Vec<Interval> {
        self.intervals
    }

    /// Number of spans.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Total number of bases covered.
    pub fn total_width(&self) -> u64 {
        self.intervals.iter().map(Interval::len).sum()
    }

    /// Chromosomes the universe covers, in universe order.
    pub fn chromosomes(&self) -> Vec<&str> {
        let mut chroms: Vec<&str> = Vec::new();
        for iv in &self.intervals {
            if chroms.last() != Some(&iv.chrom.as_str()) {
                chroms.push(&iv.chrom);
            }
        }
        chroms
    }
}

/// Builds a [`Universe`] from a genome or a caller-supplied interval set.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniverseBuilder;

impl UniverseBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the placement universe.
    ///
    /// With no `universe`, every chromosome in `sizes` contributes one span
    /// covering its full length. Either way the result is merged.
    pub fn build(&self, universe: Option<&[Interval]>, sizes: &Genome) -> Universe {
        match universe {
            Some(intervals) => self.merge(intervals, sizes),
            None => {
                let whole: Vec<Interval> = sizes
                    .iter()
                    .map(|(chrom, size)| Interval::new(chrom, 0, size))
                    .collect();
                self.merge(&whole, sizes)
            }
        }
    }

    /// Interval union of `intervals`. Overlapping and adjacent spans are
    /// joined; zero-width spans are discarded.
    pub fn merge(&self, intervals: &[Interval], sizes: &Genome) -> Universe {
        let mut groups = group_by_chromosome(intervals.iter().filter(|iv| !iv.is_empty()));

        let mut chroms: Vec<String> = sizes
            .chromosomes()
            .filter(|chrom| groups.contains_key(chrom.as_str()))
            .cloned()
            .collect();
        let mut extra: Vec<String> = groups
            .keys()
            .filter(|chrom| !sizes.has_chrom(chrom))
            .cloned()
            .collect();
        extra.sort();
        chroms.extend(extra);

        let mut merged = Vec::with_capacity(intervals.len());
        for chrom in chroms {
            if let Some(mut group) = groups.remove(&chrom) {
                group.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));
                merge_sorted(group, &mut merged);
            }
        }

        Universe { intervals: merged }
    }
}

/// Sweep-line union of one chromosome's spans, pre-sorted by start.
fn merge_sorted(group: Vec<Interval>, out: &mut Vec<Interval>) {
    let mut iter = group.into_iter();
    let Some(mut current) = iter.next() else {
        return;
    };

    for interval in iter {
        if current.touches(&interval) {
            current.end = current.end.max(interval.end);
            if current.strand != interval.strand {
                current.strand = Strand::Unstranded;
            }
        } else {
            out.push(current);
            current = interval;
        }
    }

    out.push(current);
}
