//! Length-weighted selection of hosting universe spans.
//!
//! The universe is sorted widest first, so the spans able to host a
//! region of width `w` always form a prefix. A uniform draw over the
//! prefix's total width, located in the cumulative width array, picks
//! each eligible span with probability proportional to its width.

use crate::error::{Result, ShuffleError};
use crate::interval::Interval;
use rand::Rng;

/// Cumulative-width index over a universe sorted by descending width.
#[derive(Debug, Clone)]
pub struct WeightedSampler {
    widths: Vec<u64>,
    cumulative: Vec<u64>,
}

impl WeightedSampler {
    /// Build the index. `sorted_universe` must be sorted by descending
    /// width. Fails with `InvalidParameter` if the total width does not
    /// fit in a `u64`.
    pub fn new(sorted_universe: &[Interval]) -> Result<Self> {
        let widths: Vec<u64> = sorted_universe.iter().map(Interval::len).collect();
        debug_assert!(widths.windows(2).all(|w| w[0] >= w[1]));

        let mut cumulative = Vec::with_capacity(widths.len());
        let mut total = 0u64;
        for &w in &widths {
            total = total.checked_add(w).ok_or_else(|| {
                ShuffleError::InvalidParameter("total universe width overflows u64".to_string())
            })?;
            cumulative.push(total);
        }

        Ok(Self { widths, cumulative })
    }

    /// Number of spans wide enough to host a region of `width`, i.e. the
    /// index of the first span narrower than `width`.
    #[inline]
    pub fn eligible(&self, width: u64) -> usize {
        self.widths.partition_point(|&w| w >= width)
    }

    /// Total width of the first `k` spans.
    #[inline]
    pub fn prefix_width(&self, k: usize) -> u64 {
        if k == 0 {
            0
        } else {
            self.cumulative[k - 1]
        }
    }

    /// Span index holding position `draw` (1-based) of the cumulative
    /// width: the first index whose running total reaches `draw`.
    #[inline]
    pub fn locate(&self, draw: u64) -> usize {
        self.cumulative.partition_point(|&c| c < draw)
    }

    /// Pick a hosting span for one region of `width`, or `None` when no
    /// span can host it.
    pub fn sample_one<R: Rng + ?Sized>(&self, width: u64, rng: &mut R) -> Option<usize> {
        let total = self.prefix_width(self.eligible(width));
        if total == 0 {
            return None;
        }
        let draw = rng.gen_range(1..=total);
        Some(self.locate(draw))
    }

    /// Pick a hosting span for every adjusted width, in order.
    pub fn sample<R: Rng + ?Sized>(&self, adjusted: &[u64], rng: &mut R) -> Result<Vec<usize>> {
        adjusted
            .iter()
            .map(|&w| {
                self.sample_one(w, rng)
                    .ok_or(ShuffleError::NoEligibleRegions)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sorted_universe() -> Vec<Interval> {
        vec![
            Interval::new("chr1", 0, 500),
            Interval::new("chr1", 1000, 1300),
            Interval::new("chr2", 0, 200),
        ]
    }

    #[test]
    fn test_cumulative_index() {
        let sampler = WeightedSampler::new(&sorted_universe()).unwrap();

        assert_eq!(sampler.prefix_width(0), 0);
        assert_eq!(sampler.prefix_width(1), 500);
        assert_eq!(sampler.prefix_width(3), 1000);
    }

    #[test]
    fn test_eligible_prefix() {
        let sampler = WeightedSampler::new(&sorted_universe()).unwrap();

        assert_eq!(sampler.eligible(0), 3);
        assert_eq!(sampler.eligible(200), 3);
        assert_eq!(sampler.eligible(201), 2);
        assert_eq!(sampler.eligible(300), 2);
        assert_eq!(sampler.eligible(500), 1);
        assert_eq!(sampler.eligible(501), 0);
    }

    #[test]
    fn test_locate_boundaries() {
        let sampler = WeightedSampler::new(&sorted_universe()).unwrap();

        assert_eq!(sampler.locate(1), 0);
        assert_eq!(sampler.locate(500), 0);
        assert_eq!(sampler.locate(501), 1);
        assert_eq!(sampler.locate(800), 1);
        assert_eq!(sampler.locate(801), 2);
        assert_eq!(sampler.locate(1000), 2);
    }

    #[test]
    fn test_sample_respects_width() {
        let sampler = WeightedSampler::new(&sorted_universe()).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);

        for _ in 0..1000 {
            // Only the 500bp span can host a 400bp region
            assert_eq!(sampler.sample_one(400, &mut rng), Some(0));
            assert!(sampler.sample_one(250, &mut rng).unwrap() < 2);
        }
        assert_eq!(sampler.sample_one(501, &mut rng), None);
    }

    #[test]
    fn test_sample_errors_without_host() {
        let sampler = WeightedSampler::new(&sorted_universe()).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);

        assert!(matches!(
            sampler.sample(&[10, 600], &mut rng),
            Err(ShuffleError::NoEligibleRegions)
        ));
        assert_eq!(sampler.sample(&[10, 20], &mut rng).unwrap().len(), 2);
    }

    #[test]
    fn test_sample_proportional_to_width() {
        let sampler = WeightedSampler::new(&sorted_universe()).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        let draws = 100_000;

        let mut counts = [0usize; 3];
        for idx in sampler.sample(&vec![1; draws], &mut rng).unwrap() {
            counts[idx] += 1;
        }

        let expected = [0.5, 0.3, 0.2];
        for (count, p) in counts.iter().zip(expected) {
            let freq = *count as f64 / draws as f64;
            assert!((freq - p).abs() < 0.01, "freq {} expected {}", freq, p);
        }
    }

    #[test]
    fn test_total_width_overflow() {
        let half = u64::MAX / 2 + 1;
        let universe = vec![Interval::new("chr1", 0, half), Interval::new("chr2", 0, half)];

        assert!(matches!(
            WeightedSampler::new(&universe),
            Err(ShuffleError::InvalidParameter(_))
        ));
        assert!(WeightedSampler::new(&universe[..1]).is_ok());
    }
}
