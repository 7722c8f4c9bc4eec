//! Chromosome size table.
//!
//! Parses .genome / chrom.sizes files (tab-delimited: chrom\tsize). The
//! table bounds every shuffled coordinate and fixes the order in which
//! chromosomes are visited in per-chromosome mode.

use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::bed::BedError;

/// Chromosome sizes, preserving the order chromosomes were first seen.
#[derive(Debug, Clone, Default)]
pub struct Genome {
    sizes: FxHashMap<String, u64>,
    order: Vec<String>,
}

impl Genome {
    /// Create an empty genome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load genome from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BedError> {
        Self::from_reader(File::open(path)?)
    }

    /// Load genome from any reader. Whitespace-separated columns are
    /// accepted so UCSC chrom.sizes files load unchanged.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, BedError> {
        let reader = BufReader::new(reader);
        let mut genome = Self::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let (chrom, size) = match (fields.next(), fields.next()) {
                (Some(chrom), Some(size)) => (chrom, size),
                _ => {
                    return Err(BedError::Parse {
                        line: line_num + 1,
                        message: "Genome file requires two columns: chrom and size".to_string(),
                    })
                }
            };

            let size: u64 = size
                .parse()
                .ok()
                .filter(|&s| s > 0)
                .ok_or_else(|| BedError::Parse {
                    line: line_num + 1,
                    message: format!("Invalid chromosome size: {}", size),
                })?;

            genome.insert(chrom.to_string(), size);
        }

        Ok(genome)
    }

    /// Get the size of a chromosome.
    #[inline]
    pub fn chrom_size(&self, chrom: &str) -> Option<u64> {
        self.sizes.get(chrom).copied()
    }

    /// Check if a chromosome exists.
    #[inline]
    pub fn has_chrom(&self, chrom: &str) -> bool {
        self.sizes.contains_key(chrom)
    }

    /// Get all chromosome names in order.
    pub fn chromosomes(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }

    /// Iterate `(chrom, size)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.order
            .iter()
            .map(move |chrom| (chrom.as_str(), self.sizes[chrom]))
    }

    /// Get number of chromosomes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Insert a chromosome size (appends to order if new, otherwise the
    /// size is replaced in place).
    pub fn insert(&mut self, chrom: String, size: u64) {
        if !self.sizes.contains_key(&chrom) {
            self.order.push(chrom.clone());
        }
        self.sizes.insert(chrom, size);
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for Genome {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut genome = Genome::new();
        for (chrom, size) in iter {
            genome.insert(chrom.into(), size);
        }
        genome
    }
}
