//! Streaming BED file parser.

use crate::interval::{Interval, Strand};
use memchr::memchr_iter;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during BED parsing.
#[derive(Error, Debug)]
pub enum BedError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid BED format: {0}")]
    InvalidFormat(String),
}

pub type Result<T> = std::result::Result<T, BedError>;

/// A streaming BED file reader.
pub struct BedReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    buffer: String,
}

impl BedReader<File> {
    /// Open a BED file from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> BedReader<R> {
    /// Create a new BED reader from any readable source.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buffer: String::with_capacity(1024),
        }
    }

    /// Read the next interval.
    pub fn read_interval(&mut self) -> Result<Option<Interval>> {
        loop {
            self.buffer.clear();
            let bytes_read = self.reader.read_line(&mut self.buffer)?;
            if bytes_read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            // Skip empty lines and comments
            let line = self.buffer.trim();
            if should_skip_line(line) {
                continue;
            }

            return self.parse_line(line).map(Some);
        }
    }

    /// Parse a single BED line. Columns beyond the strand (BED6) are ignored.
    fn parse_line(&self, line: &str) -> Result<Interval> {
        let fields = split_fields(line);

        if fields.len() < 3 {
            return Err(BedError::Parse {
                line: self.line_number,
                message: format!("Expected at least 3 fields, got {}", fields.len()),
            });
        }

        let start = self.parse_position(fields[1], "start")?;
        let end = self.parse_position(fields[2], "end")?;

        if start >= end {
            return Err(BedError::Parse {
                line: self.line_number,
                message: format!("Start ({}) must be less than end ({})", start, end),
            });
        }

        let mut interval = Interval::new(fields[0], start, end);
        if let Some(strand) = fields.get(5).and_then(|s| s.chars().next()) {
            interval.strand = Strand::from_char(strand);
        }

        Ok(interval)
    }

    fn parse_position(&self, s: &str, field_name: &str) -> Result<u64> {
        s.parse().map_err(|_| BedError::Parse {
            line: self.line_number,
            message: format!("Invalid {} position: '{}'", field_name, s),
        })
    }

    /// Get an iterator over all intervals.
    pub fn intervals(self) -> BedIntervalIter<R> {
        BedIntervalIter { reader: self }
    }
}

/// Iterator over BED intervals.
pub struct BedIntervalIter<R: Read> {
    reader: BedReader<R>,
}

impl<R: Read> Iterator for BedIntervalIter<R> {
    type Item = Result<Interval>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_interval() {
            Ok(Some(interval)) => Some(Ok(interval)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// Check if a line should be skipped (empty, comment, or header).
#[inline]
pub fn should_skip_line(line: &str) -> bool {
    line.is_empty()
        || line.starts_with('#')
        || line.starts_with("track")
        || line.starts_with("browser")
}

/// Split a line on tabs using memchr.
fn split_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::with_capacity(6);
    let mut last = 0;
    for tab in memchr_iter(b'\t', line.as_bytes()) {
        fields.push(&line[last..tab]);
        last = tab + 1;
    }
    fields.push(&line[last..]);
    fields
}

/// Read all intervals from a BED file.
pub fn read_intervals<P: AsRef<Path>>(path: P) -> Result<Vec<Interval>> {
    BedReader::from_path(path)?.intervals().collect()
}

/// Parse intervals from a string (useful for testing).
pub fn parse_intervals(content: &str) -> Result<Vec<Interval>> {
    BedReader::new(content.as_bytes()).intervals().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bed3() {
        let content = "chr1\t100\t200\nchr1\t300\t400\n";
        let intervals = parse_intervals(content).unwrap();

        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].chrom, "chr1");
        assert_eq!(intervals[0].start, 100);
        assert_eq!(intervals[0].end, 200);
        assert_eq!(intervals[0].strand, Strand::Unstranded);
    }

    #[test]
    fn test_parse_bed6_strand() {
        let content = "chr1\t100\t200\tpeak1\t500\t-\nchr2\t10\t20\tpeak2\t0\t+\textra\n";
        let intervals = parse_intervals(content).unwrap();

        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].strand, Strand::Minus);
        assert_eq!(intervals[1].strand, Strand::Plus);
        assert_eq!(intervals[1].chrom, "chr2");
    }

    #[test]
    fn test_skip_comments_and_headers() {
        let content = "# comment\ntrack name=test\nbrowser position chr1:1-1000\n\nchr1\t100\t200\n";
        let intervals = parse_intervals(content).unwrap();

        assert_eq!(intervals.len(), 1);
    }

    #[test]
    fn test_invalid_bed() {
        assert!(parse_intervals("chr1\t100\n").is_err()); // Only 2 fields
        assert!(parse_intervals("chr1\tabc\t200\n").is_err());
    }

    #[test]
    fn test_empty_interval_rejected() {
        let err = parse_intervals("chr1\t10\t20\nchr1\t200\t200\n").unwrap_err();
        match err {
            BedError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_split_fields() {
        assert_eq!(split_fields("a\tb\tc"), vec!["a", "b", "c"]);
        assert_eq!(split_fields("a"), vec!["a"]);
        assert_eq!(split_fields("a\t\tc"), vec!["a", "", "c"]);
    }
}
