//! Buffered BED output.
//!
//! Uses itoa for integer formatting to avoid allocation per record.

use crate::bed::BedError;
use crate::interval::Interval;
use std::io::{BufWriter, Write};

/// Buffer size for BedWriter (1MB default).
const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Layout of emitted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BedLayout {
    /// chrom, start, end
    Bed3,
    /// chrom, start, end, name, score (always 0), strand
    Bed6,
}

impl BedLayout {
    /// BED3 is enough when no record carries strand information.
    pub fn for_intervals(intervals: &[Interval]) -> Self {
        if intervals
            .iter()
            .all(|iv| iv.strand == crate::interval::Strand::Unstranded)
        {
            BedLayout::Bed3
        } else {
            BedLayout::Bed6
        }
    }
}

/// BED writer with a large buffer and zero-allocation integer formatting.
pub struct BedWriter<W: Write> {
    writer: BufWriter<W>,
    itoa_buf: itoa::Buffer,
}

impl<W: Write> BedWriter<W> {
    /// Create a new BedWriter with the default buffer.
    pub fn new(output: W) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, output)
    }

    /// Create a new BedWriter with specified buffer size.
    pub fn with_capacity(capacity: usize, output: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            itoa_buf: itoa::Buffer::new(),
        }
    }

    #[inline]
    fn write_bed3(&mut self, interval: &Interval) -> Result<(), BedError> {
        self.writer.write_all(interval.chrom.as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer
            .write_all(self.itoa_buf.format(interval.start).as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer
            .write_all(self.itoa_buf.format(interval.end).as_bytes())?;
        Ok(())
    }

    /// Write one interval in the requested layout. `name` is only used
    /// for BED6 and defaults to `.`.
    #[inline]
    pub fn write_interval(
        &mut self,
        interval: &Interval,
        layout: BedLayout,
        name: Option<&str>,
    ) -> Result<(), BedError> {
        self.write_bed3(interval)?;
        if layout == BedLayout::Bed6 {
            self.writer.write_all(b"\t")?;
            self.writer.write_all(name.unwrap_or(".").as_bytes())?;
            self.writer.write_all(b"\t0\t")?;
            self.writer.write_all(&[interval.strand.as_byte()])?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Write every interval with the same layout and name.
    pub fn write_all(
        &mut self,
        intervals: &[Interval],
        layout: BedLayout,
        name: Option<&str>,
    ) -> Result<(), BedError> {
        for interval in intervals {
            self.write_interval(interval, layout, name)?;
        }
        Ok(())
    }

    /// Flush the output buffer.
    pub fn flush(&mut self) -> Result<(), BedError> {
        self.writer.flush()?;
        Ok(())
    }
}
