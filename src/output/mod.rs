//! Value printing.
//!
//! Replay hands each decoded record to a [`RecordSink`]. The sink decides the
//! output format; the text form is the canonical one:
//!
//! ```text
//! <area> -- <value> <value> ...
//! ```
//!
//! Sinks only ever see fully decoded records, so a record that fails to decode
//! never produces partial output.

mod printer;

pub use printer::{render_line, JsonPrinter, TextPrinter};

use anyhow::Result;

use crate::replay::DecodedRecord;

/// Destination for replayed records.
pub trait RecordSink {
    /// Write one record.
    fn write_record(&mut self, record: &DecodedRecord) -> Result<()>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Collects rendered lines in memory.
impl RecordSink for Vec<String> {
    fn write_record(&mut self, record: &DecodedRecord) -> Result<()> {
        self.push(record.render());
        Ok(())
    }
}
