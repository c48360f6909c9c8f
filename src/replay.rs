//! Sequential replay of a trace buffer.
//!
//! Records are not indexed: each record's length is only known once its handle
//! has been looked up and its values decoded, so the only supported traversal
//! is from offset 0 forward. A buffer produced by the matching registry lands
//! exactly on its end; anything else is reported as [`CorruptBuffer`] at the
//! offset of the record that failed.

use anyhow::Result;
use serde::Serialize;

use crate::error::{Corruption, CorruptBuffer};
use crate::output::RecordSink;
use crate::record::{PayloadCursor, RecordHeader, HEADER_WIDTH};
use crate::registry::ShapeRegistry;
use crate::value::DecodedValue;

/// One record read back from a buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedRecord {
    /// Byte offset of the record within the buffer.
    pub offset: usize,
    /// Total bytes the record occupies, header included.
    #[serde(skip)]
    pub len: usize,
    pub area: &'static str,
    pub values: Vec<DecodedValue>,
}

impl DecodedRecord {
    /// Render as a single output line, without the terminator.
    pub fn render(&self) -> String {
        crate::output::render_line(self.area, &self.values)
    }
}

/// Totals for a completed replay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub records: usize,
    pub bytes: usize,
}

/// Decodes buffers produced under one registry.
#[derive(Debug, Clone, Copy)]
pub struct Replayer<'a> {
    registry: &'a ShapeRegistry,
}

impl<'a> Replayer<'a> {
    pub fn new(registry: &'a ShapeRegistry) -> Self {
        Self { registry }
    }

    /// Iterate the records in `bytes` in capture order.
    pub fn records<'b>(&self, bytes: &'b [u8]) -> Records<'a, 'b> {
        Records {
            registry: self.registry,
            bytes,
            cursor: 0,
            failed: false,
        }
    }

    /// Decode every record in `bytes` and hand it to `sink`.
    ///
    /// On corruption, records before the bad one have already reached the sink
    /// and the sink is flushed before the `CorruptBuffer` error is returned.
    pub fn replay(&self, bytes: &[u8], sink: &mut dyn RecordSink) -> Result<ReplayStats> {
        let mut stats = ReplayStats::default();
        for record in self.records(bytes) {
            match record {
                Ok(record) => {
                    sink.write_record(&record)?;
                    stats.records += 1;
                    stats.bytes += record.len;
                }
                Err(err) => {
                    tracing::warn!(
                        "Stopping replay after {} records: {}",
                        stats.records,
                        err
                    );
                    sink.flush()?;
                    return Err(err.into());
                }
            }
        }
        sink.flush()?;
        debug_assert_eq!(stats.bytes, bytes.len());
        Ok(stats)
    }
}

/// Iterator over the records of a buffer. Stops after the first error.
#[derive(Debug)]
pub struct Records<'r, 'b> {
    registry: &'r ShapeRegistry,
    bytes: &'b [u8],
    cursor: usize,
    failed: bool,
}

impl Records<'_, '_> {
    /// Offset of the next record to decode.
    pub fn position(&self) -> usize {
        self.cursor
    }
}

impl Iterator for Records<'_, '_> {
    type Item = Result<DecodedRecord, CorruptBuffer>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor >= self.bytes.len() {
            return None;
        }
        match decode_record(self.registry, self.bytes, self.cursor) {
            Ok(record) => {
                self.cursor += record.len;
                Some(Ok(record))
            }
            Err(cause) => {
                self.failed = true;
                Some(Err(CorruptBuffer {
                    offset: self.cursor,
                    cause,
                }))
            }
        }
    }
}

fn decode_record(
    registry: &ShapeRegistry,
    bytes: &[u8],
    offset: usize,
) -> Result<DecodedRecord, Corruption> {
    let rest = &bytes[offset..];
    let header = RecordHeader::read(rest)?;
    let kinds = registry
        .lookup(header.handle)
        .ok_or(Corruption::UnknownHandle(header.handle))?;
    let area = registry
        .resolve(header.area)
        .ok_or(Corruption::UnknownString(header.area))?;

    let mut cursor = PayloadCursor::new(&rest[HEADER_WIDTH..]);
    let values = kinds
        .iter()
        .map(|kind| kind.decode(&mut cursor, registry))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DecodedRecord {
        offset,
        len: HEADER_WIDTH + cursor.position(),
        area,
        values,
    })
}
