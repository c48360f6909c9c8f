use std::mem::size_of;

use plain::Plain;

use crate::error::Corruption;
use crate::registry::ShapeRegistry;
use crate::shape::Shape;

/// Fixed header at the start of every record.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Decode handle assigned to the record's shape.
    pub handle: u32,
    /// Interned id of the area tag.
    pub area: u32,
}

unsafe impl Plain for RecordHeader {}

/// Width of the decode handle.
pub const HANDLE_WIDTH: usize = size_of::<u32>();

/// Width of the whole header: handle plus area id.
pub const HEADER_WIDTH: usize = size_of::<RecordHeader>();

impl RecordHeader {
    /// Read a header from the start of `bytes`.
    pub fn read(bytes: &[u8]) -> Result<Self, Corruption> {
        let mut header = RecordHeader::default();
        plain::copy_from_bytes(&mut header, bytes).map_err(|_| Corruption::Truncated {
            needed: HEADER_WIDTH,
            available: bytes.len(),
        })?;
        Ok(header)
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.handle.to_ne_bytes());
        out.extend_from_slice(&self.area.to_ne_bytes());
    }
}

/// Writes records for one registry.
///
/// Encoding copies bytes only: no formatting, no validation of the values,
/// and no allocation other than whatever growth `out` needs.
#[derive(Debug, Clone, Copy)]
pub struct RecordEncoder<'a> {
    registry: &'a ShapeRegistry,
}

impl<'a> RecordEncoder<'a> {
    pub fn new(registry: &'a ShapeRegistry) -> Self {
        Self { registry }
    }

    /// Exact number of bytes `encode` will append for these values.
    pub fn record_len<S: Shape>(&self, values: &S) -> usize {
        HEADER_WIDTH + values.encoded_len()
    }

    /// Resolve the header for a capture of `values` under `area`.
    pub fn header<S: Shape>(&self, area: &'static str) -> RecordHeader {
        RecordHeader {
            handle: self.registry.register::<S>(),
            area: self.registry.intern(area),
        }
    }

    /// Append one complete record to `out`.
    pub fn encode<S: Shape>(&self, out: &mut Vec<u8>, header: RecordHeader, values: &S) {
        header.write(out);
        values.encode(out, self.registry);
    }
}
