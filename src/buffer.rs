//! Append-only byte storage backing a trace buffer.
//!
//! Records are concatenated with no separators. Appended bytes never move
//! relative to each other, but growth may reallocate, so nothing outside this
//! type holds addresses into it: readers work from offsets on a snapshot.

use std::mem;

use crate::config::BufferConfig;
use crate::error::CaptureError;

#[derive(Debug, Default)]
pub struct TraceStorage {
    bytes: Vec<u8>,
    records: usize,
    max_bytes: Option<usize>,
}

impl TraceStorage {
    pub fn new(config: &BufferConfig) -> Self {
        Self {
            bytes: Vec::with_capacity(config.reserve_hint()),
            records: 0,
            max_bytes: config.max_bytes,
        }
    }

    /// Append raw bytes to the end of storage.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), CaptureError> {
        self.reserve(bytes.len())?;
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }

    /// Append one record of exactly `len` bytes produced by `write`.
    ///
    /// Space is reserved before `write` runs, so a record is either appended
    /// whole or not at all.
    pub(crate) fn append_record<F>(&mut self, len: usize, write: F) -> Result<(), CaptureError>
    where
        F: FnOnce(&mut Vec<u8>),
    {
        self.reserve(len)?;
        let start = self.bytes.len();
        write(&mut self.bytes);
        debug_assert_eq!(self.bytes.len() - start, len);
        self.records += 1;
        Ok(())
    }

    fn reserve(&mut self, additional: usize) -> Result<(), CaptureError> {
        let buffered = self.bytes.len();
        if let Some(limit) = self.max_bytes {
            if buffered.saturating_add(additional) > limit {
                return Err(CaptureError::CapacityExhausted {
                    requested: additional,
                    buffered,
                    limit: Some(limit),
                    source: None,
                });
            }
        }
        // Vec growth is amortized doubling; try_reserve surfaces allocation
        // failure instead of aborting.
        self.bytes
            .try_reserve(additional)
            .map_err(|e| CaptureError::CapacityExhausted {
                requested: additional,
                buffered,
                limit: None,
                source: Some(e),
            })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Records appended through `append_record` since creation or the last `take`.
    pub fn records(&self) -> usize {
        self.records
    }

    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Move all bytes out, leaving the storage empty.
    pub fn take(&mut self) -> Vec<u8> {
        self.records = 0;
        mem::take(&mut self.bytes)
    }
}
