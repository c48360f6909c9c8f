//! Error types for the capture and replay paths.
//!
//! - `CaptureError` - a record could not be appended to the buffer
//! - `CorruptBuffer` - replay hit bytes that do not decode as a record
//!
//! Values outside the capturable set never get this far: `TraceValue` is
//! sealed and requires `Copy`, so they are rejected at compile time.

use std::collections::TryReserveError;
use std::fmt;

/// Failure to append a record to a trace buffer.
#[derive(Debug, Clone)]
pub enum CaptureError {
    /// The buffer could not grow to hold the record. `limit` is the configured
    /// byte limit, or `None` when the allocator itself refused to grow.
    CapacityExhausted {
        requested: usize,
        buffered: usize,
        limit: Option<usize>,
        source: Option<TryReserveError>,
    },
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::CapacityExhausted {
                requested,
                buffered,
                limit: Some(limit),
                ..
            } => {
                write!(
                    f,
                    "trace buffer limit of {limit} bytes reached: {buffered} buffered, {requested} more requested"
                )
            }
            CaptureError::CapacityExhausted {
                requested,
                buffered,
                limit: None,
                ..
            } => {
                write!(
                    f,
                    "failed to grow trace buffer by {requested} bytes ({buffered} buffered)"
                )
            }
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaptureError::CapacityExhausted { source, .. } => source
                .as_ref()
                .map(|e| e as &(dyn std::error::Error + 'static)),
        }
    }
}

/// Why a record failed to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Corruption {
    /// The decode handle was never assigned by this buffer's registry.
    UnknownHandle(u32),
    /// An interned text id was never assigned by this buffer's registry.
    UnknownString(u32),
    /// The record claims more bytes than remain in the buffer.
    Truncated { needed: usize, available: usize },
    /// Copied text is not valid UTF-8.
    InvalidUtf8,
    /// A `bool` byte other than 0 or 1.
    InvalidBool(u8),
    /// A `char` slot that is not a Unicode scalar value.
    InvalidChar(u32),
}

impl fmt::Display for Corruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Corruption::UnknownHandle(handle) => write!(f, "unknown decode handle {handle}"),
            Corruption::UnknownString(id) => write!(f, "unknown interned string id {id}"),
            Corruption::Truncated { needed, available } => {
                write!(f, "truncated record: needed {needed} bytes, {available} available")
            }
            Corruption::InvalidUtf8 => write!(f, "text is not valid UTF-8"),
            Corruption::InvalidBool(byte) => write!(f, "invalid bool byte {byte:#04x}"),
            Corruption::InvalidChar(raw) => write!(f, "invalid char value {raw:#x}"),
        }
    }
}

/// A record that could not be decoded during replay.
///
/// `offset` is the byte offset of the start of the offending record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorruptBuffer {
    pub offset: usize,
    pub cause: Corruption,
}

impl fmt::Display for CorruptBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "corrupt trace buffer at offset {}: {}", self.offset, self.cause)
    }
}

impl std::error::Error for CorruptBuffer {}
