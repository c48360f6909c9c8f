//! Common helpers for tracebuf integration tests.

use tracebuf::{DecodedRecord, TraceBuffer};

/// Replay a buffer into rendered lines, panicking on corruption.
#[allow(dead_code)]
pub fn replay_lines(buffer: &TraceBuffer) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    buffer.replay(&mut lines).expect("replay failed");
    lines
}

/// Decode every record in `bytes` with `buffer`'s registry.
#[allow(dead_code)]
pub fn decode_all(buffer: &TraceBuffer, bytes: &[u8]) -> Vec<DecodedRecord> {
    buffer
        .replayer()
        .records(bytes)
        .collect::<Result<Vec<_>, _>>()
        .expect("decode failed")
}

/// Byte offsets at which each record starts, followed by the buffer length.
#[allow(dead_code)]
pub fn record_boundaries(buffer: &TraceBuffer, bytes: &[u8]) -> Vec<usize> {
    let mut boundaries: Vec<usize> = decode_all(buffer, bytes)
        .iter()
        .map(|r| r.offset)
        .collect();
    boundaries.push(bytes.len());
    boundaries
}
