//! The trace buffer handed to call sites.
//!
//! A `TraceBuffer` owns its storage and the registry that gives its records
//! meaning. It is `Sync`: captures from any number of threads are serialized
//! by a single lock around the append, so records never interleave and replay
//! order is the order the lock was taken in.
//!
//! Lifecycle: create with [`TraceBuffer::new`], capture, then either replay in
//! place or [`drain`](TraceBuffer::drain) the bytes and replay them through
//! [`replayer`](TraceBuffer::replayer). Dropping the buffer releases everything.
//! With no `max_bytes` configured the buffer grows without bound.

use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;

use crate::buffer::TraceStorage;
use crate::config::BufferConfig;
use crate::error::CaptureError;
use crate::output::RecordSink;
use crate::record::RecordEncoder;
use crate::registry::ShapeRegistry;
use crate::replay::{ReplayStats, Replayer};
use crate::shape::Shape;

#[derive(Debug)]
pub struct TraceBuffer {
    registry: ShapeRegistry,
    storage: Mutex<TraceStorage>,
}

impl TraceBuffer {
    pub fn new() -> Self {
        Self::with_config(BufferConfig::default())
    }

    pub fn with_config(config: BufferConfig) -> Self {
        Self {
            registry: ShapeRegistry::new(),
            storage: Mutex::new(TraceStorage::new(&config)),
        }
    }

    /// Capture `values` as one record tagged with `area`.
    ///
    /// The record holds the area, an implicit separator, then the values in
    /// order. Nothing is formatted here; that happens on replay.
    pub fn capture<S: Shape>(&self, area: &'static str, values: S) -> Result<(), CaptureError> {
        let encoder = RecordEncoder::new(&self.registry);
        let header = encoder.header::<S>(area);
        let len = encoder.record_len(&values);

        let result = self
            .lock()
            .append_record(len, |out| encoder.encode(out, header, &values));
        if let Err(err) = &result {
            tracing::warn!("Dropped {} record: {}", area, err);
        }
        result
    }

    /// The registry that assigned this buffer's decode handles.
    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    /// A replayer for bytes captured into this buffer, including drained ones.
    pub fn replayer(&self) -> Replayer<'_> {
        Replayer::new(&self.registry)
    }

    /// Replay a snapshot of the current contents into `sink`.
    ///
    /// Captures may continue while the snapshot is replayed; they are not
    /// part of this replay.
    pub fn replay(&self, sink: &mut dyn RecordSink) -> Result<ReplayStats> {
        let bytes = self.snapshot();
        self.replayer().replay(&bytes, sink)
    }

    /// Copy of the bytes captured so far.
    pub fn snapshot(&self) -> Vec<u8> {
        self.lock().as_slice().to_vec()
    }

    /// Take the bytes captured so far, leaving the buffer empty.
    pub fn drain(&self) -> Vec<u8> {
        self.lock().take()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Records captured since creation or the last drain.
    pub fn record_count(&self) -> usize {
        self.lock().records()
    }

    // A panic can't leave a half-written record: space is reserved before
    // encoding starts and encoding itself does not panic.
    fn lock(&self) -> MutexGuard<'_, TraceStorage> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TraceBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CorruptBuffer;
    use crate::record::HEADER_WIDTH;
    use crate::value::Labeled;

    #[test]
    fn test_capture_then_replay() {
        let buffer = TraceBuffer::new();
        buffer.capture("AreaA", ("hello",)).unwrap();
        buffer.capture("AreaB", (1, 2, 3, 4, 5)).unwrap();

        let mut lines: Vec<String> = Vec::new();
        let stats = buffer.replay(&mut lines).unwrap();
        assert_eq!(lines, vec!["AreaA -- hello", "AreaB -- 1 2 3 4 5"]);
        assert_eq!(stats.records, 2);
        assert_eq!(stats.bytes, buffer.len());
        assert_eq!(buffer.record_count(), 2);
    }

    #[test]
    fn test_capture_grows_by_record_len() {
        let buffer = TraceBuffer::new();
        buffer.capture("A", (1u8, 2u64)).unwrap();
        assert_eq!(buffer.len(), HEADER_WIDTH + 1 + 8);
        buffer.capture("A", ()).unwrap();
        assert_eq!(buffer.len(), 2 * HEADER_WIDTH + 1 + 8);
    }

    #[test]
    fn test_capacity_exhaustion_is_reported() {
        let buffer = TraceBuffer::with_config(BufferConfig {
            initial_capacity: 0,
            max_bytes: Some(HEADER_WIDTH + 4),
        });
        buffer.capture("A", (1u32,)).unwrap();
        let err = buffer.capture("A", (2u32,)).unwrap_err();
        assert!(matches!(err, CaptureError::CapacityExhausted { .. }));

        // The record that fit is still intact.
        let mut lines: Vec<String> = Vec::new();
        buffer.replay(&mut lines).unwrap();
        assert_eq!(lines, vec!["A -- 1"]);
    }

    #[test]
    fn test_drain_keeps_registry() {
        let buffer = TraceBuffer::new();
        buffer.capture("First", (Labeled::new("n", 1u16),)).unwrap();
        let drained = buffer.drain();
        assert!(buffer.is_empty());
        assert_eq!(buffer.record_count(), 0);

        buffer.capture("Second", (Labeled::new("n", 2u16),)).unwrap();

        let mut lines: Vec<String> = Vec::new();
        buffer.replayer().replay(&drained, &mut lines).unwrap();
        buffer.replay(&mut lines).unwrap();
        assert_eq!(lines, vec!["First -- n=1", "Second -- n=2"]);
    }

    #[test]
    fn test_foreign_buffer_is_corrupt() {
        let a = TraceBuffer::new();
        let b = TraceBuffer::new();
        a.capture("A", (1u8,)).unwrap();

        let mut lines: Vec<String> = Vec::new();
        let err = b.replayer().replay(&a.snapshot(), &mut lines).unwrap_err();
        assert!(err.downcast_ref::<CorruptBuffer>().is_some());
        assert!(lines.is_empty());
    }
}
