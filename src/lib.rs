//! tracebuf - binary event tracing with deferred formatting.
//!
//! Call sites capture a statically typed sequence of values into a
//! [`TraceBuffer`] as a compact binary record: a decode handle followed by the
//! raw bytes of the values. Nothing is formatted on the capture path. A later
//! replay walks the buffer from the start, decodes each record through the
//! handle, and prints one line per record.
//!
//! # Modules
//!
//! - [`value`] - the capturable value kinds and their encode/decode pairs
//! - [`shape`] - tuples of values captured as one record
//! - [`registry`] - decode handle and interned string assignment
//! - [`record`] - record header layout and the record encoder
//! - [`buffer`] - append-only byte storage
//! - [`recorder`] - the thread-safe [`TraceBuffer`]
//! - [`replay`] - sequential record decoding
//! - [`output`] - text and JSON printers
//!
//! # Example
//!
//! ```
//! use tracebuf::{record, TextPrinter, TraceBuffer};
//!
//! let buffer = TraceBuffer::new();
//! record!(buffer, "AreaB", 1, 2, 3, 4, 5).unwrap();
//!
//! let mut printer = TextPrinter::new(Vec::new());
//! buffer.replay(&mut printer).unwrap();
//! assert_eq!(printer.into_inner(), b"AreaB -- 1 2 3 4 5\n");
//! ```
//!
//! Records are only decodable by the buffer that produced them, within the
//! same run. The byte format is not a persistent or portable interface.

pub mod buffer;
pub mod config;
pub mod error;
mod macros;
pub mod output;
pub mod record;
pub mod recorder;
pub mod registry;
pub mod replay;
pub mod shape;
pub mod value;

/// Rendered between a record's area tag and its values.
pub const SEPARATOR: &str = "--";

// Re-export for convenience
pub use config::BufferConfig;
pub use error::{CaptureError, CorruptBuffer, Corruption};
pub use output::{JsonPrinter, RecordSink, TextPrinter};
pub use recorder::TraceBuffer;
pub use replay::{DecodedRecord, ReplayStats, Replayer};
pub use shape::Shape;
pub use value::{DecodedValue, Labeled, Location, Separator, Static, TraceValue, ValueKind};
