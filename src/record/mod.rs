//! Record layout.
//!
//! A record is a fixed header followed by the raw bytes of its values:
//!
//! ```text
//! [handle: u32][area id: u32][value 0][value 1]...
//! ```
//!
//! Fields are packed with no padding and use native endianness. The handle
//! both identifies the shape and implies the payload length, so records sit
//! back to back with no delimiters.

mod cursor;
pub mod encoder;

pub(crate) use cursor::PayloadCursor;
pub use encoder::{RecordEncoder, RecordHeader, HANDLE_WIDTH, HEADER_WIDTH};
