//! Capturable values.
//!
//! Only kinds implementing the sealed [`TraceValue`] trait can go into a
//! record. Every implementor is `Copy`, so owning or growable data such as
//! `String` or `Vec<u8>` is rejected at compile time:
//!
//! ```compile_fail
//! let buffer = tracebuf::TraceBuffer::new();
//! buffer.capture("Area", (String::from("owned"),)).unwrap();
//! ```
//!
//! Text is copied into the record by default (`&str`). [`Static`] opts into
//! storing only an interned id for `&'static str` text.

mod decoded;
mod kind;

pub use decoded::DecodedValue;
pub use kind::ValueKind;

use std::mem::size_of;

use crate::registry::{ShapeRegistry, STRING_ID_WIDTH};

mod sealed {
    pub trait Sealed {}
}

/// A fixed-layout value that can be written into a record.
///
/// Each kind has an explicit encode here and a matching decode in
/// [`ValueKind`].
pub trait TraceValue: Copy + sealed::Sealed {
    const KIND: ValueKind;

    /// Number of bytes `encode` appends.
    fn encoded_len(&self) -> usize;

    fn encode(&self, out: &mut Vec<u8>, registry: &ShapeRegistry);
}

macro_rules! impl_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl TraceValue for $ty {
                const KIND: ValueKind = ValueKind::$kind;

                #[inline]
                fn encoded_len(&self) -> usize {
                    size_of::<$ty>()
                }

                #[inline]
                fn encode(&self, out: &mut Vec<u8>, _registry: &ShapeRegistry) {
                    out.extend_from_slice(&self.to_ne_bytes());
                }
            }
        )*
    };
}

impl_scalar!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
);

impl sealed::Sealed for bool {}

impl TraceValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn encoded_len(&self) -> usize {
        1
    }

    fn encode(&self, out: &mut Vec<u8>, _registry: &ShapeRegistry) {
        out.push(u8::from(*self));
    }
}

impl sealed::Sealed for char {}

impl TraceValue for char {
    const KIND: ValueKind = ValueKind::Char;

    fn encoded_len(&self) -> usize {
        size_of::<u32>()
    }

    fn encode(&self, out: &mut Vec<u8>, _registry: &ShapeRegistry) {
        out.extend_from_slice(&u32::from(*self).to_ne_bytes());
    }
}

impl sealed::Sealed for &str {}

impl TraceValue for &str {
    const KIND: ValueKind = ValueKind::Str;

    fn encoded_len(&self) -> usize {
        size_of::<usize>() + self.len()
    }

    fn encode(&self, out: &mut Vec<u8>, _registry: &ShapeRegistry) {
        out.extend_from_slice(&self.len().to_ne_bytes());
        out.extend_from_slice(self.as_bytes());
    }
}

/// Reference-only text: the record holds an interned id instead of the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Static(pub &'static str);

impl sealed::Sealed for Static {}

impl TraceValue for Static {
    const KIND: ValueKind = ValueKind::StaticStr;

    fn encoded_len(&self) -> usize {
        STRING_ID_WIDTH
    }

    fn encode(&self, out: &mut Vec<u8>, registry: &ShapeRegistry) {
        out.extend_from_slice(&registry.intern(self.0).to_ne_bytes());
    }
}

/// Marker rendered as `--`. Every record carries one implicitly after its area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Separator;

impl sealed::Sealed for Separator {}

impl TraceValue for Separator {
    const KIND: ValueKind = ValueKind::Separator;

    fn encoded_len(&self) -> usize {
        0
    }

    fn encode(&self, _out: &mut Vec<u8>, _registry: &ShapeRegistry) {}
}

/// Source position of a capture, rendered as `[file:line]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub file: &'static str,
    pub line: u32,
}

impl Location {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }
}

impl sealed::Sealed for Location {}

impl TraceValue for Location {
    const KIND: ValueKind = ValueKind::Location;

    fn encoded_len(&self) -> usize {
        STRING_ID_WIDTH + size_of::<u32>()
    }

    fn encode(&self, out: &mut Vec<u8>, registry: &ShapeRegistry) {
        out.extend_from_slice(&registry.intern(self.file).to_ne_bytes());
        out.extend_from_slice(&self.line.to_ne_bytes());
    }
}

/// A `label=value` pair, usually built with [`lval!`](crate::lval).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Labeled<T> {
    pub label: &'static str,
    pub value: T,
}

impl<T: TraceValue> Labeled<T> {
    pub fn new(label: &'static str, value: T) -> Self {
        Self { label, value }
    }
}

impl<T: TraceValue> sealed::Sealed for Labeled<T> {}

impl<T: TraceValue> TraceValue for Labeled<T> {
    const KIND: ValueKind = ValueKind::Labeled(&T::KIND);

    fn encoded_len(&self) -> usize {
        STRING_ID_WIDTH + self.value.encoded_len()
    }

    fn encode(&self, out: &mut Vec<u8>, registry: &ShapeRegistry) {
        out.extend_from_slice(&registry.intern(self.label).to_ne_bytes());
        self.value.encode(out, registry);
    }
}
