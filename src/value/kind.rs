use std::borrow::Cow;
use std::mem::size_of;

use crate::error::Corruption;
use crate::record::PayloadCursor;
use crate::registry::{ShapeRegistry, STRING_ID_WIDTH};
use crate::value::DecodedValue;

/// The closed set of value kinds a record can hold.
///
/// A record's shape is the ordered list of kinds it was captured with. The
/// shape selects the decode handle and fully describes the payload layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Bool,
    Char,
    /// Text copied into the record behind a native `usize` length prefix.
    Str,
    /// Interned `&'static str`, stored as a 4-byte string id.
    StaticStr,
    /// Call-site file (interned) and line.
    Location,
    /// Zero-width marker between the area tag and the captured values.
    Separator,
    /// A `&'static str` label followed by a value of the inner kind.
    Labeled(&'static ValueKind),
}

impl ValueKind {
    /// Encoded width in bytes, or `None` for kinds whose width depends on the
    /// captured value.
    pub const fn fixed_width(&self) -> Option<usize> {
        match self {
            ValueKind::I8 | ValueKind::U8 | ValueKind::Bool => Some(1),
            ValueKind::I16 | ValueKind::U16 => Some(2),
            ValueKind::I32 | ValueKind::U32 | ValueKind::F32 | ValueKind::Char => Some(4),
            ValueKind::I64 | ValueKind::U64 | ValueKind::F64 => Some(8),
            ValueKind::Isize | ValueKind::Usize => Some(size_of::<usize>()),
            ValueKind::Str => None,
            ValueKind::StaticStr => Some(STRING_ID_WIDTH),
            ValueKind::Location => Some(STRING_ID_WIDTH + size_of::<u32>()),
            ValueKind::Separator => Some(0),
            ValueKind::Labeled(inner) => match inner.fixed_width() {
                Some(width) => Some(STRING_ID_WIDTH + width),
                None => None,
            },
        }
    }

    /// Decode one value of this kind from the cursor.
    pub(crate) fn decode(
        &self,
        cursor: &mut PayloadCursor<'_>,
        registry: &ShapeRegistry,
    ) -> Result<DecodedValue, Corruption> {
        let value = match self {
            ValueKind::I8 => DecodedValue::Int(i8::from_ne_bytes(cursor.read_array()?).into()),
            ValueKind::I16 => DecodedValue::Int(i16::from_ne_bytes(cursor.read_array()?).into()),
            ValueKind::I32 => DecodedValue::Int(i32::from_ne_bytes(cursor.read_array()?).into()),
            ValueKind::I64 => DecodedValue::Int(i64::from_ne_bytes(cursor.read_array()?)),
            ValueKind::Isize => {
                DecodedValue::Int(isize::from_ne_bytes(cursor.read_array()?) as i64)
            }
            ValueKind::U8 => DecodedValue::UInt(u8::from_ne_bytes(cursor.read_array()?).into()),
            ValueKind::U16 => DecodedValue::UInt(u16::from_ne_bytes(cursor.read_array()?).into()),
            ValueKind::U32 => DecodedValue::UInt(u32::from_ne_bytes(cursor.read_array()?).into()),
            ValueKind::U64 => DecodedValue::UInt(u64::from_ne_bytes(cursor.read_array()?)),
            ValueKind::Usize => {
                DecodedValue::UInt(usize::from_ne_bytes(cursor.read_array()?) as u64)
            }
            ValueKind::F32 => DecodedValue::F32(f32::from_ne_bytes(cursor.read_array()?)),
            ValueKind::F64 => DecodedValue::F64(f64::from_ne_bytes(cursor.read_array()?)),
            ValueKind::Bool => match u8::from_ne_bytes(cursor.read_array()?) {
                0 => DecodedValue::Bool(false),
                1 => DecodedValue::Bool(true),
                byte => return Err(Corruption::InvalidBool(byte)),
            },
            ValueKind::Char => {
                let raw = u32::from_ne_bytes(cursor.read_array()?);
                let c = char::from_u32(raw).ok_or(Corruption::InvalidChar(raw))?;
                DecodedValue::Char(c)
            }
            ValueKind::Str => {
                let len = usize::from_ne_bytes(cursor.read_array()?);
                let bytes = cursor.take(len)?;
                let text = std::str::from_utf8(bytes).map_err(|_| Corruption::InvalidUtf8)?;
                DecodedValue::Text(Cow::Owned(text.to_string()))
            }
            ValueKind::StaticStr => DecodedValue::Text(Cow::Borrowed(read_interned(cursor, registry)?)),
            ValueKind::Location => {
                let file = read_interned(cursor, registry)?;
                let line = u32::from_ne_bytes(cursor.read_array()?);
                DecodedValue::Location { file, line }
            }
            ValueKind::Separator => DecodedValue::Text(Cow::Borrowed(crate::SEPARATOR)),
            ValueKind::Labeled(inner) => {
                let label = read_interned(cursor, registry)?;
                let value = inner.decode(cursor, registry)?;
                DecodedValue::Labeled {
                    label,
                    value: Box::new(value),
                }
            }
        };
        Ok(value)
    }
}

fn read_interned(
    cursor: &mut PayloadCursor<'_>,
    registry: &ShapeRegistry,
) -> Result<&'static str, Corruption> {
    let id = u32::from_ne_bytes(cursor.read_array()?);
    registry.resolve(id).ok_or(Corruption::UnknownString(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_widths() {
        assert_eq!(ValueKind::U8.fixed_width(), Some(1));
        assert_eq!(ValueKind::I16.fixed_width(), Some(2));
        assert_eq!(ValueKind::F32.fixed_width(), Some(4));
        assert_eq!(ValueKind::Char.fixed_width(), Some(4));
        assert_eq!(ValueKind::F64.fixed_width(), Some(8));
        assert_eq!(ValueKind::Usize.fixed_width(), Some(size_of::<usize>()));
        assert_eq!(ValueKind::Separator.fixed_width(), Some(0));
        assert_eq!(ValueKind::Str.fixed_width(), None);
    }

    #[test]
    fn test_labeled_width_follows_inner() {
        assert_eq!(ValueKind::Labeled(&ValueKind::I32).fixed_width(), Some(8));
        assert_eq!(ValueKind::Labeled(&ValueKind::Str).fixed_width(), None);
    }

    #[test]
    fn test_decode_rejects_bad_bool() {
        let registry = ShapeRegistry::new();
        let bytes = [7u8];
        let mut cursor = PayloadCursor::new(&bytes);
        assert_eq!(
            ValueKind::Bool.decode(&mut cursor, &registry),
            Err(Corruption::InvalidBool(7))
        );
    }

    #[test]
    fn test_decode_rejects_surrogate_char() {
        let registry = ShapeRegistry::new();
        let bytes = 0xD800u32.to_ne_bytes();
        let mut cursor = PayloadCursor::new(&bytes);
        assert_eq!(
            ValueKind::Char.decode(&mut cursor, &registry),
            Err(Corruption::InvalidChar(0xD800))
        );
    }

    #[test]
    fn test_decode_unknown_interned_id() {
        let registry = ShapeRegistry::new();
        let bytes = 42u32.to_ne_bytes();
        let mut cursor = PayloadCursor::new(&bytes);
        assert_eq!(
            ValueKind::StaticStr.decode(&mut cursor, &registry),
            Err(Corruption::UnknownString(42))
        );
    }

    #[test]
    fn test_decode_str_with_oversized_length() {
        let registry = ShapeRegistry::new();
        let mut bytes = usize::MAX.to_ne_bytes().to_vec();
        bytes.extend_from_slice(b"abc");
        let mut cursor = PayloadCursor::new(&bytes);
        assert!(matches!(
            ValueKind::Str.decode(&mut cursor, &registry),
            Err(Corruption::Truncated { available: 3, .. })
        ));
    }
}
