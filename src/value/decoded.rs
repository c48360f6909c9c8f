use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

/// A value read back out of a record during replay.
///
/// Integers are widened to 64 bits; floats keep their captured width so they
/// print exactly as the captured value would.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DecodedValue {
    Int(i64),
    UInt(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Char(char),
    Text(Cow<'static, str>),
    Location {
        file: &'static str,
        line: u32,
    },
    Labeled {
        label: &'static str,
        value: Box<DecodedValue>,
    },
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedValue::Int(v) => write!(f, "{v}"),
            DecodedValue::UInt(v) => write!(f, "{v}"),
            DecodedValue::F32(v) => write!(f, "{v}"),
            DecodedValue::F64(v) => write!(f, "{v}"),
            DecodedValue::Bool(v) => write!(f, "{v}"),
            DecodedValue::Char(v) => write!(f, "{v}"),
            DecodedValue::Text(v) => f.write_str(v),
            DecodedValue::Location { file, line } => write!(f, "[{file}:{line}]"),
            DecodedValue::Labeled { label, value } => write!(f, "{label}={value}"),
        }
    }
}
