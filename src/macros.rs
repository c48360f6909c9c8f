//! Call-site sugar.

/// Capture a record into a [`TraceBuffer`](crate::TraceBuffer).
///
/// Expands to `buffer.capture(area, (values...,))` and evaluates to its
/// `Result`.
///
/// ```
/// use tracebuf::{lval, record, TraceBuffer};
///
/// let buffer = TraceBuffer::new();
/// let x = 4;
/// let f = 3.1415f32;
/// record!(buffer, "AreaA", "hello").unwrap();
/// record!(buffer, "AreaA", lval!(x), lval!(f)).unwrap();
///
/// let mut lines: Vec<String> = Vec::new();
/// buffer.replay(&mut lines).unwrap();
/// assert_eq!(lines, ["AreaA -- hello", "AreaA -- x=4 f=3.1415"]);
/// ```
#[macro_export]
macro_rules! record {
    ($buffer:expr, $area:expr $(, $value:expr)* $(,)?) => {
        $buffer.capture($area, ($($value,)*))
    };
}

/// Like [`record!`], with the call site's `[file:line]` as the first value.
///
/// ```
/// use tracebuf::{record_here, TraceBuffer};
///
/// let buffer = TraceBuffer::new();
/// record_here!(buffer, "Area", 1u8).unwrap();
///
/// let mut lines: Vec<String> = Vec::new();
/// buffer.replay(&mut lines).unwrap();
/// assert!(lines[0].starts_with("Area -- ["));
/// assert!(lines[0].ends_with("] 1"));
/// ```
#[macro_export]
macro_rules! record_here {
    ($buffer:expr, $area:expr $(, $value:expr)* $(,)?) => {
        $buffer.capture(
            $area,
            ($crate::Location::new(file!(), line!()), $($value,)*),
        )
    };
}

/// Label a value with its own expression text, rendering as `expr=value`.
#[macro_export]
macro_rules! lval {
    ($value:expr) => {
        $crate::Labeled::new(stringify!($value), $value)
    };
}
