//! Value sequence shapes.
//!
//! A shape is a tuple of [`TraceValue`]s. Its kind list is known at compile
//! time and is what the registry hands out a decode handle for.

use crate::registry::ShapeRegistry;
use crate::value::{TraceValue, ValueKind};

mod sealed {
    pub trait Sealed {}
}

/// An ordered, statically typed sequence of values captured as one record.
///
/// Implemented for tuples of up to 12 values.
pub trait Shape: sealed::Sealed {
    /// The kinds of the values, in capture order.
    const KINDS: &'static [ValueKind];

    /// Total bytes the values occupy in a record payload.
    fn encoded_len(&self) -> usize;

    fn encode(&self, out: &mut Vec<u8>, registry: &ShapeRegistry);
}

impl sealed::Sealed for () {}

impl Shape for () {
    const KINDS: &'static [ValueKind] = &[];

    fn encoded_len(&self) -> usize {
        0
    }

    fn encode(&self, _out: &mut Vec<u8>, _registry: &ShapeRegistry) {}
}

macro_rules! impl_shape {
    ($($name:ident . $idx:tt),+) => {
        impl<$($name: TraceValue),+> sealed::Sealed for ($($name,)+) {}

        impl<$($name: TraceValue),+> Shape for ($($name,)+) {
            const KINDS: &'static [ValueKind] = &[$($name::KIND),+];

            #[inline]
            fn encoded_len(&self) -> usize {
                0 $(+ self.$idx.encoded_len())+
            }

            #[inline]
            fn encode(&self, out: &mut Vec<u8>, registry: &ShapeRegistry) {
                $(self.$idx.encode(out, registry);)+
            }
        }
    };
}

impl_shape!(A.0);
impl_shape!(A.0, B.1);
impl_shape!(A.0, B.1, C.2);
impl_shape!(A.0, B.1, C.2, D.3);
impl_shape!(A.0, B.1, C.2, D.3, E.4);
impl_shape!(A.0, B.1, C.2, D.3, E.4, F.5);
impl_shape!(A.0, B.1, C.2, D.3, E.4, F.5, G.6);
impl_shape!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7);
impl_shape!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8);
impl_shape!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8, J.9);
impl_shape!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8, J.9, K.10);
impl_shape!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8, J.9, K.10, L.11);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Labeled, Static};

    #[test]
    fn test_kinds_follow_declaration_order() {
        assert_eq!(
            <(u8, &str, f64)>::KINDS,
            &[ValueKind::U8, ValueKind::Str, ValueKind::F64]
        );
        assert!(<()>::KINDS.is_empty());
    }

    #[test]
    fn test_labeled_kind_nests() {
        assert_eq!(
            <(Labeled<i32>, Static)>::KINDS,
            &[ValueKind::Labeled(&ValueKind::I32), ValueKind::StaticStr]
        );
    }

    #[test]
    fn test_encoded_len_is_sum_of_values() {
        let registry = ShapeRegistry::new();
        let values = (1i32, 2u64, 'c', true);
        let mut out = Vec::new();
        values.encode(&mut out, &registry);
        assert_eq!(values.encoded_len(), 4 + 8 + 4 + 1);
        assert_eq!(out.len(), values.encoded_len());
    }
}
