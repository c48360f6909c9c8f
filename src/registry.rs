//! Decode handle and interned string assignment.
//!
//! Every distinct value sequence shape captured into a buffer gets a small
//! integer handle, and every `&'static str` stored by reference gets a small
//! integer id. Replay resolves both through the same registry, so nothing in a
//! record is ever interpreted as a memory address.
//!
//! # Thread Safety
//!
//! Assignment uses an `AtomicU32` counter behind a `DashMap` entry, so the
//! counter only advances when a new key is inserted. Handles and ids are dense
//! and start at 1; 0 is never assigned.
//!
//! Handles are only meaningful to the registry that assigned them. They are
//! never written anywhere but the owning buffer.

use std::sync::atomic::{AtomicU32, Ordering};

use dashmap::DashMap;

use crate::shape::Shape;
use crate::value::ValueKind;

/// Width of an interned string id in a record.
pub const STRING_ID_WIDTH: usize = std::mem::size_of::<u32>();

/// Initial capacity for the shape maps. Call sites rarely number in the thousands.
const INITIAL_SHAPE_CAPACITY: usize = 64;

/// Initial capacity for the string maps.
const INITIAL_STRING_CAPACITY: usize = 256;

/// Table of decode handles and interned strings for one trace buffer.
#[derive(Debug)]
pub struct ShapeRegistry {
    next_handle: AtomicU32,
    handles: DashMap<&'static [ValueKind], u32>,
    shapes: DashMap<u32, &'static [ValueKind]>,

    next_string: AtomicU32,
    string_ids: DashMap<&'static str, u32>,
    strings: DashMap<u32, &'static str>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self {
            next_handle: AtomicU32::new(1),
            handles: DashMap::with_capacity(INITIAL_SHAPE_CAPACITY),
            shapes: DashMap::with_capacity(INITIAL_SHAPE_CAPACITY),
            next_string: AtomicU32::new(1),
            string_ids: DashMap::with_capacity(INITIAL_STRING_CAPACITY),
            strings: DashMap::with_capacity(INITIAL_STRING_CAPACITY),
        }
    }

    /// Get or assign the decode handle for shape `S`.
    pub fn register<S: Shape>(&self) -> u32 {
        self.handle_for(S::KINDS)
    }

    /// Get or assign the decode handle for a kind list.
    pub fn handle_for(&self, kinds: &'static [ValueKind]) -> u32 {
        if let Some(handle) = self.handles.get(kinds) {
            return *handle;
        }
        *self.handles.entry(kinds).or_insert_with(|| {
            let handle = self.next_handle.fetch_add(1, Ordering::Relaxed);
            // Published before the entry lock is released, so a record carrying
            // this handle can never be replayed before the lookup exists.
            self.shapes.insert(handle, kinds);
            tracing::debug!("Assigned decode handle {} to shape {:?}", handle, kinds);
            handle
        })
    }

    /// The kind list a handle decodes as, if this registry assigned it.
    pub fn lookup(&self, handle: u32) -> Option<&'static [ValueKind]> {
        self.shapes.get(&handle).as_deref().copied()
    }

    /// Get or assign the id for a static string.
    pub fn intern(&self, s: &'static str) -> u32 {
        if let Some(id) = self.string_ids.get(s) {
            return *id;
        }
        *self.string_ids.entry(s).or_insert_with(|| {
            let id = self.next_string.fetch_add(1, Ordering::Relaxed);
            self.strings.insert(id, s);
            tracing::debug!("Interned string {:?} as id {}", s, id);
            id
        })
    }

    /// The string an id was assigned to, if this registry assigned it.
    pub fn resolve(&self, id: u32) -> Option<&'static str> {
        self.strings.get(&id).as_deref().copied()
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn string_count(&self) -> usize {
        self.strings.len()
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_start_at_one() {
        let registry = ShapeRegistry::new();
        assert_eq!(registry.register::<(u8,)>(), 1);
        assert_eq!(registry.register::<(u8, u8)>(), 2);
        assert_eq!(registry.register::<(u8,)>(), 1);
        assert_eq!(registry.lookup(0), None);
    }

    #[test]
    fn test_lookup_returns_registered_kinds() {
        let registry = ShapeRegistry::new();
        let handle = registry.register::<(i32, &str)>();
        assert_eq!(
            registry.lookup(handle),
            Some(&[ValueKind::I32, ValueKind::Str][..])
        );
        assert_eq!(registry.lookup(handle + 1), None);
    }

    #[test]
    fn test_same_kinds_share_handle() {
        // Two distinct tuple types with the same kind list decode identically.
        let registry = ShapeRegistry::new();
        let a = registry.register::<(&'static str,)>();
        let b = registry.register::<(&str,)>();
        assert_eq!(a, b);
        assert_eq!(registry.shape_count(), 1);
    }

    #[test]
    fn test_intern_resolve() {
        let registry = ShapeRegistry::new();
        let id = registry.intern("AreaA");
        assert_eq!(registry.intern("AreaA"), id);
        assert_ne!(registry.intern("AreaB"), id);
        assert_eq!(registry.resolve(id), Some("AreaA"));
        assert_eq!(registry.resolve(0), None);
        assert_eq!(registry.string_count(), 2);
    }

    #[test]
    fn test_concurrent_registration() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(ShapeRegistry::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                (
                    registry.register::<(u8,)>(),
                    registry.register::<(u16,)>(),
                    registry.register::<(u32,)>(),
                    registry.intern("shared"),
                )
            }));
        }

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));

        // Dense assignment: exactly three shapes with handles 1..=3.
        let mut assigned = vec![results[0].0, results[0].1, results[0].2];
        assigned.sort();
        assert_eq!(assigned, vec![1, 2, 3]);
        assert_eq!(registry.shape_count(), 3);
    }
}
