//! The two slot regions that make up one address space.
//!
//! Addresses `0..BASE` land in the base region, an inline array that is
//! never reallocated. Addresses `BASE..BASE + heap` land in the heap region,
//! which is replaced wholesale on every growth event.

use crate::chain::Slot;

/// Common view over a region's slots.
pub(crate) trait Region<K, V> {
    fn slots(&self) -> &[Slot<K, V>];
    fn slots_mut(&mut self) -> &mut [Slot<K, V>];

    #[inline]
    fn capacity(&self) -> usize {
        self.slots().len()
    }

    /// Drop every entry head. Arena nodes are released by the caller.
    fn clear(&mut self) {
        for slot in self.slots_mut() {
            *slot = None;
        }
    }

    fn occupied(&self) -> usize {
        self.slots().iter().filter(|s| s.is_some()).count()
    }
}

/// Fixed-capacity region stored inline in the table.
#[derive(Debug, Clone)]
pub(crate) struct BaseRegion<K, V, const BASE: usize> {
    slots: [Slot<K, V>; BASE],
}

impl<K, V, const BASE: usize> BaseRegion<K, V, BASE> {
    pub(crate) fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
        }
    }
}

impl<K, V, const BASE: usize> Region<K, V> for BaseRegion<K, V, BASE> {
    #[inline]
    fn slots(&self) -> &[Slot<K, V>] {
        &self.slots
    }

    #[inline]
    fn slots_mut(&mut self) -> &mut [Slot<K, V>] {
        &mut self.slots
    }
}

/// Heap-allocated region; empty until the first growth event.
#[derive(Debug, Clone)]
pub(crate) struct HeapRegion<K, V> {
    slots: Box<[Slot<K, V>]>,
}

impl<K, V> HeapRegion<K, V> {
    pub(crate) fn empty() -> Self {
        Self::with_capacity(0)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
        }
    }
}

impl<K, V> Region<K, V> for HeapRegion<K, V> {
    #[inline]
    fn slots(&self) -> &[Slot<K, V>] {
        &self.slots
    }

    #[inline]
    fn slots_mut(&mut self) -> &mut [Slot<K, V>] {
        &mut self.slots
    }
}

/// A global address resolved to its region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Address {
    Base(usize),
    Heap(usize),
}

impl Address {
    /// Route a global address given the base capacity.
    #[inline]
    pub(crate) fn route(addr: usize, base: usize) -> Self {
        if addr < base {
            Address::Base(addr)
        } else {
            Address::Heap(addr - base)
        }
    }
}
