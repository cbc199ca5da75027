//! RawTable: the unguarded engine behind `HybridHashMap`.
//!
//! Owns both regions, the chain arena and the live-entry counter. Every
//! method assumes exclusive access; the public layer adds the reentrancy
//! guard around each call.

use crate::chain::{self, Arena, NodeId, Slot};
use crate::config::GrowthPolicy;
use crate::error::{BuildError, InvariantError};
use crate::key::TableKey;
use crate::region::{Address, BaseRegion, HeapRegion, Region};
use core::borrow::Borrow;
use core::mem;
use hashbrown::HashSet;

#[derive(Clone)]
pub(crate) struct RawTable<K, V, const BASE: usize> {
    base: BaseRegion<K, V, BASE>,
    heap: HeapRegion<K, V>,
    nodes: Arena<K, V>,
    len: usize,
    policy: GrowthPolicy,
}

/// `hash mod capacity`. `capacity` is never zero.
#[inline]
fn address_of(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

impl<K, V, const BASE: usize> RawTable<K, V, BASE> {
    const NONZERO_BASE: () = assert!(BASE > 0, "base region capacity must be non-zero");

    pub(crate) fn new(policy: GrowthPolicy) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NONZERO_BASE;
        Self {
            base: BaseRegion::new(),
            heap: HeapRegion::empty(),
            nodes: Arena::with_key(),
            len: 0,
            policy,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn heap_capacity(&self) -> usize {
        self.heap.capacity()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        BASE.saturating_add(self.heap.capacity())
    }

    #[inline]
    pub(crate) fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    pub(crate) fn base_occupied(&self) -> usize {
        self.base.occupied()
    }

    pub(crate) fn heap_occupied(&self) -> usize {
        self.heap.occupied()
    }

    /// Drop every entry. Heap capacity is kept.
    pub(crate) fn clear(&mut self) {
        self.base.clear();
        self.heap.clear();
        self.nodes.clear();
        self.len = 0;
    }

    fn slot(&self, addr: usize) -> &Slot<K, V> {
        match Address::route(addr, BASE) {
            Address::Base(i) => &self.base.slots()[i],
            Address::Heap(i) => &self.heap.slots()[i],
        }
    }

    fn slot_and_arena_mut(&mut self, addr: usize) -> (&mut Slot<K, V>, &mut Arena<K, V>) {
        let slot = match Address::route(addr, BASE) {
            Address::Base(i) => &mut self.base.slots_mut()[i],
            Address::Heap(i) => &mut self.heap.slots_mut()[i],
        };
        (slot, &mut self.nodes)
    }

    /// Every slot of both regions, in global address order.
    fn all_slots(&self) -> impl Iterator<Item = &Slot<K, V>> {
        self.base.slots().iter().chain(self.heap.slots().iter())
    }

    /// Move every live pair out, base region first, each chain in order.
    fn drain_all(&mut self) -> Vec<(K, V)> {
        let mut out = Vec::with_capacity(self.len);
        for slot in self.base.slots_mut() {
            chain::drain_into(slot, &mut self.nodes, &mut out);
        }
        for slot in self.heap.slots_mut() {
            chain::drain_into(slot, &mut self.nodes, &mut out);
        }
        debug_assert!(self.nodes.is_empty(), "orphaned chain nodes after drain");
        self.nodes.clear();
        out
    }
}

impl<K, V, const BASE: usize> RawTable<K, V, BASE>
where
    K: TableKey,
{
    #[inline]
    fn address<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized + TableKey,
    {
        address_of(key.table_hash(), self.capacity())
    }

    /// Append `(key, value)` to its addressed chain, growing first if the
    /// new entry would cross the load-factor threshold.
    pub(crate) fn insert(&mut self, key: K, value: V) {
        if self
            .policy
            .should_grow(self.len.saturating_add(1), self.capacity())
        {
            self.grow();
        }
        let addr = self.address(&key);
        let (slot, nodes) = self.slot_and_arena_mut(addr);
        chain::push_back(slot, nodes, key, value);
        self.len += 1;
    }

    /// Overwrite the first entry equal to `key`, or append a new one.
    pub(crate) fn replace(&mut self, key: K, value: V) -> Option<V> {
        let addr = self.address(&key);
        let (slot, nodes) = self.slot_and_arena_mut(addr);
        if let Some(existing) = chain::find_mut(slot, nodes, &key) {
            return Some(mem::replace(existing, value));
        }
        self.insert(key, value);
        None
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + TableKey,
    {
        let slot = self.slot(self.address(key));
        chain::find(slot, &self.nodes, key).map(|node| &node.value)
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + TableKey,
    {
        let addr = self.address(key);
        let (slot, nodes) = self.slot_and_arena_mut(addr);
        chain::find_mut(slot, nodes, key)
    }

    /// Lookup that addresses with `hash mod BASE` and only walks base
    /// chains. Entries placed in the heap region are not found.
    pub(crate) fn get_in_base<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + TableKey,
    {
        let slot = &self.base.slots()[address_of(key.table_hash(), BASE)];
        chain::find(slot, &self.nodes, key).map(|node| &node.value)
    }

    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + TableKey,
    {
        if self.len == 0 {
            return None;
        }
        let addr = self.address(key);
        let (slot, nodes) = self.slot_and_arena_mut(addr);
        let removed = chain::unlink(slot, nodes, key)?;
        self.len -= 1;
        Some(removed)
    }

    /// Place directly into the base slot `hash mod BASE`; fails if that slot
    /// is already occupied. Used only while building, before any heap exists.
    pub(crate) fn place_in_base(&mut self, key: K, value: V) -> Result<(), BuildError> {
        debug_assert_eq!(self.heap.capacity(), 0, "fixed placement after growth");
        let index = address_of(key.table_hash(), BASE);
        let slot = &mut self.base.slots_mut()[index];
        if slot.is_some() {
            log::trace!("fixed build rejected: base slot {index} already occupied");
            return Err(BuildError::Collision {
                slot: index,
                capacity: BASE,
            });
        }
        *slot = Some(chain::Node::new(key, value));
        self.len += 1;
        log::trace!("fixed build placed entry in base slot {index}");
        Ok(())
    }

    /// Replace the heap region and rehash every live entry.
    ///
    /// All pairs are moved into a temporary list, the heap is reallocated at
    /// its next capacity, the counter is reset and every pair goes back
    /// through `insert` under the new modulus. The base region keeps its
    /// capacity but is emptied and repopulated like any other slot.
    fn grow(&mut self) {
        let old_heap = self.heap.capacity();
        let new_heap = self.policy.next_heap_capacity(old_heap);
        let entries = self.drain_all();
        let moved = entries.len();

        self.heap = HeapRegion::with_capacity(new_heap);
        self.len = 0;
        for (key, value) in entries {
            self.insert(key, value);
        }

        log::debug!(
            "grew heap region {old_heap} -> {} slots, rehashed {moved} entries (capacity {})",
            self.heap.capacity(),
            self.capacity()
        );
        debug_assert_eq!(self.check_invariants(), Ok(()));
    }

    /// Walk every chain and verify the structural invariants.
    pub(crate) fn check_invariants(&self) -> Result<(), InvariantError> {
        let capacity = self.capacity();
        let mut seen: HashSet<NodeId> = HashSet::with_capacity(self.nodes.len());
        let mut reachable = 0usize;

        for (addr, slot) in self.all_slots().enumerate() {
            for (id, node) in chain::walk(slot, &self.nodes) {
                if let Some(id) = id {
                    if !seen.insert(id) {
                        return Err(InvariantError::SharedNode { slot: addr });
                    }
                }
                let expected = address_of(node.key.table_hash(), capacity);
                if expected != addr {
                    return Err(InvariantError::Misplaced {
                        slot: addr,
                        expected,
                    });
                }
                reachable += 1;
            }
        }

        if reachable != self.len {
            return Err(InvariantError::CountMismatch {
                counted: self.len,
                reachable,
            });
        }
        if seen.len() != self.nodes.len() {
            return Err(InvariantError::OrphanNode {
                orphans: self.nodes.len() - seen.len(),
            });
        }
        Ok(())
    }

    /// Entries reachable by walking every chain.
    #[cfg(test)]
    pub(crate) fn reachable(&self) -> usize {
        self.all_slots()
            .map(|slot| chain::len(slot, &self.nodes))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Key with a caller-chosen hash, to place entries in known slots.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct Pinned(u64, u32);

    impl TableKey for Pinned {
        fn table_hash(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn address_routes_into_heap_after_growth() {
        let mut t: RawTable<u64, u64, 2> = RawTable::new(GrowthPolicy::new());
        t.insert(1, 1);
        t.insert(2, 2); // grows to capacity 6; 2 lands in heap slot 0
        assert_eq!(t.capacity(), 6);
        assert_eq!(t.heap_occupied(), 1);
        t.insert(4, 4);
        assert_eq!(t.heap_occupied(), 2, "keys 2 and 4 address heap slots");
        assert_eq!(t.base_occupied(), 1);
        assert_eq!(t.check_invariants(), Ok(()));
    }

    #[test]
    fn grow_rehashes_chains_from_both_regions() {
        let mut t: RawTable<Pinned, u32, 1> =
            RawTable::new(GrowthPolicy::new().with_max_load_percent(100));
        // Everything chains into the single base slot until growth.
        t.insert(Pinned(0, 0), 0);
        assert_eq!(t.heap_capacity(), 0);
        t.insert(Pinned(1, 1), 1); // 2 > 1 slot: grow to 1 + 4
        t.insert(Pinned(6, 2), 2); // 6 mod 5 = 1, chains behind Pinned(1, 1)
        t.insert(Pinned(11, 3), 3);
        t.insert(Pinned(16, 4), 4);
        assert_eq!(t.capacity(), 5);
        assert_eq!(t.nodes.len(), 3);

        t.insert(Pinned(2, 5), 5); // 6 > 5: grow heap to 8, capacity 9
        assert_eq!(t.capacity(), 9);
        assert_eq!(t.len(), 6);
        assert_eq!(t.check_invariants(), Ok(()));
        for (h, v) in [(0, 0), (1, 1), (6, 2), (11, 3), (16, 4), (2, 5)] {
            assert_eq!(t.get(&Pinned(h, v)), Some(&v));
        }
    }

    #[test]
    fn remove_is_noop_on_empty_table() {
        let mut t: RawTable<u32, u32, 4> = RawTable::new(GrowthPolicy::new());
        assert_eq!(t.remove_entry(&3), None);
        assert_eq!(t.len(), 0);
    }

    #[test]
    fn failed_remove_keeps_counter() {
        let mut t: RawTable<u32, u32, 4> = RawTable::new(GrowthPolicy::new());
        t.insert(1, 10);
        assert_eq!(t.remove_entry(&5), None);
        assert_eq!(t.len(), 1);
        assert_eq!(t.remove_entry(&1), Some((1, 10)));
        assert_eq!(t.len(), 0);
    }

    #[test]
    fn place_in_base_rejects_occupied_slot() {
        let mut t: RawTable<u32, u32, 5> = RawTable::new(GrowthPolicy::new());
        assert_eq!(t.place_in_base(1, 100), Ok(()));
        assert_eq!(
            t.place_in_base(6, 600),
            Err(BuildError::Collision {
                slot: 1,
                capacity: 5
            })
        );
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn check_invariants_detects_bad_counter() {
        let mut t: RawTable<u32, u32, 4> = RawTable::new(GrowthPolicy::new());
        t.insert(1, 1);
        t.len = 3;
        assert_eq!(
            t.check_invariants(),
            Err(InvariantError::CountMismatch {
                counted: 3,
                reachable: 1
            })
        );
    }

    #[test]
    fn check_invariants_detects_orphans_and_misplacement() {
        let mut t: RawTable<u32, u32, 4> = RawTable::new(GrowthPolicy::new());
        t.insert(1, 1);
        let _orphan = t.nodes.insert(chain::Node::new(9, 9));
        assert_eq!(
            t.check_invariants(),
            Err(InvariantError::OrphanNode { orphans: 1 })
        );

        let mut t: RawTable<u32, u32, 4> = RawTable::new(GrowthPolicy::new());
        t.base.slots_mut()[0] = Some(chain::Node::new(3, 3));
        t.len = 1;
        assert_eq!(
            t.check_invariants(),
            Err(InvariantError::Misplaced {
                slot: 0,
                expected: 3
            })
        );
    }

    #[test]
    fn reachable_tracks_len() {
        let mut t: RawTable<u32, u32, 3> = RawTable::new(GrowthPolicy::new());
        for i in 0..50 {
            t.insert(i, i);
            assert_eq!(t.reachable(), t.len());
        }
        for i in (0..50).step_by(3) {
            t.remove_entry(&i);
            assert_eq!(t.reachable(), t.len());
        }
    }
}
