//! hybrid-hashmap: a single-threaded chained hash table whose address
//! space is split between a fixed inline base region and a heap region that
//! grows on demand.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small hash table with a compile-time-sized inline region that
//!   is never reallocated, plus heap capacity added only when the load
//!   factor demands it.
//! - Layers:
//!   - chain: one slot's collision chain. The head is stored inline in the
//!     slot; successors live in a `SlotMap` arena linked by `NodeId`.
//!   - region: `BaseRegion` (`[Slot; BASE]`) and `HeapRegion`
//!     (`Box<[Slot]>`), joined into one address space by `Address::route`.
//!   - RawTable<K, V, BASE>: the engine. Routing, insert/lookup/removal,
//!     growth and invariant checking, with no guards.
//!   - HybridHashMap<K, V, BASE>: public API; wraps RawTable with a
//!     debug-only reentrancy guard.
//!   - FixedHashMap<K, V, BASE>: read-only result of a collision-free
//!     construction-time build.
//!
//! Addressing
//! - A key addresses `table_hash(key) mod (BASE + heap_capacity)`.
//!   Addresses below `BASE` select a base slot, the rest select heap slot
//!   `addr - BASE`.
//! - The modulus changes only on growth, and growth rehashes everything, so
//!   every entry always sits in the chain of its computed address.
//!
//! Growth
//! - Before placing entry `n`, if `n * 100 > capacity * max_load_percent`
//!   the heap is replaced: all live pairs are moved into a temporary list,
//!   the heap is reallocated (minimum size first, doubling afterward), the
//!   counter is reset and every pair is re-inserted under the new modulus.
//! - The base region's capacity never changes. Nothing ever shrinks.
//!
//! Ownership of chain nodes
//! - Each arena node is owned by exactly one link: a slot head's `next` or
//!   another node's `next`. Unlinking moves the removed node's `next` into
//!   its predecessor. Removing a head with a successor promotes the
//!   successor into the slot and frees its arena entry.
//! - `check_invariants` verifies counter, addressing and single ownership.
//!
//! Empty slots
//! - Slots are `Option<Node>`. `TableKey::is_empty_sentinel` is part of the
//!   key contract but the table never consults it, so sentinel values such
//!   as `0` or `""` are ordinary keys here.
//!
//! Duplicate keys
//! - `insert` always appends; a repeated key shadows nothing and is found
//!   after the older entry. `replace` overwrites the first match.
//!
//! Constraints
//! - Single-threaded: no locks or atomics. Tables are `Send`, not `Sync`.
//! - Lookups hand out plain references whose lifetime ends at the next
//!   mutation; growth relocates every entry.
//! - Reentrancy: key callbacks must not call back into the table that is
//!   running them. Debug builds panic if they do.
//! - No iteration API, no persistence, no shrinking.

mod chain;
mod config;
mod error;
mod fixed;
mod hybrid_hash_map;
mod hybrid_hash_map_proptest;
mod key;
mod raw_table;
mod reentrancy;
mod region;

// Public surface
pub use config::GrowthPolicy;
pub use error::{BuildError, InvariantError};
pub use fixed::FixedHashMap;
pub use hybrid_hash_map::HybridHashMap;
pub use key::{str_hash, TableKey};
