//! Construction-time builders.
//!
//! `build_fixed` places each entry straight into base slot
//! `hash mod BASE` and refuses any collision; nothing chains and the heap
//! region is never allocated. `build_chained` goes through `insert` and
//! always succeeds.
//!
//! `FixedHashMap` is the read-only result of a fixed build, meant to be
//! created once during initialization (for example inside `thread_local!`
//! or behind a `LazyLock<Mutex<_>>`) and queried afterward.

use crate::config::GrowthPolicy;
use crate::error::BuildError;
use crate::hybrid_hash_map::HybridHashMap;
use crate::key::TableKey;
use crate::raw_table::RawTable;
use core::borrow::Borrow;

impl<K, V, const BASE: usize> HybridHashMap<K, V, BASE>
where
    K: TableKey,
{
    /// Build a table with every entry in its own base slot.
    ///
    /// Fails with `BuildError::Collision` if two entries (equal or not)
    /// address the same base slot; no table is produced in that case.
    pub fn build_fixed<I>(entries: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut raw = RawTable::new(GrowthPolicy::default());
        for (key, value) in entries {
            raw.place_in_base(key, value)?;
        }
        log::trace!(
            "fixed build complete: {} entries in {} base slots",
            raw.len(),
            BASE
        );
        Ok(Self::from_raw(raw))
    }

    /// Build a table by inserting every entry in order; collisions chain and
    /// the heap grows as needed.
    pub fn build_chained<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        entries.into_iter().collect()
    }
}

/// Immutable, collision-free table produced by a fixed build.
///
/// Lookups only consult the base region, which is where every entry lives.
#[derive(Clone, Debug)]
pub struct FixedHashMap<K, V, const BASE: usize> {
    inner: HybridHashMap<K, V, BASE>,
}

impl<K, V, const BASE: usize> FixedHashMap<K, V, BASE>
where
    K: TableKey,
{
    pub fn build<I>(entries: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        HybridHashMap::build_fixed(entries).map(|inner| Self { inner })
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + TableKey,
    {
        self.inner.get_in_base(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + TableKey,
    {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub const fn base_capacity(&self) -> usize {
        BASE
    }

    /// Give up immutability; the returned table grows normally on insert.
    pub fn into_inner(self) -> HybridHashMap<K, V, BASE> {
        self.inner
    }
}

impl<K, V, const BASE: usize> From<FixedHashMap<K, V, BASE>> for HybridHashMap<K, V, BASE>
where
    K: TableKey,
{
    fn from(fixed: FixedHashMap<K, V, BASE>) -> Self {
        fixed.into_inner()
    }
}
