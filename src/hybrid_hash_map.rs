//! HybridHashMap: public table with a debug reentrancy guard around the
//! engine.

use crate::config::GrowthPolicy;
use crate::error::InvariantError;
use crate::key::TableKey;
use crate::raw_table::RawTable;
use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::fmt;

/// Chained hash table over a fixed base region of `BASE` slots plus a heap
/// region that grows on demand.
///
/// A key addresses slot `table_hash(key) mod (BASE + heap_capacity)`.
/// Colliding entries chain behind the slot's head. Once the live-entry count
/// would cross the policy's load-factor threshold, the heap region is
/// reallocated and every entry is rehashed.
///
/// `insert` always appends: inserting a key that is already present adds a
/// shadow entry behind the existing one, and `get`/`remove` see the oldest
/// entry first. Use `replace` to overwrite in place.
///
/// References returned by `get`/`get_mut` are valid until the next mutation;
/// the borrow checker enforces this. Any insert may trigger a growth event
/// that relocates every entry.
///
/// Single-threaded: the table is `Send` but not `Sync`. Share it behind a
/// `Mutex` or shard across independent tables.
pub struct HybridHashMap<K, V, const BASE: usize> {
    pub(crate) raw: RawTable<K, V, BASE>,
    reentrancy: DebugReentrancy,
}

impl<K, V, const BASE: usize> HybridHashMap<K, V, BASE> {
    /// Empty table with the default growth policy.
    pub fn new() -> Self {
        Self::with_policy(GrowthPolicy::default())
    }

    /// Empty table. `BASE` must be non-zero; a zero base capacity fails to
    /// compile once the type is instantiated.
    pub fn with_policy(policy: GrowthPolicy) -> Self {
        Self::from_raw(RawTable::new(policy))
    }

    pub(crate) fn from_raw(raw: RawTable<K, V, BASE>) -> Self {
        Self {
            raw,
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Total slot count: base plus heap.
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    pub const fn base_capacity(&self) -> usize {
        BASE
    }

    pub fn heap_capacity(&self) -> usize {
        self.raw.heap_capacity()
    }

    /// Live entries divided by total capacity.
    pub fn load_factor(&self) -> f64 {
        self.raw.len() as f64 / self.raw.capacity() as f64
    }

    pub fn policy(&self) -> GrowthPolicy {
        self.raw.policy()
    }

    /// Remove every entry. The heap region keeps its capacity.
    pub fn clear(&mut self) {
        let _g = self.reentrancy.enter("clear");
        self.raw.clear();
    }
}

impl<K, V, const BASE: usize> HybridHashMap<K, V, BASE>
where
    K: TableKey,
{
    /// Append `(key, value)` to the chain at its address. No duplicate
    /// check is made.
    pub fn insert(&mut self, key: K, value: V) {
        let _g = self.reentrancy.enter("insert");
        self.raw.insert(key, value);
    }

    /// Overwrite the value of the first entry equal to `key` and return the
    /// old value, or insert a new entry and return `None`.
    pub fn replace(&mut self, key: K, value: V) -> Option<V> {
        let _g = self.reentrancy.enter("replace");
        self.raw.replace(key, value)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + TableKey,
    {
        let _g = self.reentrancy.enter("get");
        self.raw.get(key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + TableKey,
    {
        let _g = self.reentrancy.enter("get_mut");
        self.raw.get_mut(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + TableKey,
    {
        let _g = self.reentrancy.enter("contains_key");
        self.raw.get(key).is_some()
    }

    /// Query only the base region, addressing with `hash mod BASE`.
    ///
    /// Meant for tables whose heap region has never been allocated (such as
    /// a freshly built fixed table), where it agrees with `get`. After a
    /// growth event it misses every entry that lives in the heap region and
    /// may miss base entries whose address changed.
    pub fn get_in_base<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + TableKey,
    {
        let _g = self.reentrancy.enter("get_in_base");
        self.raw.get_in_base(key)
    }

    /// Remove the first entry equal to `key`, returning the owned pair.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + TableKey,
    {
        let _g = self.reentrancy.enter("remove_entry");
        self.raw.remove_entry(key)
    }

    /// Remove the first entry equal to `key`, returning its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + TableKey,
    {
        let _g = self.reentrancy.enter("remove");
        self.raw.remove_entry(key).map(|(_, v)| v)
    }

    /// Remove the first entry equal to `key`; `true` if one was removed.
    pub fn erase<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + TableKey,
    {
        let _g = self.reentrancy.enter("erase");
        self.raw.remove_entry(key).is_some()
    }

    /// Walk every chain in both regions and check that the counter matches
    /// the reachable entries, every entry sits at its computed address, and
    /// every chain node is owned by exactly one link.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let _g = self.reentrancy.enter("check_invariants");
        self.raw.check_invariants()
    }
}

impl<K, V, const BASE: usize> Default for HybridHashMap<K, V, BASE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, const BASE: usize> Clone for HybridHashMap<K, V, BASE>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        let _g = self.reentrancy.enter("clone");
        Self::from_raw(self.raw.clone())
    }
}

impl<K, V, const BASE: usize> fmt::Debug for HybridHashMap<K, V, BASE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HybridHashMap")
            .field("len", &self.raw.len())
            .field("base_capacity", &BASE)
            .field("base_occupied", &self.raw.base_occupied())
            .field("heap_capacity", &self.raw.heap_capacity())
            .field("heap_occupied", &self.raw.heap_occupied())
            .field("policy", &self.raw.policy())
            .finish_non_exhaustive()
    }
}

impl<K, V, const BASE: usize> Extend<(K, V)> for HybridHashMap<K, V, BASE>
where
    K: TableKey,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        let _g = self.reentrancy.enter("extend");
        for (key, value) in iter {
            self.raw.insert(key, value);
        }
    }
}

impl<K, V, const BASE: usize> FromIterator<(K, V)> for HybridHashMap<K, V, BASE>
where
    K: TableKey,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}
