//! Error taxonomy.
//!
//! A missing key is never an error: lookups and removals report it as
//! `None`/`false`.

use thiserror::Error;

/// Failure of a construction-time build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Two input entries address the same base slot and the fixed builder
    /// does not chain.
    #[error("construction collision at base slot {slot} (base capacity {capacity})")]
    Collision { slot: usize, capacity: usize },
}

/// Structural inconsistency found by `HybridHashMap::check_invariants`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    #[error("live-entry counter is {counted} but {reachable} entries are reachable")]
    CountMismatch { counted: usize, reachable: usize },
    #[error("entry in slot {slot} addresses slot {expected}")]
    Misplaced { slot: usize, expected: usize },
    #[error("chain node reachable more than once (seen again from slot {slot})")]
    SharedNode { slot: usize },
    #[error("{orphans} chain node(s) are not reachable from any slot")]
    OrphanNode { orphans: usize },
}
