#![cfg(test)]

// Property tests for HybridHashMap kept inside the crate so the raw
// engine's counters can be inspected directly.

use crate::config::GrowthPolicy;
use crate::hybrid_hash_map::HybridHashMap;
use crate::key::TableKey;
use proptest::prelude::*;
use std::collections::{HashMap, VecDeque};

// Key whose hash keeps only a few low bits, so chains get long and most
// operations touch inner nodes rather than heads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Crowded(u16);

impl TableKey for Crowded {
    fn table_hash(&self) -> u64 {
        u64::from(self.0 % 3)
    }
}

#[derive(Clone, Debug)]
enum Op {
    Insert(u16, i32),
    Replace(u16, i32),
    Get(u16),
    Mutate(u16, i32),
    Remove(u16),
    Erase(u16),
    Clear,
}

fn arb_op(keys: u16) -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..keys, any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        2 => (0..keys, any::<i32>()).prop_map(|(k, v)| Op::Replace(k, v)),
        3 => (0..keys).prop_map(Op::Get),
        1 => (0..keys, any::<i32>()).prop_map(|(k, d)| Op::Mutate(k, d)),
        2 => (0..keys).prop_map(Op::Remove),
        2 => (0..keys).prop_map(Op::Erase),
        1 => Just(Op::Clear),
    ]
}

fn arb_policy() -> impl Strategy<Value = GrowthPolicy> {
    (50usize..=100, 1usize..=8).prop_map(|(pct, min)| {
        GrowthPolicy::new()
            .with_max_load_percent(pct)
            .with_min_heap_capacity(min)
    })
}

// Model: per-key queue of values in insertion order. `insert` pushes to the
// back; `get`/`remove`/`replace` act on the front.
type Model = HashMap<u16, VecDeque<i32>>;

fn model_len(model: &Model) -> usize {
    model.values().map(VecDeque::len).sum()
}

macro_rules! run_state_machine {
    ($sut:expr, $wrap:expr, $ops:expr) => {{
        let mut sut = $sut;
        let wrap = $wrap;
        let mut model: Model = HashMap::new();
        for op in $ops {
            let heap_before = sut.heap_capacity();
            match op {
                Op::Insert(k, v) => {
                    sut.insert(wrap(k), v);
                    model.entry(k).or_default().push_back(v);
                }
                Op::Replace(k, v) => {
                    let q = model.entry(k).or_default();
                    let expected = if let Some(front) = q.front_mut() {
                        Some(core::mem::replace(front, v))
                    } else {
                        q.push_back(v);
                        None
                    };
                    prop_assert_eq!(sut.replace(wrap(k), v), expected);
                }
                Op::Get(k) => {
                    let expected = model.get(&k).and_then(|q| q.front());
                    prop_assert_eq!(sut.get(&wrap(k)), expected);
                    prop_assert_eq!(sut.contains_key(&wrap(k)), expected.is_some());
                }
                Op::Mutate(k, d) => {
                    let expected = model.get_mut(&k).and_then(|q| q.front_mut());
                    match (sut.get_mut(&wrap(k)), expected) {
                        (Some(sv), Some(mv)) => {
                            *sv = sv.wrapping_add(d);
                            *mv = mv.wrapping_add(d);
                        }
                        (None, None) => {}
                        (s, m) => prop_assert!(false, "get_mut mismatch: {:?} vs {:?}", s, m),
                    }
                }
                Op::Remove(k) => {
                    let expected = model.get_mut(&k).and_then(VecDeque::pop_front);
                    prop_assert_eq!(sut.remove(&wrap(k)), expected);
                }
                Op::Erase(k) => {
                    let expected = model.get_mut(&k).and_then(VecDeque::pop_front);
                    prop_assert_eq!(sut.erase(&wrap(k)), expected.is_some());
                }
                Op::Clear => {
                    sut.clear();
                    model.clear();
                }
            }

            // Post-conditions after each op
            // 1) Counter, addressing and node ownership are consistent.
            prop_assert_eq!(sut.check_invariants(), Ok(()));
            // 2) Size parity with the model.
            prop_assert_eq!(sut.len(), model_len(&model));
            prop_assert_eq!(sut.is_empty(), model_len(&model) == 0);
            // 3) The heap never shrinks and the base never changes.
            prop_assert!(sut.heap_capacity() >= heap_before);
            prop_assert_eq!(sut.capacity(), sut.base_capacity() + sut.heap_capacity());
        }
        // Every key the model still holds is retrievable with its front value.
        for (k, q) in &model {
            prop_assert_eq!(sut.get(&wrap(*k)), q.front());
        }
    }};
}

// Property: state-machine equivalence against a multimap model, with
// identity-hashed integer keys and a random growth policy.
proptest! {
    #![proptest_config(ProptestConfig { cases: 96, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(
        policy in arb_policy(),
        ops in proptest::collection::vec(arb_op(48), 1..120),
    ) {
        run_state_machine!(
            HybridHashMap::<u16, i32, 3>::with_policy(policy),
            |k: u16| k,
            ops
        );
    }
}

// Property: same invariants when every key lands in one of three chains
// and chains grow long.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions(
        policy in arb_policy(),
        ops in proptest::collection::vec(arb_op(24), 1..120),
    ) {
        run_state_machine!(
            HybridHashMap::<Crowded, i32, 2>::with_policy(policy),
            Crowded,
            ops
        );
    }
}

// Property: every entry present before a growth-triggering insert is still
// retrievable with its value afterward, and growth happens exactly when the
// policy says so.
proptest! {
    #[test]
    fn prop_growth_preserves_membership(keys in proptest::collection::hash_set(any::<u32>(), 1..200)) {
        let mut sut: HybridHashMap<u32, u32, 4> = HybridHashMap::new();
        let mut present: Vec<u32> = Vec::new();
        for k in keys {
            let capacity = sut.capacity();
            let heap = sut.heap_capacity();
            let expect_growth = sut.policy().should_grow(sut.len() + 1, capacity);
            sut.insert(k, k.wrapping_mul(7));
            if expect_growth {
                prop_assert_eq!(sut.heap_capacity(), sut.policy().next_heap_capacity(heap));
            } else {
                prop_assert_eq!(sut.heap_capacity(), heap);
            }
            present.push(k);
            for &p in &present {
                prop_assert_eq!(sut.get(&p), Some(&p.wrapping_mul(7)));
            }
        }
        prop_assert_eq!(sut.raw.reachable(), sut.len());
    }
}
