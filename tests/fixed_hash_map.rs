// Construction-time builders and FixedHashMap.
//
// - build_fixed: one entry per base slot, collision is a hard error and
//   produces no table.
// - build_chained: delegates to insert, always succeeds.
// - FixedHashMap: read-only, built once at initialization.
use hybrid_hashmap::{BuildError, FixedHashMap, HybridHashMap};

// Test: {1 -> 100, 2 -> 200, 3 -> 300} at base capacity 5 does not collide.
#[test]
fn fixed_build_without_collisions() {
    let m: HybridHashMap<u32, u32, 5> =
        HybridHashMap::build_fixed([(1, 100), (2, 200), (3, 300)]).expect("no collision");
    assert_eq!(m.get(&2), Some(&200));
    assert_eq!(m.get(&1), Some(&100));
    assert_eq!(m.get(&3), Some(&300));
    assert_eq!(m.len(), 3);
    assert_eq!(m.heap_capacity(), 0);
}

// Test: two keys with equal hash mod base capacity fail the build.
#[test]
fn fixed_build_detects_collision() {
    let err = HybridHashMap::<u32, &str, 4>::build_fixed([(3, "a"), (8, "b"), (7, "c")])
        .expect_err("7 and 3 share slot 3");
    assert_eq!(
        err,
        BuildError::Collision {
            slot: 3,
            capacity: 4
        }
    );
    assert_eq!(
        err.to_string(),
        "construction collision at base slot 3 (base capacity 4)"
    );
}

// Test: the same colliding input builds fine through the chaining path.
#[test]
fn chained_build_accepts_collisions() {
    let m: HybridHashMap<u32, &str, 4> =
        HybridHashMap::build_chained([(3, "a"), (8, "b"), (7, "c")]);
    assert_eq!(m.get(&3), Some(&"a"));
    assert_eq!(m.get(&8), Some(&"b"));
    assert_eq!(m.get(&7), Some(&"c"));
    assert_eq!(m.check_invariants(), Ok(()));
}

// Test: a fixed table converted into a regular one grows on later inserts,
// and its original entries survive the rehash.
#[test]
fn fixed_table_can_be_grown_after_conversion() {
    let f: FixedHashMap<u32, u32, 4> =
        FixedHashMap::build([(0, 0), (1, 10), (2, 20), (3, 30)]).expect("dense but unique");
    assert_eq!(f.len(), 4);
    let mut m = f.into_inner();
    assert_eq!(m.heap_capacity(), 0);
    m.insert(4, 40);
    assert!(m.heap_capacity() > 0);
    for k in 0..5 {
        assert_eq!(m.get(&k), Some(&(k * 10)));
    }
    assert_eq!(m.check_invariants(), Ok(()));
}

// Test: build-once initialization of a process-wide lookup table.
#[test]
fn thread_local_build_once() {
    thread_local! {
        static HTTP_STATUS: FixedHashMap<&'static str, u16, 17> = FixedHashMap::build([
            ("ok", 200),
            ("created", 201),
            ("not-found", 404),
        ])
        .expect("status table is collision-free");
    }

    HTTP_STATUS.with(|t| {
        assert_eq!(t.get("ok"), Some(&200));
        assert_eq!(t.get("not-found"), Some(&404));
        assert!(!t.contains_key("teapot"));
        assert_eq!(t.len(), 3);
    });
}

// Test: an empty input builds an empty table.
#[test]
fn fixed_build_empty() {
    let f: FixedHashMap<u8, u8, 1> = FixedHashMap::build(std::iter::empty()).unwrap();
    assert!(f.is_empty());
    assert_eq!(f.get(&0), None);
}
