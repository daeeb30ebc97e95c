// ChainedHashSet integration tests (public API only).
//
// Each test names the behavior it checks. Invariants leaned on throughout:
// - Load factor: after any insert, len() <= bucket_count().
// - Runs: members of one bucket are adjacent in iteration order and
//   bucket_size(b) equals the length of that block.
// - Capacity: only growth, reserve and rehash change bucket_count(); clear
//   and remove never do.
use chained_hashset::ChainedHashSet;
use std::collections::BTreeSet;
use std::hash::{BuildHasherDefault, Hasher};

#[derive(Default)]
struct IdentityHasher(u64);

impl Hasher for IdentityHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = self.0.rotate_left(8) ^ u64::from(b);
        }
    }
    fn write_u64(&mut self, n: u64) {
        self.0 = n;
    }
    fn finish(&self) -> u64 {
        self.0
    }
}

type IdentitySet = ChainedHashSet<u64, BuildHasherDefault<IdentityHasher>>;

// Verifies, through iteration and `bucket`, that every bucket is one
// contiguous block whose length matches `bucket_size`.
fn assert_runs_contiguous<S: std::hash::BuildHasher>(s: &ChainedHashSet<u64, S>) {
    let mut closed = BTreeSet::new();
    let mut current: Option<usize> = None;
    let mut run_len = 0;
    for k in s {
        let b = s.bucket(k).expect("bucket for member");
        if current != Some(b) {
            if let Some(prev) = current {
                assert_eq!(s.bucket_size(prev), run_len, "bucket_size({prev})");
                closed.insert(prev);
            }
            assert!(!closed.contains(&b), "bucket {b} appears in two runs");
            current = Some(b);
            run_len = 0;
        }
        run_len += 1;
    }
    if let Some(prev) = current {
        assert_eq!(s.bucket_size(prev), run_len, "bucket_size({prev})");
    }
}

// Test: first insert into a bucketless set.
// Verifies: one bucket allocated, element present.
#[test]
fn insert_into_empty_allocates_one_bucket() {
    let mut s = ChainedHashSet::new();
    assert_eq!(s.bucket_count(), 0);
    assert!(s.insert(5));
    assert_eq!(s.bucket_count(), 1);
    assert_eq!(s.len(), 1);
    assert!(s.contains(&5));
}

// Test: growth across several inserts.
// Verifies: table has room for all four keys; hits and misses resolve.
#[test]
fn four_inserts_grow_table() {
    let mut s = ChainedHashSet::new();
    for k in 1..=4 {
        s.insert(k);
        assert!(s.len() <= s.bucket_count());
    }
    assert!(s.bucket_count() >= 4);
    assert_eq!(s.len(), 4);
    assert!(s.contains(&3));
    assert!(!s.contains(&9));
}

// Test: erase after insert.
// Verifies: key gone, set empty, bucket count untouched.
#[test]
fn erase_keeps_bucket_count() {
    let mut s = ChainedHashSet::new();
    s.insert(10);
    let buckets = s.bucket_count();
    assert!(s.remove(&10));
    assert!(!s.contains(&10));
    assert_eq!(s.len(), 0);
    assert!(s.is_empty());
    assert_eq!(s.bucket_count(), buckets);
}

// Test: range construction with a duplicate.
// Verifies: duplicates collapse, table sized to the source length.
#[test]
fn range_construction_sizes_to_source_len() {
    let s: ChainedHashSet<i32> = vec![1, 1, 2, 3].into_iter().collect();
    assert_eq!(s.len(), 3);
    assert_eq!(s.bucket_count(), 4);
    assert_eq!(s.load_factor(), 0.75);

    let from_array: ChainedHashSet<i32> = ChainedHashSet::from([7, 7, 7]);
    assert_eq!(from_array.len(), 1);
    assert_eq!(from_array.bucket_count(), 3);

    let empty: ChainedHashSet<i32> = std::iter::empty().collect();
    assert_eq!(empty.bucket_count(), 0);
}

// Test: undersized rehash.
// Verifies: silently ignored; contents and bucket count unchanged.
#[test]
fn rehash_below_len_is_noop() {
    let mut s: ChainedHashSet<i32> = ChainedHashSet::new();
    s.extend([1, 2, 3]);
    let buckets = s.bucket_count();
    let before: BTreeSet<i32> = s.iter().copied().collect();
    s.rehash(0);
    assert_eq!(s.bucket_count(), buckets);
    assert_eq!(s.iter().copied().collect::<BTreeSet<_>>(), before);
}

// Test: rehash to the current bucket count.
// Verifies: no rebuild; iteration order is unchanged.
#[test]
fn rehash_to_same_count_is_noop() {
    let mut s = IdentitySet::with_buckets_and_hasher(8, Default::default());
    s.extend([3u64, 11, 4, 19]);
    let order: Vec<u64> = s.iter().copied().collect();
    s.rehash(8);
    assert_eq!(s.iter().copied().collect::<Vec<_>>(), order);
}

// Test: reserve never shrinks.
// Verifies: smaller requests ignored; larger requests grow exactly.
#[test]
fn reserve_is_monotonic() {
    let mut s = ChainedHashSet::with_buckets(8);
    s.insert("a");
    s.reserve(2);
    assert_eq!(s.bucket_count(), 8);
    s.reserve(8);
    assert_eq!(s.bucket_count(), 8);
    s.reserve(20);
    assert_eq!(s.bucket_count(), 20);
    assert!(s.contains("a"));
}

// Test: duplicate insert.
// Verifies: second insert reports false and changes nothing.
#[test]
fn duplicate_insert_is_idempotent() {
    let mut s = ChainedHashSet::new();
    assert!(s.insert("k".to_string()));
    let buckets = s.bucket_count();
    assert!(!s.insert("k".to_string()));
    assert_eq!(s.len(), 1);
    assert_eq!(s.bucket_count(), buckets);
    assert!(s.contains("k"));
}

// Test: absent keys and empty tables.
// Verifies: every lookup/erase form degrades to false/None/0.
#[test]
fn absent_and_empty_are_noops() {
    let mut s: ChainedHashSet<u32> = ChainedHashSet::new();
    assert!(!s.contains(&1));
    assert!(!s.remove(&1));
    assert_eq!(s.take(&1), None);
    assert_eq!(s.bucket(&1), None);
    assert_eq!(s.bucket_size(0), 0);
    assert_eq!(s.load_factor(), 0.0);

    s.insert(2);
    assert!(!s.remove(&1));
    assert_eq!(s.bucket_size(s.bucket_count()), 0);
    assert_eq!(s.bucket_size(usize::MAX), 0);
}

// Test: preallocated buckets.
// Verifies: inserts below the preallocated count never grow the table.
#[test]
fn with_buckets_preallocates() {
    let mut s = ChainedHashSet::with_buckets(16);
    assert_eq!(s.bucket_count(), 16);
    assert!(s.is_empty());
    for k in 0..16 {
        s.insert(k);
    }
    assert_eq!(s.bucket_count(), 16);
    assert_eq!(s.load_factor(), 1.0);
    s.insert(16);
    assert_eq!(s.bucket_count(), 32);
}

// Test: contiguity with a predictable hasher.
// Verifies: colliding keys share one block; bucket sizes add up.
#[test]
fn colliding_keys_form_one_run() {
    let mut s = IdentitySet::with_buckets_and_hasher(4, Default::default());
    s.extend([0u64, 1, 4, 5, 8, 2]);
    assert_eq!(s.bucket_count(), 8);
    assert_runs_contiguous(&s);
    let total: usize = (0..s.bucket_count()).map(|b| s.bucket_size(b)).sum();
    assert_eq!(total, s.len());
    assert_eq!(s.bucket(&8), Some(0));
    assert_eq!(s.bucket_size(0), 2);
}

// Test: runs survive interleaved erase and rehash.
#[test]
fn runs_stay_contiguous_through_erase_and_rehash() {
    let mut s = IdentitySet::default();
    for k in 0..40u64 {
        s.insert(k * 3);
    }
    assert_runs_contiguous(&s);
    for k in (0..40u64).step_by(4) {
        assert!(s.remove(&(k * 3)));
    }
    assert_runs_contiguous(&s);
    s.rehash(s.len());
    assert_eq!(s.bucket_count(), 30);
    assert_runs_contiguous(&s);
    s.rehash(7);
    assert_eq!(s.bucket_count(), 30, "7 < len must be ignored");
    s.reserve(101);
    assert_runs_contiguous(&s);
    assert_eq!(s.len(), 30);
}

// Test: clear.
// Verifies: empties the set, keeps bucket count, set stays usable.
#[test]
fn clear_keeps_capacity() {
    let mut s: ChainedHashSet<&str> = ChainedHashSet::new();
    s.extend(["a", "b", "c"]);
    let buckets = s.bucket_count();
    s.clear();
    assert!(s.is_empty());
    assert_eq!(s.bucket_count(), buckets);
    assert!(!s.contains("a"));
    for b in 0..buckets {
        assert_eq!(s.bucket_size(b), 0);
    }
    s.insert("d");
    assert!(s.contains("d"));
    assert_eq!(s.len(), 1);
}

// Test: clone independence.
// Verifies: mutating the copy leaves the original untouched.
#[test]
fn clone_is_deep() {
    let mut a: ChainedHashSet<i32> = ChainedHashSet::new();
    a.extend([1, 2, 3]);
    let mut b = a.clone();
    assert_eq!(a, b);
    assert_eq!(b.bucket_count(), a.bucket_count());
    b.remove(&2);
    b.insert(9);
    assert!(a.contains(&2));
    assert!(!a.contains(&9));
    assert_eq!(a.len(), 3);
    assert_ne!(a, b);
}

// Test: move semantics via mem::take.
// Verifies: destination holds everything; source is empty with zero buckets.
#[test]
fn take_leaves_source_empty() {
    let mut a: ChainedHashSet<i32> = ChainedHashSet::new();
    a.extend([1, 2, 3]);
    let buckets = a.bucket_count();
    let b = std::mem::take(&mut a);
    assert_eq!(a.len(), 0);
    assert_eq!(a.bucket_count(), 0);
    assert_eq!(b.len(), 3);
    assert_eq!(b.bucket_count(), buckets);
    assert!(b.contains(&2));
}

// Test: swap.
// Verifies: contents and bucket counts trade places.
#[test]
fn swap_exchanges_everything() {
    let mut a: ChainedHashSet<i32> = ChainedHashSet::with_buckets(3);
    a.insert(1);
    let mut b: ChainedHashSet<i32> = ChainedHashSet::with_buckets(10);
    b.extend([5, 6]);
    a.swap(&mut b);
    assert_eq!(a.bucket_count(), 10);
    assert_eq!(b.bucket_count(), 3);
    assert!(a.contains(&5) && a.contains(&6) && !a.contains(&1));
    assert!(b.contains(&1) && b.len() == 1);
}

// Test: equality ignores layout.
// Verifies: equal element sets compare equal across bucket counts.
#[test]
fn equality_is_set_equality() {
    let a: ChainedHashSet<i32> = [1, 2, 3].into_iter().collect();
    let mut b: ChainedHashSet<i32> = ChainedHashSet::with_buckets(64);
    b.extend([3, 2, 1]);
    assert_eq!(a, b);
    b.insert(4);
    assert_ne!(a, b);
}

// Test: iteration.
// Verifies: each element once, exact length, restartable, owned form.
#[test]
fn iteration_yields_each_element_once() {
    let mut s: ChainedHashSet<String> = ChainedHashSet::new();
    s.extend(["x".to_string(), "y".to_string(), "z".to_string()]);
    let it = s.iter();
    assert_eq!(it.len(), 3);
    let first: Vec<&String> = it.collect();
    let second: Vec<&String> = (&s).into_iter().collect();
    assert_eq!(first, second);
    let distinct: BTreeSet<&String> = first.iter().copied().collect();
    assert_eq!(distinct.len(), 3);

    let owned: BTreeSet<String> = s.into_iter().collect();
    let expected: BTreeSet<String> = ["x", "y", "z"].iter().map(|k| k.to_string()).collect();
    assert_eq!(owned, expected);
}

// Test: extend by reference and Debug rendering.
#[test]
fn extend_by_ref_and_debug() {
    let mut s: ChainedHashSet<u8> = ChainedHashSet::new();
    let src = [4u8, 4, 2];
    s.extend(&src);
    assert_eq!(s.len(), 2);
    let rendered = format!("{:?}", s);
    assert!(rendered.starts_with('{') && rendered.ends_with('}'));
    assert!(rendered.contains('4') && rendered.contains('2'));
}
