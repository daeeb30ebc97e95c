#![cfg(test)]

// Property tests for ChainedHashSet kept inside the crate so they can
// check anchors and cached hashes directly via `check_invariants`.

use crate::chained_hash_set::ChainedHashSet;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations so shrinking moves toward earlier keys and
// shorter op lists.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize),
    Remove(usize),
    Take(usize),
    Find(usize),
    Contains(String),
    Rehash(usize),
    Reserve(usize),
    Clear,
    Iterate,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => idx.clone().prop_map(OpI::Insert),
            2 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::Take),
            2 => idx.clone().prop_map(OpI::Find),
            1 => prop_oneof![contains_pool, "[a-z]{0,4}"].prop_map(OpI::Contains),
            1 => (0usize..24).prop_map(OpI::Rehash),
            1 => (0usize..24).prop_map(OpI::Reserve),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Drives `sut` and a std HashSet model through `ops`. After every op:
// - anchors name run heads, runs are contiguous, cached hashes are fresh;
// - len parity with the model and `len <= bucket_count`;
// - bucket counts move only as rehash/reserve/growth allow.
fn run_against_model<S>(
    mut sut: ChainedHashSet<Key, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher,
{
    let mut model: HashSet<Key> = HashSet::new();

    for op in ops {
        let buckets_before = sut.bucket_count();
        match op {
            OpI::Insert(i) => {
                let k = key_from(pool, i);
                let fresh = !model.contains(&k);
                prop_assert_eq!(sut.insert(k.clone()), fresh);
                model.insert(k);
                if !fresh {
                    prop_assert_eq!(sut.bucket_count(), buckets_before);
                }
                prop_assert!(sut.len() <= sut.bucket_count());
            }
            OpI::Remove(i) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.remove(&k), model.remove(&k));
                prop_assert_eq!(sut.bucket_count(), buckets_before);
            }
            OpI::Take(i) => {
                let k = key_from(pool, i);
                let taken = sut.take(k.0.as_str());
                prop_assert_eq!(taken, model.take(&k));
            }
            OpI::Find(i) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.contains(&k), model.contains(&k));
                prop_assert_eq!(sut.get(&k), model.get(&k));
            }
            OpI::Contains(s) => {
                let has_model = model.iter().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains(s.as_str()), has_model);
            }
            OpI::Rehash(n) => {
                let applies = n >= sut.len() && n != buckets_before;
                sut.rehash(n);
                let expected = if applies { n } else { buckets_before };
                prop_assert_eq!(sut.bucket_count(), expected);
            }
            OpI::Reserve(n) => {
                sut.reserve(n);
                prop_assert_eq!(sut.bucket_count(), buckets_before.max(n));
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.bucket_count(), buckets_before);
            }
            OpI::Iterate => {
                let listed: Vec<Key> = sut.iter().cloned().collect();
                prop_assert_eq!(listed.len(), sut.len());
                let s_keys: BTreeSet<_> = listed.into_iter().collect();
                let m_keys: BTreeSet<_> = model.iter().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
            }
        }

        sut.check_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_against_model(ChainedHashSet::new(), &pool, ops)?;
    }
}

// Collision variant: every key lands in one run, so anchors, hand-off and
// rebuilds all operate on a single long chain.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Low-entropy variant: few distinct hashes, so several multi-member runs
// sit next to each other and anchor hand-off must stop at run borders.
#[derive(Clone, Default)]
struct FirstByteBuildHasher;
struct FirstByteHasher(Option<u8>);
impl BuildHasher for FirstByteBuildHasher {
    type Hasher = FirstByteHasher;
    fn build_hasher(&self) -> Self::Hasher {
        FirstByteHasher(None)
    }
}
impl Hasher for FirstByteHasher {
    fn write(&mut self, bytes: &[u8]) {
        if self.0.is_none() {
            self.0 = bytes.first().copied();
        }
    }
    fn finish(&self) -> u64 {
        u64::from(self.0.unwrap_or(0) % 3)
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_against_model(ChainedHashSet::with_hasher(ConstBuildHasher), &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_with_clustered_hashes((pool, ops) in arb_scenario()) {
        run_against_model(ChainedHashSet::with_hasher(FirstByteBuildHasher), &pool, ops)?;
    }

    #[test]
    fn prop_range_construction_sizes_to_source(keys in proptest::collection::vec("[a-c]{0,2}", 0..20)) {
        let sut: ChainedHashSet<String> = keys.iter().cloned().collect();
        let distinct: HashSet<&String> = keys.iter().collect();
        prop_assert_eq!(sut.bucket_count(), keys.len());
        prop_assert_eq!(sut.len(), distinct.len());
        for k in &keys {
            prop_assert!(sut.contains(k));
        }
    }
}
