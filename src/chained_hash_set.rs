//! ChainedHashSet: separate chaining over one shared sequence.
//!
//! Every element lives in a single [`Sequence`]; bucket `i` is the
//! contiguous run of nodes whose cached hash maps to `i`, and the
//! `BucketTable` remembers where each run starts. New members are linked
//! in front of their run's anchor (or at the front of the whole sequence
//! for an empty bucket) and become the new anchor, which keeps every run
//! contiguous without per-bucket storage.

use crate::bucket_table::{bucket_for, BucketTable};
use crate::reentrancy::DebugReentrancy;
use crate::sequence::{self, Position, Sequence};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use core::mem;
use hashbrown::hash_map::DefaultHashBuilder;

#[derive(Clone, Debug)]
struct Entry<T> {
    key: T,
    hash: u64,
}

/// Sequence plus anchors. Works only from cached hashes; callers supply
/// key comparison, so nothing here runs user `Hash` code.
#[derive(Clone)]
struct Chains<T> {
    seq: Sequence<Entry<T>>,
    buckets: BucketTable,
}

impl<T> Chains<T> {
    fn with_buckets(bucket_count: usize) -> Self {
        Self {
            seq: Sequence::new(),
            buckets: BucketTable::with_len(bucket_count),
        }
    }

    fn len(&self) -> usize {
        self.seq.len()
    }

    fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Nodes of bucket `bucket`'s run, anchor first.
    fn run(&self, bucket: usize) -> impl Iterator<Item = (Position, &Entry<T>)> + '_ {
        let bucket_count = self.bucket_count();
        self.buckets
            .anchor(bucket)
            .into_iter()
            .flat_map(move |anchor| self.seq.iter_from(anchor))
            .take_while(move |(_, e)| bucket_for(e.hash, bucket_count) == Some(bucket))
    }

    fn bucket_size(&self, bucket: usize) -> usize {
        self.run(bucket).count()
    }

    fn find(
        &self,
        hash: u64,
        mut is_match: impl FnMut(&T) -> bool,
    ) -> Option<(Position, &Entry<T>)> {
        let bucket = self.buckets.index_of(hash)?;
        self.run(bucket)
            .find(|(_, e)| e.hash == hash && is_match(&e.key))
    }

    /// Link a key known to be absent, growing first if the table is full.
    fn insert_new(&mut self, hash: u64, key: T) {
        if self.len() >= self.bucket_count() {
            let grown = match self.bucket_count() {
                0 => 1,
                n => n * 2,
            };
            self.reserve(grown);
        }
        let Some(bucket) = self.buckets.index_of(hash) else {
            unreachable!("growth leaves at least one bucket");
        };
        link_as_anchor(&mut self.seq, &mut self.buckets, bucket, Entry { key, hash });
    }

    /// Unlink the node at `pos`, handing its bucket's anchor to the next
    /// run member when `pos` was the anchor.
    fn unlink(&mut self, pos: Position) -> Option<T> {
        let hash = self.seq.get(pos)?.hash;
        let bucket = self.buckets.index_of(hash)?;
        if self.buckets.anchor(bucket) == Some(pos) {
            let successor = self.seq.next(pos).filter(|&next| {
                self.seq
                    .get(next)
                    .and_then(|e| self.buckets.index_of(e.hash))
                    == Some(bucket)
            });
            self.buckets.set_anchor(bucket, successor);
        }
        self.seq.erase(pos).map(|e| e.key)
    }

    fn reserve(&mut self, new_count: usize) {
        if new_count > self.bucket_count() {
            self.rehash(new_count);
        }
    }

    fn rehash(&mut self, new_count: usize) {
        let len = self.len();
        if new_count < len || new_count == self.bucket_count() {
            return;
        }
        let old = mem::replace(&mut self.seq, Sequence::with_capacity(len));
        let mut table = BucketTable::with_len(new_count);
        for entry in old {
            let Some(bucket) = table.index_of(entry.hash) else {
                unreachable!("elements present with zero buckets");
            };
            link_as_anchor(&mut self.seq, &mut table, bucket, entry);
        }
        self.buckets = table;
    }

    fn clear(&mut self) {
        self.buckets.clear_anchors();
        self.seq.clear();
    }
}

/// Link `entry` as the new head of `bucket`'s run.
fn link_as_anchor<T>(
    seq: &mut Sequence<Entry<T>>,
    buckets: &mut BucketTable,
    bucket: usize,
    entry: Entry<T>,
) {
    let pos = match buckets.anchor(bucket) {
        Some(anchor) => seq.insert_before(anchor, entry),
        None => seq.push_front(entry),
    };
    buckets.set_anchor(bucket, Some(pos));
}

/// Hash set whose buckets are contiguous runs of one linked sequence.
///
/// The table grows by doubling before an insert would push the load factor
/// past 1.0. It never shrinks on its own; [`rehash`](Self::rehash) can
/// shrink it down to one bucket per element.
#[derive(Clone)]
pub struct ChainedHashSet<T, S = DefaultHashBuilder> {
    hasher: S,
    chains: Chains<T>,
    reentrancy: DebugReentrancy,
}

impl<T> ChainedHashSet<T> {
    /// Empty set with no buckets; the first insert allocates one.
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Empty set with `bucket_count` preallocated, empty buckets.
    pub fn with_buckets(bucket_count: usize) -> Self {
        Self::with_buckets_and_hasher(bucket_count, Default::default())
    }
}

impl<T, S> ChainedHashSet<T, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_buckets_and_hasher(0, hasher)
    }

    pub fn with_buckets_and_hasher(bucket_count: usize, hasher: S) -> Self {
        Self {
            hasher,
            chains: Chains::with_buckets(bucket_count),
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.chains.bucket_count()
    }

    /// `len / bucket_count`, or `0.0` without buckets.
    pub fn load_factor(&self) -> f32 {
        match self.bucket_count() {
            0 => 0.0,
            n => self.len() as f32 / n as f32,
        }
    }

    /// Number of elements in bucket `id`; `0` for an out-of-range id.
    pub fn bucket_size(&self, id: usize) -> usize {
        if self.is_empty() || id >= self.bucket_count() {
            return 0;
        }
        self.chains.bucket_size(id)
    }

    /// Remove every element. The bucket count is kept; every bucket ends up
    /// empty.
    pub fn clear(&mut self) {
        self.chains.clear();
    }

    /// Rebuild the table with `new_count` buckets.
    ///
    /// Ignored unless `new_count >= len()` and `new_count` differs from the
    /// current bucket count. Elements are moved, not cloned, and placed by
    /// the hash cached at insert, so no user `Hash` code runs.
    pub fn rehash(&mut self, new_count: usize) {
        let _g = self.reentrancy.enter();
        self.chains.rehash(new_count);
    }

    /// Grow to `new_count` buckets if that is more than the current count.
    /// Never shrinks.
    pub fn reserve(&mut self, new_count: usize) {
        let _g = self.reentrancy.enter();
        self.chains.reserve(new_count);
    }

    /// Exchange contents, tables and hashers with `other` in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Elements in current sequence order. Members of one bucket are always
    /// adjacent; bucket order is otherwise arbitrary.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.chains.seq.iter(),
            remaining: self.len(),
        }
    }
}

impl<T, S> ChainedHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Add `key`. Returns `false`, dropping `key`, if an equal key is
    /// already present.
    pub fn insert(&mut self, key: T) -> bool {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(&key);
        if self.chains.find(hash, |k| *k == key).is_some() {
            return false;
        }
        self.chains.insert_new(hash, key);
        true
    }

    /// Remove the key equal to `q`. Returns whether one was present.
    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.take(q).is_some()
    }

    /// Remove and return the stored key equal to `q`.
    pub fn take<Q>(&mut self, q: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        if self.is_empty() {
            return None;
        }
        let hash = self.make_hash(q);
        let (pos, _) = self.chains.find(hash, |k| k.borrow() == q)?;
        self.chains.unlink(pos)
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).is_some()
    }

    /// The stored key equal to `q`, if any.
    pub fn get<Q>(&self, q: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        if self.is_empty() {
            return None;
        }
        let hash = self.make_hash(q);
        self.chains
            .find(hash, |k| k.borrow() == q)
            .map(|(_, e)| &e.key)
    }

    /// Bucket `q` maps to under the current table, or `None` without
    /// buckets. Does not check membership.
    pub fn bucket<Q>(&self, q: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash,
    {
        let _g = self.reentrancy.enter();
        if self.bucket_count() == 0 {
            return None;
        }
        bucket_for(self.make_hash(q), self.bucket_count())
    }
}

impl<T, S: Default> Default for ChainedHashSet<T, S> {
    /// Same as `new`: no elements, no buckets. `mem::take` on a set
    /// therefore leaves the source empty with zero buckets.
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T: fmt::Debug, S> fmt::Debug for ChainedHashSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Set equality: same elements, regardless of bucket count or layout.
impl<T, S> PartialEq for ChainedHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|k| other.contains(k))
    }
}

impl<T, S> Eq for ChainedHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
}

/// Builds the table with one bucket per source item, duplicates included,
/// then inserts the items in order.
impl<T, S> FromIterator<T> for ChainedHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let source: Vec<T> = iter.into_iter().collect();
        let mut set = Self::with_buckets_and_hasher(source.len(), S::default());
        for key in source {
            set.insert(key);
        }
        set
    }
}

impl<T, S, const N: usize> From<[T; N]> for ChainedHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from(keys: [T; N]) -> Self {
        keys.into_iter().collect()
    }
}

impl<T, S> Extend<T> for ChainedHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, T, S> Extend<&'a T> for ChainedHashSet<T, S>
where
    T: 'a + Eq + Hash + Copy,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

/// Borrowing iterator over a [`ChainedHashSet`], in sequence order.
pub struct Iter<'a, T> {
    inner: sequence::Iter<'a, Entry<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        let (_, e) = self.inner.next()?;
        self.remaining -= 1;
        Some(&e.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            remaining: self.remaining,
        }
    }
}

/// Owning iterator over a [`ChainedHashSet`], in sequence order.
pub struct IntoIter<T> {
    inner: sequence::IntoIter<Entry<T>>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.next().map(|e| e.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<'a, T, S> IntoIterator for &'a ChainedHashSet<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, S> IntoIterator for ChainedHashSet<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.chains.seq.into_iter(),
        }
    }
}

#[cfg(test)]
impl<T, S> ChainedHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    /// Panic unless anchors, cached hashes and run contiguity all agree.
    pub(crate) fn check_invariants(&self) {
        let n = self.bucket_count();
        assert!(n > 0 || self.is_empty(), "elements present with zero buckets");
        assert!(self.len() <= n, "load factor above 1.0");

        // Split the sequence into maximal same-bucket runs.
        let mut run_heads: Vec<Option<Position>> = vec![None; n];
        let mut run_lens = vec![0usize; n];
        let mut prev_bucket = None;
        for (pos, e) in self.chains.seq.iter() {
            assert_eq!(e.hash, self.make_hash(&e.key), "stale cached hash");
            let b = bucket_for(e.hash, n).expect("bucket for stored element");
            if prev_bucket != Some(b) {
                assert!(run_heads[b].is_none(), "bucket {b} split into two runs");
                run_heads[b] = Some(pos);
            }
            run_lens[b] += 1;
            prev_bucket = Some(b);
        }

        assert_eq!(
            self.chains.buckets.anchors(),
            run_heads.as_slice(),
            "anchor is not run head"
        );
        for (b, &len) in run_lens.iter().enumerate() {
            assert_eq!(self.bucket_size(b), len, "bucket_size({b})");
        }
        assert_eq!(run_lens.iter().sum::<usize>(), self.len());
    }
}
