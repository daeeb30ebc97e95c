//! chained-hashset: a separately-chained hash set whose buckets are
//! contiguous runs inside one shared linked sequence.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: separate chaining without a container per bucket. All elements
//!   live in one doubly linked sequence; a bucket is the block of adjacent
//!   nodes whose hash maps to it.
//! - Layers:
//!   - Sequence<T>: doubly linked list stored in a `SlotMap` arena. Links
//!     and handles are generational slot keys (`Position`), so erasing a
//!     node never leaves a dangling reference and stale handles resolve to
//!     nothing.
//!   - BucketTable: one `Option<Position>` per bucket, naming the first
//!     node of that bucket's run (its anchor).
//!   - ChainedHashSet<T, S>: public API. Hashes keys with `S`, compares with
//!     `Eq`, and keeps the sequence and anchors in step.
//!
//! Run invariant
//! - For every occupied bucket, walking forward from its anchor while the
//!   bucket matches visits exactly that bucket's members; no member sits
//!   outside the run. Empty buckets have no anchor.
//! - Insert links a new member right before its bucket's anchor, or at the
//!   very front of the sequence if the bucket is empty, and makes it the
//!   new anchor. Neither placement can split another bucket's run.
//! - Erasing the anchor hands the anchor to the next node if it is in the
//!   same bucket; otherwise the bucket becomes empty.
//!
//! Growth
//! - Inserting a new key while `len >= bucket_count` first doubles the
//!   table (0 becomes 1), so the load factor never exceeds 1.0 after an
//!   insert.
//! - `rehash(n)` rebuilds only when `n >= len` and `n != bucket_count`;
//!   `reserve(n)` only when `n > bucket_count`. Anything else is ignored.
//! - Rebuilding moves every node into a fresh sequence, regrouping runs for
//!   the new bucket count. Positions taken before a rebuild are stale.
//!
//! Hasher invariants
//! - Each node caches the `u64` hash computed at insert. Rebuilds, run
//!   walks and anchor hand-off use the cached hash; `T: Hash` runs only on
//!   the key being inserted or looked up.
//! - A debug-only reentrancy guard covers every entry point that runs user
//!   `Hash`/`Eq` code, so a key that reaches back into its own set panics
//!   instead of observing half-updated anchors.
//!
//! Failure model
//! - No operation returns an error. Duplicate inserts, removals of absent
//!   keys, lookups without buckets and undersized rehashes are no-ops that
//!   report `false`, `None` or `0`.
//!
//! Notes and non-goals
//! - Single-threaded: the set is `Send` for `Send` contents but never
//!   `Sync`.
//! - No ordering guarantee beyond run contiguity.
//! - Range construction (`FromIterator`) sizes the table to the number of
//!   source items, duplicates included.

mod bucket_table;
pub mod chained_hash_set;
mod chained_hash_set_proptest;
mod reentrancy;
pub mod sequence;

// Public surface
pub use chained_hash_set::{ChainedHashSet, IntoIter, Iter};
pub use sequence::{Position, Sequence};
