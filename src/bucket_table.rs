//! BucketTable: one optional anchor per bucket.
//!
//! Slot `i` holds the position of the first node of bucket `i`'s run in
//! the shared sequence, or `None` when the bucket has no members. The
//! table never owns elements; it only names sequence nodes.

use crate::sequence::Position;

#[derive(Clone, Debug, Default)]
pub(crate) struct BucketTable {
    anchors: Vec<Option<Position>>,
}

impl BucketTable {
    pub(crate) fn with_len(bucket_count: usize) -> Self {
        Self {
            anchors: vec![None; bucket_count],
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Bucket for a cached hash. `None` when the table has no slots.
    #[inline]
    pub(crate) fn index_of(&self, hash: u64) -> Option<usize> {
        bucket_for(hash, self.anchors.len())
    }

    #[inline]
    pub(crate) fn anchor(&self, bucket: usize) -> Option<Position> {
        self.anchors.get(bucket).copied().flatten()
    }

    #[inline]
    pub(crate) fn set_anchor(&mut self, bucket: usize, anchor: Option<Position>) {
        self.anchors[bucket] = anchor;
    }

    /// Empty every slot, keeping the slot count.
    pub(crate) fn clear_anchors(&mut self) {
        self.anchors.fill(None);
    }

    #[cfg(test)]
    pub(crate) fn anchors(&self) -> &[Option<Position>] {
        &self.anchors
    }
}

/// `hash mod bucket_count`, or `None` for a zero-slot table.
#[inline]
pub(crate) fn bucket_for(hash: u64, bucket_count: usize) -> Option<usize> {
    if bucket_count == 0 {
        return None;
    }
    Some((hash % bucket_count as u64) as usize)
}
