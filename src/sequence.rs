//! Sequence: doubly linked list stored in a generational arena.
//!
//! Nodes live in a `SlotMap` and link to each other by slot key, so a
//! [`Position`] is a plain copyable key rather than a reference. Erased
//! slots go back to the slot map's free list; their generation is bumped,
//! so an old `Position` resolves to nothing instead of to whatever node
//! reuses the slot.

use core::fmt;
use slotmap::{DefaultKey, SlotMap};

/// Stable handle to one node of a [`Sequence`].
///
/// Stays valid while other nodes are inserted or erased. Invalid once its
/// own node is erased, the sequence is cleared, or the sequence is dropped.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Position(DefaultKey);

#[derive(Clone, Debug)]
struct Node<T> {
    value: T,
    prev: Option<DefaultKey>,
    next: Option<DefaultKey>,
}

#[derive(Clone)]
pub struct Sequence<T> {
    nodes: SlotMap<DefaultKey, Node<T>>,
    head: Option<DefaultKey>,
}

impl<T> Sequence<T> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(capacity),
            head: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn front(&self) -> Option<Position> {
        self.head.map(Position)
    }

    pub fn get(&self, pos: Position) -> Option<&T> {
        self.nodes.get(pos.0).map(|n| &n.value)
    }

    /// Node following `pos`, or `None` at the end or for a stale handle.
    pub fn next(&self, pos: Position) -> Option<Position> {
        self.nodes.get(pos.0).and_then(|n| n.next).map(Position)
    }

    pub fn push_front(&mut self, value: T) -> Position {
        let old_head = self.head;
        let k = self.nodes.insert(Node {
            value,
            prev: None,
            next: old_head,
        });
        if let Some(h) = old_head {
            self.nodes[h].prev = Some(k);
        }
        self.head = Some(k);
        Position(k)
    }

    /// Link `value` immediately before `pos` and return its position.
    ///
    /// # Panics
    /// If `pos` no longer names a node of this sequence.
    pub fn insert_before(&mut self, pos: Position, value: T) -> Position {
        let at = pos.0;
        let prev = self.nodes[at].prev;
        let k = self.nodes.insert(Node {
            value,
            prev,
            next: Some(at),
        });
        self.nodes[at].prev = Some(k);
        match prev {
            Some(p) => self.nodes[p].next = Some(k),
            None => self.head = Some(k),
        }
        Position(k)
    }

    /// Unlink and return the value at `pos`; `None` for a stale handle.
    pub fn erase(&mut self, pos: Position) -> Option<T> {
        let node = self.nodes.remove(pos.0)?;
        match node.prev {
            Some(p) => self.nodes[p].next = node.next,
            None => self.head = node.next,
        }
        if let Some(n) = node.next {
            self.nodes[n].prev = node.prev;
        }
        Some(node.value)
    }

    pub fn pop_front(&mut self) -> Option<T> {
        let head = self.front()?;
        self.erase(head)
    }

    /// Drop every node. All outstanding positions become stale.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
    }

    /// Walk from the front in sequence order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            cur: self.head,
        }
    }

    /// Walk from `pos` (inclusive) to the end. Empty for a stale handle.
    pub fn iter_from(&self, pos: Position) -> Iter<'_, T> {
        let cur = self.nodes.contains_key(pos.0).then_some(pos.0);
        Iter {
            nodes: &self.nodes,
            cur,
        }
    }
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter().map(|(_, v)| v)).finish()
    }
}

/// Borrowing iterator yielding `(Position, &T)` in sequence order.
pub struct Iter<'a, T> {
    nodes: &'a SlotMap<DefaultKey, Node<T>>,
    cur: Option<DefaultKey>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Position, &'a T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cur?;
        let node = &self.nodes[k];
        self.cur = node.next;
        Some((Position(k), &node.value))
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            cur: self.cur,
        }
    }
}

/// Owning iterator draining a [`Sequence`] front to back.
pub struct IntoIter<T> {
    seq: Sequence<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.seq.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.seq.len();
        (n, Some(n))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for Sequence<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { seq: self }
    }
}
