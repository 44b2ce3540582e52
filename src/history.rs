//! Fixed-capacity per-account transaction history.
//!
//! Once full, every push overwrites the oldest record. Iteration always runs
//! oldest to newest.

use crate::money::Money;
use crate::transaction::{TxKind, TxRecord};
use std::iter::FusedIterator;

/// Ring buffer of the most recent [`TxRecord`]s.
///
/// # Invariants
///
/// - `len() <= capacity()`
/// - While not full, `head == 0` and records sit in arrival order
/// - Once full, `head` indexes the oldest record
#[derive(Debug, Clone)]
pub struct TxRing {
    /// Backing storage. Grows up to `capacity`, then slots are reused.
    entries: Vec<TxRecord>,

    /// Index of the oldest record.
    head: usize,

    capacity: usize,

    max_note_len: usize,
}

impl TxRing {
    /// Creates an empty ring. A capacity of zero is raised to one.
    pub fn new(capacity: usize, max_note_len: usize) -> Self {
        TxRing {
            entries: Vec::new(),
            head: 0,
            capacity: capacity.max(1),
            max_note_len,
        }
    }

    /// Records an event. Never fails; evicts the oldest record when full.
    pub fn push(&mut self, kind: TxKind, amount: Money, note: &str) {
        let record = TxRecord::new(kind, amount, note, self.max_note_len);
        if self.entries.len() < self.capacity {
            self.entries.push(record);
        } else {
            self.entries[self.head] = record;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() == self.capacity
    }

    /// Returns the most recently pushed record.
    pub fn latest(&self) -> Option<&TxRecord> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = (self.head + self.entries.len() - 1) % self.capacity;
        self.entries.get(idx)
    }

    /// Iterates over the stored records, oldest first.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            ring: self,
            front: 0,
            back: self.entries.len(),
        }
    }

    fn nth_oldest(&self, offset: usize) -> &TxRecord {
        &self.entries[(self.head + offset) % self.capacity]
    }
}

impl<'a> IntoIterator for &'a TxRing {
    type Item = &'a TxRecord;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Oldest-to-newest iterator over a [`TxRing`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    ring: &'a TxRing,
    front: usize,
    back: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a TxRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let record = self.ring.nth_oldest(self.front);
        self.front += 1;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.ring.nth_oldest(self.back))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
