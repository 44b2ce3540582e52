//! Open-addressing alias (PIX key) index.
//!
//! Maps alias strings to account handles using linear probing over a
//! power-of-two table. The alias text itself is not stored here: each slot
//! holds only a handle, and keys are re-derived through an [`AliasSource`]
//! when probing. Deletion clears the slot and re-inserts the remainder of its
//! cluster, so no tombstones are ever left behind.

use crate::account::AccountHandle;
use crate::error::{LedgerError, Result};
use log::warn;

/// Resolves the alias currently held by an account.
///
/// The index calls this while probing to compare keys. An account that is
/// indexed must report its alias for as long as it stays indexed.
pub trait AliasSource {
    fn alias_of(&self, handle: AccountHandle) -> Option<&str>;
}

/// FNV-1a 64-bit hash.
#[inline(always)]
pub(crate) fn fnv1a(data: &[u8]) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for &b in data {
        h ^= b as u64;
        h = h.wrapping_mul(0x100000001b3);
    }
    h
}

/// Largest power of two representable in `usize`.
const MAX_TABLE_SIZE: usize = 1 << (usize::BITS - 1);

/// Rounds a requested table size up to a power of two of at least 2,
/// saturating at [`MAX_TABLE_SIZE`].
fn table_size(requested: usize) -> usize {
    requested
        .max(2)
        .checked_next_power_of_two()
        .unwrap_or(MAX_TABLE_SIZE)
}

/// Outcome of walking the probe sequence for a key.
enum Probe {
    /// Slot holding the key.
    Found(usize),
    /// First empty slot on the probe path; the key is absent.
    Vacant(usize),
    /// Every slot was visited without reaching an empty one.
    Exhausted,
}

/// Fixed-capacity alias-to-handle table.
///
/// # Invariants
///
/// - `len() <= capacity() - 1`, so every probe reaches an empty slot
/// - For every indexed alias `a`, `find(a)` returns its handle
#[derive(Debug, Clone)]
pub struct AliasIndex {
    slots: Vec<Option<AccountHandle>>,
    mask: usize,
    len: usize,
}

impl AliasIndex {
    /// Creates an empty table with at least `size` slots.
    ///
    /// The size is rounded up to a power of two, with a minimum of two so one
    /// slot can always stay empty. Sizes past the largest power of two are
    /// clamped to it.
    pub fn with_capacity(size: usize) -> Self {
        let capacity = table_size(size);
        if capacity < size {
            warn!("Alias table size {} clamped to {}", size, capacity);
        }
        AliasIndex {
            slots: vec![None; capacity],
            mask: capacity - 1,
            len: 0,
        }
    }

    /// Number of slots in the table.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if one more entry can be added without filling the
    /// last empty slot.
    pub fn has_room(&self) -> bool {
        self.len + 1 < self.slots.len()
    }

    fn home_slot(&self, alias: &str) -> usize {
        (fnv1a(alias.as_bytes()) as usize) & self.mask
    }

    fn probe<S: AliasSource + ?Sized>(&self, alias: &str, source: &S) -> Probe {
        let mut idx = self.home_slot(alias);
        for _ in 0..self.slots.len() {
            match self.slots[idx] {
                None => return Probe::Vacant(idx),
                Some(handle) if source.alias_of(handle) == Some(alias) => {
                    return Probe::Found(idx)
                }
                Some(_) => idx = (idx + 1) & self.mask,
            }
        }
        Probe::Exhausted
    }

    /// Looks up the account holding `alias`.
    pub fn find<S: AliasSource + ?Sized>(&self, alias: &str, source: &S) -> Option<AccountHandle> {
        if alias.is_empty() {
            return None;
        }
        match self.probe(alias, source) {
            Probe::Found(idx) => self.slots[idx],
            Probe::Vacant(_) | Probe::Exhausted => None,
        }
    }

    /// Maps `alias` to `handle`.
    ///
    /// If the alias is already indexed its handle is overwritten; otherwise
    /// the entry goes into the first empty slot on its probe path. Fails with
    /// [`LedgerError::Capacity`] when adding a new entry would leave no empty
    /// slot.
    pub fn insert<S: AliasSource + ?Sized>(
        &mut self,
        alias: &str,
        handle: AccountHandle,
        source: &S,
    ) -> Result<()> {
        if alias.is_empty() {
            return Err(LedgerError::validation("alias must not be empty"));
        }
        match self.probe(alias, source) {
            Probe::Found(idx) => {
                self.slots[idx] = Some(handle);
                Ok(())
            }
            Probe::Vacant(idx) if self.has_room() => {
                self.slots[idx] = Some(handle);
                self.len += 1;
                Ok(())
            }
            Probe::Vacant(_) | Probe::Exhausted => Err(LedgerError::Capacity {
                resource: "alias table",
                capacity: self.slots.len(),
            }),
        }
    }

    /// Removes the entry for `alias`, returning the handle it mapped to.
    ///
    /// After clearing the slot, every entry in the rest of the cluster is
    /// lifted out and re-inserted so entries that probed through the freed
    /// slot stay reachable.
    pub fn remove<S: AliasSource + ?Sized>(
        &mut self,
        alias: &str,
        source: &S,
    ) -> Option<AccountHandle> {
        if alias.is_empty() {
            return None;
        }
        let idx = match self.probe(alias, source) {
            Probe::Found(idx) => idx,
            Probe::Vacant(_) | Probe::Exhausted => return None,
        };

        let removed = self.slots[idx].take();
        self.len -= 1;

        let mut next = (idx + 1) & self.mask;
        for _ in 0..self.slots.len() {
            let Some(handle) = self.slots[next].take() else {
                break;
            };
            self.len -= 1;
            match source.alias_of(handle) {
                Some(key) if !key.is_empty() => self.reinsert(key, handle, source),
                _ => warn!(
                    "Dropping alias table entry for account {} with no alias",
                    handle
                ),
            }
            next = (next + 1) & self.mask;
        }

        removed
    }

    /// Places an entry lifted out of a cluster. A slot was just freed, so a
    /// vacant position always exists on the probe path.
    fn reinsert<S: AliasSource + ?Sized>(&mut self, alias: &str, handle: AccountHandle, source: &S) {
        match self.probe(alias, source) {
            Probe::Found(idx) => self.slots[idx] = Some(handle),
            Probe::Vacant(idx) => {
                self.slots[idx] = Some(handle);
                self.len += 1;
            }
            Probe::Exhausted => warn!("Alias table exhausted while re-inserting {}", handle),
        }
    }

    /// Slot index of `alias`, if indexed.
    #[cfg(test)]
    fn slot_of<S: AliasSource + ?Sized>(&self, alias: &str, source: &S) -> Option<usize> {
        match self.probe(alias, source) {
            Probe::Found(idx) => Some(idx),
            _ => None,
        }
    }
}
