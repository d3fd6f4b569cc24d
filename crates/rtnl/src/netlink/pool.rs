//! Recycled storage for decoded attribute tables.
//!
//! Every decoded message carries one fixed-size slot table per attribute
//! family (plus one per nested array). The receive loop borrows these
//! tables from an [`AttrPool`]; an [`AttrSet`] hands its storage back when
//! it is dropped, so steady-state decoding does not allocate slot vectors.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use super::attr::Attr;

/// Free list of attribute slot vectors.
#[derive(Debug)]
pub struct AttrPool {
    free: Mutex<Vec<Vec<Option<Attr>>>>,
    capacity: usize,
}

impl AttrPool {
    /// Create a pool that keeps at most `capacity` idle tables.
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            free: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        })
    }

    /// Borrow a table of `len` empty slots.
    pub fn slots(self: &Arc<Self>, len: usize) -> AttrSet {
        let recycled = self
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        let mut slots = recycled.unwrap_or_default();
        slots.resize_with(len, || None);
        AttrSet {
            slots,
            pool: Some(Arc::clone(self)),
        }
    }

    /// Number of idle tables ready for reuse.
    pub fn available(&self) -> usize {
        self.free.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn release(&self, mut slots: Vec<Option<Attr>>) {
        // Nested sets release themselves here, before our lock is taken.
        slots.clear();
        let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);
        if free.len() < self.capacity {
            free.push(slots);
        }
    }
}

/// Fixed-size attribute table indexed by attribute kind.
///
/// Absent attributes are `None`. Tables obtained from an [`AttrPool`]
/// return their storage to it on drop.
#[derive(Default)]
pub struct AttrSet {
    slots: Vec<Option<Attr>>,
    pool: Option<Arc<AttrPool>>,
}

impl AttrSet {
    /// A table with `len` empty slots and no pool.
    pub fn new(len: usize) -> Self {
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || None);
        Self { slots, pool: None }
    }

    /// Number of slots (the family's maximum kind).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn get(&self, kind: u16) -> Option<&Attr> {
        self.slots.get(usize::from(kind)).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, kind: u16) -> Option<&mut Attr> {
        self.slots.get_mut(usize::from(kind)).and_then(Option::as_mut)
    }

    /// Store `attr` at `kind`, returning the previous value.
    ///
    /// Returns `None` and drops nothing if `kind` is outside the table; use
    /// [`contains_kind`](Self::contains_kind) to check first.
    pub fn set(&mut self, kind: u16, attr: Attr) -> Option<Attr> {
        self.slots
            .get_mut(usize::from(kind))
            .and_then(|slot| slot.replace(attr))
    }

    pub fn take(&mut self, kind: u16) -> Option<Attr> {
        self.slots.get_mut(usize::from(kind)).and_then(Option::take)
    }

    /// Whether `kind` has a slot in this table.
    pub fn contains_kind(&self, kind: u16) -> bool {
        usize::from(kind) < self.slots.len()
    }

    /// Present attributes in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &Attr)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(kind, slot)| slot.as_ref().map(|a| (kind as u16, a)))
    }
}

impl Drop for AttrSet {
    fn drop(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.release(std::mem::take(&mut self.slots));
        }
    }
}

impl Clone for AttrSet {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            pool: None,
        }
    }
}

impl PartialEq for AttrSet {
    fn eq(&self, other: &Self) -> bool {
        self.slots == other.slots
    }
}

impl fmt::Debug for AttrSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
