//! SlotTable: the primary open-addressing buffer.
//!
//! Slots are probed with double hashing for at most `max_probe` attempts.
//! Deleted entries leave a `Tombstone` so later keys on the same probe
//! sequence stay reachable; only a rebuild (see `LongMap`) clears them.
//! The buffer is allocated by the first insertion, never by a lookup.

use core::mem;

#[derive(Debug)]
pub(crate) enum Slot<V> {
    Empty,
    Occupied { key: i64, value: V },
    Tombstone,
}

/// Where `find_insertion_slot` wants an entry to go.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum InsertSlot {
    /// The key already lives at this index; overwrite in place.
    Existing(usize),
    /// Empty or tombstoned slot that may take the key.
    Vacant(usize),
}

/// 32-bit magnitude hash of a 64-bit key: the two halves xor-folded, then
/// the absolute value of the result read as `i32`.
#[inline]
pub(crate) fn key_hash(key: i64) -> u32 {
    ((key ^ (key >> 32)) as i32).unsigned_abs()
}

/// Probe sequence `(h1 + i * h2) mod capacity` for `i = 0, 1, ...`.
///
/// Stepping by `h2` modulo `capacity` keeps every intermediate value below
/// `2 * capacity`, so there is no multiplication to overflow.
#[derive(Debug, Clone)]
pub(crate) struct Probe {
    index: usize,
    step: usize,
    capacity: usize,
    remaining: usize,
}

impl Probe {
    pub(crate) fn new(key: i64, capacity: usize, attempts: usize) -> Self {
        debug_assert!(capacity >= 2, "double hashing needs capacity >= 2");
        let h = key_hash(key) as usize;
        Probe {
            index: h % capacity,
            step: 1 + h % (capacity - 1),
            capacity,
            remaining: attempts,
        }
    }
}

impl Iterator for Probe {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.index;
        self.index = (self.index + self.step) % self.capacity;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

pub(crate) struct SlotTable<V> {
    capacity: usize,
    max_probe: usize,
    slots: Option<Box<[Slot<V>]>>, // None until the first insertion
    occupied: usize,
    tombstones: usize,
}

impl<V> SlotTable<V> {
    pub(crate) fn new(capacity: usize, max_probe: usize) -> Self {
        Self {
            capacity,
            max_probe,
            slots: None,
            occupied: 0,
            tombstones: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }
    pub(crate) fn len(&self) -> usize {
        self.occupied
    }
    pub(crate) fn tombstones(&self) -> usize {
        self.tombstones
    }
    pub(crate) fn is_allocated(&self) -> bool {
        self.slots.is_some()
    }

    pub(crate) fn probe(&self, key: i64) -> Probe {
        Probe::new(key, self.capacity, self.max_probe)
    }

    fn slots_mut(&mut self) -> &mut [Slot<V>] {
        let capacity = self.capacity;
        self.slots
            .get_or_insert_with(|| (0..capacity).map(|_| Slot::Empty).collect())
    }

    /// Index of the live slot holding `key`. An empty slot ends the search;
    /// tombstones and foreign keys do not.
    pub(crate) fn find_index(&self, key: i64) -> Option<usize> {
        let slots = self.slots.as_deref()?;
        for index in self.probe(key) {
            match &slots[index] {
                Slot::Empty => return None,
                Slot::Occupied { key: k, .. } if *k == key => return Some(index),
                Slot::Occupied { .. } | Slot::Tombstone => {}
            }
        }
        None
    }

    /// Picks the slot a `put` of `key` should write. An unallocated table
    /// reports the first probe position as vacant.
    pub(crate) fn find_insertion_slot(&self, key: i64) -> Option<InsertSlot> {
        let mut probe = self.probe(key);
        let Some(slots) = self.slots.as_deref() else {
            return probe.next().map(InsertSlot::Vacant);
        };
        let mut first_tombstone = None;
        for index in probe {
            match &slots[index] {
                Slot::Occupied { key: k, .. } if *k == key => {
                    return Some(InsertSlot::Existing(index));
                }
                Slot::Empty => {
                    return Some(InsertSlot::Vacant(first_tombstone.unwrap_or(index)));
                }
                Slot::Tombstone => {
                    first_tombstone.get_or_insert(index);
                }
                Slot::Occupied { .. } => {}
            }
        }
        first_tombstone.map(InsertSlot::Vacant)
    }

    pub(crate) fn get(&self, key: i64) -> Option<&V> {
        let index = self.find_index(key)?;
        self.value_at(index)
    }

    pub(crate) fn value_at(&self, index: usize) -> Option<&V> {
        match self.slots.as_deref()?.get(index)? {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    pub(crate) fn value_at_mut(&mut self, index: usize) -> Option<&mut V> {
        match self.slots.as_deref_mut()?.get_mut(index)? {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Writes `key`/`value` at a slot chosen by `find_insertion_slot`.
    /// Returns the previous value when the slot already held `key`.
    pub(crate) fn write(&mut self, at: InsertSlot, key: i64, value: V) -> Option<V> {
        match at {
            InsertSlot::Existing(index) => match &mut self.slots_mut()[index] {
                Slot::Occupied { key: k, value: v } if *k == key => Some(mem::replace(v, value)),
                _ => panic!("slot {} does not hold key {}", index, key),
            },
            InsertSlot::Vacant(index) => {
                let prev = mem::replace(&mut self.slots_mut()[index], Slot::Occupied { key, value });
                match prev {
                    Slot::Empty => {}
                    Slot::Tombstone => self.tombstones -= 1,
                    Slot::Occupied { key: k, .. } => {
                        panic!("vacant slot {} was occupied by key {}", index, k)
                    }
                }
                self.occupied += 1;
                None
            }
        }
    }

    /// Places a key known to be absent from the table. Hands the entry back
    /// if the probe sequence is exhausted.
    pub(crate) fn try_insert_new(&mut self, key: i64, value: V) -> Result<(), (i64, V)> {
        match self.find_insertion_slot(key) {
            Some(at) => {
                debug_assert!(matches!(at, InsertSlot::Vacant(_)), "key {} already placed", key);
                self.write(at, key, value);
                Ok(())
            }
            None => Err((key, value)),
        }
    }

    /// Tombstones the slot holding `key` and hands back its value.
    pub(crate) fn remove(&mut self, key: i64) -> Option<V> {
        let index = self.find_index(key)?;
        let slot = mem::replace(&mut self.slots_mut()[index], Slot::Tombstone);
        match slot {
            Slot::Occupied { value, .. } => {
                self.occupied -= 1;
                self.tombstones += 1;
                Some(value)
            }
            _ => unreachable!("find_index returned a dead slot"),
        }
    }

    /// Drops the buffer; the table is unallocated afterwards.
    pub(crate) fn clear(&mut self) {
        self.slots = None;
        self.occupied = 0;
        self.tombstones = 0;
    }

    pub(crate) fn iter(&self) -> SlotIter<'_, V> {
        SlotIter {
            it: self.slots.as_deref().unwrap_or(&[]).iter(),
        }
    }

    pub(crate) fn iter_mut(&mut self) -> SlotIterMut<'_, V> {
        SlotIterMut {
            it: self.slots.as_deref_mut().unwrap_or(&mut []).iter_mut(),
        }
    }

    /// Consumes the table, yielding live entries and discarding tombstones.
    pub(crate) fn into_entries(self) -> impl Iterator<Item = (i64, V)> {
        self.slots
            .map(|b| b.into_vec())
            .unwrap_or_default()
            .into_iter()
            .filter_map(|slot| match slot {
                Slot::Occupied { key, value } => Some((key, value)),
                _ => None,
            })
    }
}

/// Live entries in slot order.
pub(crate) struct SlotIter<'a, V> {
    it: core::slice::Iter<'a, Slot<V>>,
}

impl<'a, V> Iterator for SlotIter<'a, V> {
    type Item = (i64, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.it.by_ref() {
            if let Slot::Occupied { key, value } = slot {
                return Some((*key, value));
            }
        }
        None
    }
}

pub(crate) struct SlotIterMut<'a, V> {
    it: core::slice::IterMut<'a, Slot<V>>,
}

impl<'a, V> Iterator for SlotIterMut<'a, V> {
    type Item = (i64, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.it.by_ref() {
            if let Slot::Occupied { key, value } = slot {
                return Some((*key, value));
            }
        }
        None
    }
}
