//! LongMap: public container over `SlotTable` and `OverflowStore`.
//!
//! Keyed operations consult the slot table first and fall back to the
//! overflow store. This layer owns every resize decision; the lower
//! layers never reallocate on their own.

use crate::config::{LongMapConfig, MAX_CAPACITY, MIN_CAPACITY};
use crate::error::LongMapError;
use crate::overflow::{self, OverflowStore};
use crate::slot_table::{InsertSlot, SlotIter, SlotIterMut, SlotTable};
use core::fmt;
use core::mem;
use tracing::{debug, trace};

/// Pressure-driven growth attempts allowed per `put`.
const MAX_GROWTH_ATTEMPTS: usize = 2;

/// Point-in-time counters, mostly useful for tests and tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongMapStats {
    pub capacity: usize,
    pub len: usize,
    pub table_len: usize,
    pub overflow_len: usize,
    pub tombstones: usize,
}

/// Map from `i64` keys to `V` using double-hashed open addressing with a
/// bounded probe budget and an overflow list for whatever does not fit.
pub struct LongMap<V> {
    table: SlotTable<V>,
    overflow: OverflowStore<V>,
    config: LongMapConfig,
}

impl<V> Default for LongMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> LongMap<V> {
    pub fn new() -> Self {
        Self::from_valid_config(LongMapConfig::default())
    }

    pub fn with_config(config: LongMapConfig) -> Result<Self, LongMapError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: LongMapConfig) -> Self {
        Self {
            table: SlotTable::new(config.initial_capacity, config.max_probe),
            overflow: OverflowStore::new(),
            config,
        }
    }

    pub fn config(&self) -> &LongMapConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.table.len() + self.overflow.len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn stats(&self) -> LongMapStats {
        LongMapStats {
            capacity: self.capacity(),
            len: self.len(),
            table_len: self.table.len(),
            overflow_len: self.overflow.len(),
            tombstones: self.table.tombstones(),
        }
    }

    /// Associates `value` with `key` and returns a reference to the stored
    /// value. `None` is rejected with [`LongMapError::AbsentValue`] before
    /// anything is touched.
    pub fn put(&mut self, key: i64, value: impl Into<Option<V>>) -> Result<&V, LongMapError> {
        let value = value.into().ok_or(LongMapError::AbsentValue { key })?;
        self.insert(key, value);
        Ok(self.get(key).expect("entry present after insert"))
    }

    /// Infallible form of [`put`](Self::put); returns the previous value.
    pub fn insert(&mut self, key: i64, value: V) -> Option<V> {
        if self.load_after(self.len() + 1) > self.config.top_load_factor {
            self.change_table_size(true);
        }

        let at = self.table.find_insertion_slot(key);
        if let Some(at @ InsertSlot::Existing(_)) = at {
            return self.table.write(at, key, value);
        }
        // A vacancy in the table does not rule out an older copy in overflow.
        if let Some(slot) = self.overflow.find_mut(key) {
            return Some(mem::replace(slot, value));
        }
        match at {
            Some(at) => {
                self.table.write(at, key, value);
            }
            None => self.push_overflow(key, value),
        }
        None
    }

    pub fn get(&self, key: i64) -> Option<&V> {
        self.table.get(key).or_else(|| self.overflow.find(key))
    }

    pub fn get_mut(&mut self, key: i64) -> Option<&mut V> {
        if let Some(index) = self.table.find_index(key) {
            return self.table.value_at_mut(index);
        }
        self.overflow.find_mut(key)
    }

    pub fn contains_key(&self, key: i64) -> bool {
        self.table.find_index(key).is_some() || self.overflow.contains(key)
    }

    /// Linear scan for an equal value. `None` never matches.
    pub fn contains_value<'a>(&self, value: impl Into<Option<&'a V>>) -> bool
    where
        V: PartialEq + 'a,
    {
        match value.into() {
            Some(needle) => self.iter().any(|(_, v)| v == needle),
            None => false,
        }
    }

    pub fn remove(&mut self, key: i64) -> Option<V> {
        let removed = match self.table.remove(key) {
            Some(v) => Some(v),
            None => self.overflow.remove(key),
        };
        if self.is_empty() {
            self.clear();
        } else if self.load_after(self.len()) < self.config.bottom_load_factor {
            self.change_table_size(false);
        }
        removed
    }

    /// Drops every entry and returns to the configured initial capacity.
    /// The slot buffer is released until the next insertion.
    pub fn clear(&mut self) {
        if self.table.is_allocated() || !self.overflow.is_empty() {
            trace!(len = self.len(), capacity = self.capacity(), "clearing long map");
        }
        self.table = SlotTable::new(self.config.initial_capacity, self.config.max_probe);
        self.overflow.clear();
    }

    /// Every live key; order is unspecified.
    pub fn keys(&self) -> Vec<i64> {
        self.iter().map(|(k, _)| k).collect()
    }

    /// Every live value; order is unspecified. Empty when the map is empty.
    pub fn values(&self) -> Vec<&V> {
        self.iter().map(|(_, v)| v).collect()
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            table: self.table.iter(),
            overflow: self.overflow.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            table: self.table.iter_mut(),
            overflow: self.overflow.iter_mut(),
        }
    }

    fn load_after(&self, len: usize) -> f64 {
        len as f64 / self.capacity() as f64
    }

    fn push_overflow(&mut self, key: i64, value: V) {
        self.overflow.append(key, value);
        trace!(key, overflow_len = self.overflow.len(), "probe budget exhausted; entry moved to overflow");

        for _ in 0..MAX_GROWTH_ATTEMPTS {
            if self.overflow.len() <= self.config.overflow_threshold(self.len()) {
                break;
            }
            let floor = self
                .config
                .bottom_load_factor
                .max(self.config.pressure_min_load);
            let doubled = self.capacity().saturating_mul(2);
            if (self.len() as f64 / doubled as f64) < floor {
                debug!(
                    len = self.len(),
                    capacity = self.capacity(),
                    overflow_len = self.overflow.len(),
                    "overflow pressure ignored: growth would leave the table too sparse"
                );
                break;
            }
            if !self.change_table_size(true) {
                break;
            }
        }
    }

    /// Doubles or halves the table, clamped to `[MIN_CAPACITY, MAX_CAPACITY]`.
    /// Returns whether a rehash happened.
    fn change_table_size(&mut self, grow: bool) -> bool {
        let capacity = self.capacity();
        let new_capacity = if grow {
            if capacity > MAX_CAPACITY / 2 {
                debug!(capacity, "growth ignored at capacity ceiling");
                return false;
            }
            capacity * 2
        } else {
            if capacity / 2 < MIN_CAPACITY {
                return false;
            }
            capacity / 2
        };
        self.rehash(new_capacity);
        true
    }

    /// Rebuilds the table at `new_capacity`, reabsorbing the overflow store.
    /// Tombstones are dropped here and nowhere else. Entries that still do
    /// not fit go to a fresh overflow store; no further growth is requested.
    fn rehash(&mut self, new_capacity: usize) {
        let old_capacity = self.capacity();
        let old = mem::replace(
            &mut self.table,
            SlotTable::new(new_capacity, self.config.max_probe),
        );
        let spilled = self.overflow.drain();
        for (key, value) in old.into_entries().chain(spilled) {
            if let Err((key, value)) = self.table.try_insert_new(key, value) {
                self.overflow.append(key, value);
            }
        }
        debug!(
            old_capacity,
            new_capacity,
            table_len = self.table.len(),
            overflow_len = self.overflow.len(),
            "rehashed long map"
        );
    }
}

impl<V: fmt::Debug> fmt::Debug for LongMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> Extend<(i64, V)> for LongMap<V> {
    fn extend<I: IntoIterator<Item = (i64, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<V> FromIterator<(i64, V)> for LongMap<V> {
    fn from_iter<I: IntoIterator<Item = (i64, V)>>(iter: I) -> Self {
        let mut m = LongMap::new();
        m.extend(iter);
        m
    }
}

impl<'a, V> IntoIterator for &'a LongMap<V> {
    type Item = (i64, &'a V);
    type IntoIter = Iter<'a, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over `(key, &value)`: table entries first, then overflow.
pub struct Iter<'a, V> {
    table: SlotIter<'a, V>,
    overflow: overflow::Iter<'a, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (i64, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.table.next().or_else(|| self.overflow.next())
    }
}

/// Iterator over `(key, &mut value)`.
pub struct IterMut<'a, V> {
    table: SlotIterMut<'a, V>,
    overflow: overflow::IterMut<'a, V>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (i64, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match self.table.next() {
            Some(e) => Some(e),
            None => self.overflow.next(),
        }
    }
}
