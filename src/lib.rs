//! long-map: a single-threaded map from `i64` keys to values built on
//! double-hashed open addressing with a bounded probe budget.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: constant expected-time `put`/`get`/`remove` on a flat buffer,
//!   while `put` stays total even when a probe sequence fills up.
//! - Layers:
//!   - SlotTable<V>: contiguous buffer of `Empty | Occupied | Tombstone`
//!     slots. Probes `(h1 + i * h2) mod capacity` for at most `max_probe`
//!     attempts. Never reallocates on its own, apart from the lazy first
//!     allocation.
//!   - OverflowStore<V>: singly linked list in a `slotmap` arena holding
//!     entries whose probe sequence was exhausted. O(1) append, O(k) scan.
//!   - LongMap<V>: public API. Routes keyed operations table-first, owns
//!     every resize decision, and reabsorbs the overflow on rehash.
//!
//! Constraints
//! - Single-threaded; mutation goes through `&mut self`.
//! - No key is ever stored twice across the two layers.
//! - `len == occupied slots + overflow entries`; `len` is derived, not
//!   tracked separately.
//! - Capacity stays within `[MIN_CAPACITY, MAX_CAPACITY]`.
//!
//! Resizing
//! - Grow before an insertion when `(len + 1) / capacity` would exceed the
//!   top load factor; shrink after a removal when `len / capacity` drops
//!   below the bottom load factor. Removing the last entry clears the map.
//! - An overflow append that pushes the overflow past
//!   `max(overflow_floor, len / overflow_divisor)` requests up to two
//!   further growths, unless growth would leave the table sparser than the
//!   shrink threshold or the configured pressure minimum load (5% by
//!   default), whichever is higher.
//! - Rehash places every live entry with the same bounded probing. Whatever
//!   does not fit goes back to a fresh overflow store, so a resize cannot
//!   fail and never recurses.
//!
//! Absent values
//! - `put` takes `impl Into<Option<V>>` and rejects `None` with
//!   `LongMapError::AbsentValue` before mutating. `insert` is the
//!   infallible form. `contains_value(None)` is simply `false`.
//!
//! Notes and non-goals
//! - Iteration order is unspecified (table slots, then overflow).
//! - No persistence and no generic keys.

mod config;
mod error;
mod long_map;
mod long_map_proptest;
mod overflow;
mod slot_table;

// Public surface
pub use config::{LongMapConfig, MAX_CAPACITY, MIN_CAPACITY};
pub use error::LongMapError;
pub use long_map::{Iter, IterMut, LongMap, LongMapStats};
