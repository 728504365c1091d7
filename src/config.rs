//! Tunables for `LongMap`.

use crate::error::LongMapError;

/// Smallest primary table the map will ever use.
pub const MIN_CAPACITY: usize = 16;
/// Growth requests past this capacity are ignored.
pub const MAX_CAPACITY: usize = 1 << 30;

pub const DEFAULT_TOP_LOAD_FACTOR: f64 = 0.8;
pub const DEFAULT_BOTTOM_LOAD_FACTOR: f64 = 0.2;
pub const DEFAULT_MAX_PROBE: usize = 10;
pub const DEFAULT_OVERFLOW_FLOOR: usize = 10;
pub const DEFAULT_OVERFLOW_DIVISOR: usize = 20;
pub const DEFAULT_PRESSURE_MIN_LOAD: f64 = 0.05;

/// Construction parameters for [`LongMap`](crate::LongMap).
///
/// Setters chain; nothing is checked until [`validate`](Self::validate)
/// runs, which `LongMap::with_config` does for you.
#[derive(Debug, Clone, PartialEq)]
pub struct LongMapConfig {
    pub(crate) initial_capacity: usize,
    pub(crate) top_load_factor: f64,
    pub(crate) bottom_load_factor: f64,
    pub(crate) max_probe: usize,
    pub(crate) overflow_floor: usize,
    pub(crate) overflow_divisor: usize,
    pub(crate) pressure_min_load: f64,
}

impl Default for LongMapConfig {
    fn default() -> Self {
        Self {
            initial_capacity: MIN_CAPACITY,
            top_load_factor: DEFAULT_TOP_LOAD_FACTOR,
            bottom_load_factor: DEFAULT_BOTTOM_LOAD_FACTOR,
            max_probe: DEFAULT_MAX_PROBE,
            overflow_floor: DEFAULT_OVERFLOW_FLOOR,
            overflow_divisor: DEFAULT_OVERFLOW_DIVISOR,
            pressure_min_load: DEFAULT_PRESSURE_MIN_LOAD,
        }
    }
}

impl LongMapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capacity used by the first allocation and restored by `clear`.
    /// Clamped into `[MIN_CAPACITY, MAX_CAPACITY]`.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity.clamp(MIN_CAPACITY, MAX_CAPACITY);
        self
    }

    /// Grow when `(len + 1) / capacity` would exceed this ratio.
    pub fn with_top_load_factor(mut self, lf: f64) -> Self {
        self.top_load_factor = lf;
        self
    }

    /// Shrink when `len / capacity` falls below this ratio. Zero disables shrinking.
    pub fn with_bottom_load_factor(mut self, lf: f64) -> Self {
        self.bottom_load_factor = lf;
        self
    }

    /// Probe attempts per operation before falling back to the overflow store.
    pub fn with_max_probe(mut self, max_probe: usize) -> Self {
        self.max_probe = max_probe;
        self
    }

    /// Overflow pressure threshold: growth is requested once the overflow
    /// holds more than `max(floor, len / divisor)` entries.
    pub fn with_overflow_threshold(mut self, floor: usize, divisor: usize) -> Self {
        self.overflow_floor = floor;
        self.overflow_divisor = divisor;
        self
    }

    /// Overflow pressure is ignored when doubling would drop the load
    /// below `max(bottom_load_factor, load)`. Keys sharing a folded hash
    /// cannot be separated by growth, so this bounds how far they can
    /// push the table when shrinking is disabled.
    pub fn with_pressure_min_load(mut self, load: f64) -> Self {
        self.pressure_min_load = load;
        self
    }

    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }
    pub fn top_load_factor(&self) -> f64 {
        self.top_load_factor
    }
    pub fn bottom_load_factor(&self) -> f64 {
        self.bottom_load_factor
    }
    pub fn max_probe(&self) -> usize {
        self.max_probe
    }
    pub fn pressure_min_load(&self) -> f64 {
        self.pressure_min_load
    }

    pub fn validate(&self) -> Result<(), LongMapError> {
        if !(self.top_load_factor > 0.0 && self.top_load_factor <= 1.0) {
            return Err(LongMapError::InvalidConfig(
                "top load factor must be in (0, 1]",
            ));
        }
        if !(self.bottom_load_factor >= 0.0 && self.bottom_load_factor < self.top_load_factor) {
            return Err(LongMapError::InvalidConfig(
                "bottom load factor must be in [0, top load factor)",
            ));
        }
        // Otherwise a doubling can land below the shrink threshold.
        if self.bottom_load_factor * 2.0 >= self.top_load_factor {
            return Err(LongMapError::InvalidConfig(
                "bottom load factor must be below half the top load factor",
            ));
        }
        if !(self.pressure_min_load >= 0.0 && self.pressure_min_load < self.top_load_factor) {
            return Err(LongMapError::InvalidConfig(
                "pressure min load must be in [0, top load factor)",
            ));
        }
        if self.max_probe == 0 {
            return Err(LongMapError::InvalidConfig("max probe must be at least 1"));
        }
        if self.overflow_divisor == 0 {
            return Err(LongMapError::InvalidConfig(
                "overflow divisor must be at least 1",
            ));
        }
        Ok(())
    }

    /// Overflow length above which `put` asks for a bigger table.
    pub(crate) fn overflow_threshold(&self, len: usize) -> usize {
        self.overflow_floor.max(len / self.overflow_divisor)
    }
}
