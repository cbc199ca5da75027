//! Growth policy: when the heap region grows and by how much.

/// Load-factor threshold and heap sizing used by `HybridHashMap`.
///
/// Growth runs before placing the `n`th live entry when
/// `n * 100 > capacity * max_load_percent`, where `capacity` is the base
/// capacity plus the current heap capacity. The first growth allocates
/// `min_heap_capacity` heap slots; every later growth doubles the heap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GrowthPolicy {
    max_load_percent: usize,
    min_heap_capacity: usize,
}

impl GrowthPolicy {
    pub const DEFAULT_MAX_LOAD_PERCENT: usize = 75;
    pub const DEFAULT_MIN_HEAP_CAPACITY: usize = 4;

    pub const fn new() -> Self {
        Self {
            max_load_percent: Self::DEFAULT_MAX_LOAD_PERCENT,
            min_heap_capacity: Self::DEFAULT_MIN_HEAP_CAPACITY,
        }
    }

    /// Set the load-factor threshold in percent, clamped to `1..=100`.
    #[must_use]
    pub fn with_max_load_percent(mut self, percent: usize) -> Self {
        self.max_load_percent = percent.clamp(1, 100);
        self
    }

    /// Set the heap capacity allocated by the first growth (at least 1).
    #[must_use]
    pub fn with_min_heap_capacity(mut self, slots: usize) -> Self {
        self.min_heap_capacity = slots.max(1);
        self
    }

    pub fn max_load_percent(&self) -> usize {
        self.max_load_percent
    }

    pub fn min_heap_capacity(&self) -> usize {
        self.min_heap_capacity
    }

    /// Whether holding `entries` live entries in `capacity` slots crosses the
    /// threshold.
    #[inline]
    pub fn should_grow(&self, entries: usize, capacity: usize) -> bool {
        entries.saturating_mul(100) > capacity.saturating_mul(self.max_load_percent)
    }

    /// Heap capacity after one growth step from `current`.
    #[inline]
    pub fn next_heap_capacity(&self, current: usize) -> usize {
        if current == 0 {
            self.min_heap_capacity
        } else {
            current.saturating_mul(2)
        }
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::new()
    }
}
