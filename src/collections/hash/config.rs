//! Resize policy for [`TreeHashMap`](super::TreeHashMap).

use super::error::MapError;
use serde::{Deserialize, Serialize};

/// Capacity and load-factor thresholds of a map.
///
/// After every insert or delete the map computes `len / capacity`. Reaching
/// `grow_threshold` multiplies the capacity by `resize_factor`; falling to
/// `shrink_threshold` divides it, but never below `min_capacity`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Starting capacity, and the floor for shrinking.
    pub min_capacity: usize,
    /// Load factor at or above which the bucket array grows.
    pub grow_threshold: f64,
    /// Load factor at or below which the bucket array shrinks.
    pub shrink_threshold: f64,
    /// Multiplier applied on growth and divisor applied on shrink.
    pub resize_factor: usize,
}

impl MapConfig {
    /// Default starting capacity.
    pub const DEFAULT_MIN_CAPACITY: usize = 10;
    /// Default growth threshold.
    pub const DEFAULT_GROW_THRESHOLD: f64 = 0.75;
    /// Default shrink threshold.
    pub const DEFAULT_SHRINK_THRESHOLD: f64 = 0.25;
    /// Default resize factor.
    pub const DEFAULT_RESIZE_FACTOR: usize = 2;

    /// Sets the starting and minimum capacity.
    #[must_use]
    pub fn with_min_capacity(mut self, min_capacity: usize) -> Self {
        self.min_capacity = min_capacity;
        self
    }

    /// Sets both load-factor thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, shrink: f64, grow: f64) -> Self {
        self.shrink_threshold = shrink;
        self.grow_threshold = grow;
        self
    }

    /// Sets the resize factor.
    #[must_use]
    pub fn with_resize_factor(mut self, resize_factor: usize) -> Self {
        self.resize_factor = resize_factor;
        self
    }

    /// Checks that the policy is usable.
    ///
    /// # Errors
    /// Returns [`MapError::InvalidArgument`] if the capacity is zero, the
    /// thresholds are not `0 < shrink < grow`, the factor is below 2, or a
    /// single shrink could land at or above the growth threshold.
    pub fn validate(&self) -> Result<(), MapError> {
        if self.min_capacity == 0 {
            return Err(MapError::InvalidArgument("min_capacity must be positive"));
        }
        if !(self.shrink_threshold > 0.0 && self.shrink_threshold < self.grow_threshold) {
            return Err(MapError::InvalidArgument(
                "thresholds must satisfy 0 < shrink_threshold < grow_threshold",
            ));
        }
        if self.resize_factor < 2 {
            return Err(MapError::InvalidArgument("resize_factor must be at least 2"));
        }
        #[allow(clippy::cast_precision_loss)]
        let after_shrink = self.shrink_threshold * self.resize_factor as f64;
        if after_shrink >= self.grow_threshold {
            return Err(MapError::InvalidArgument(
                "shrink_threshold * resize_factor must stay below grow_threshold",
            ));
        }
        Ok(())
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            min_capacity: Self::DEFAULT_MIN_CAPACITY,
            grow_threshold: Self::DEFAULT_GROW_THRESHOLD,
            shrink_threshold: Self::DEFAULT_SHRINK_THRESHOLD,
            resize_factor: Self::DEFAULT_RESIZE_FACTOR,
        }
    }
}
