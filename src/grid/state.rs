//! Grid occupancy tracking

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Mutable ladder state, one instance per running strategy
///
/// `upper_occupancy` counts resting sell rungs and `lower_occupancy` resting
/// buy rungs. Both are zero only before the ladder has been seeded, which is
/// what guards against re-seeding on reconnect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridState {
    /// Resting sell rungs
    pub upper_occupancy: u32,
    /// Resting buy rungs
    pub lower_occupancy: u32,
    /// Budget snapshot taken at seed time
    pub total_allocated_value: Decimal,
}

impl GridState {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a ladder has already been placed
    pub fn is_seeded(&self) -> bool {
        self.upper_occupancy != 0 || self.lower_occupancy != 0
    }

    /// Total rungs believed to be resting on both sides
    pub fn occupancy(&self) -> u32 {
        self.upper_occupancy + self.lower_occupancy
    }

    pub fn add_upper(&mut self, count: u32) {
        self.upper_occupancy += count;
    }

    pub fn add_lower(&mut self, count: u32) {
        self.lower_occupancy += count;
    }

    /// Decrement upper occupancy, saturating at zero
    pub fn remove_upper(&mut self) {
        self.upper_occupancy = self.upper_occupancy.saturating_sub(1);
    }

    /// Decrement lower occupancy, saturating at zero
    pub fn remove_lower(&mut self) {
        self.lower_occupancy = self.lower_occupancy.saturating_sub(1);
    }
}
