//! Fuel-spot economy
//!
//! Players earn the right to place fuel spots by getting vehicles home.
//! This module tracks that allowance along with a few running totals.

/// Fuel spots the player may place at the start of a run
pub const STARTING_FUEL_SPOTS: u32 = 5;

/// Allowance earned each time a vehicle reaches its destination
pub const FUEL_SPOTS_PER_ARRIVAL: u32 = 1;

/// Allowance and bookkeeping for fuel spots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuelEconomy {
    /// Fuel spots the player can still place
    pub allowance: u32,

    /// Total fuel spots placed through commands
    pub spots_placed: u32,

    /// Total fuel spots driven over and consumed
    pub spots_consumed: u32,

    /// Total trips completed
    pub arrivals: u32,
}

impl Default for FuelEconomy {
    fn default() -> Self {
        Self::new()
    }
}

impl FuelEconomy {
    pub fn new() -> Self {
        Self::with_allowance(STARTING_FUEL_SPOTS)
    }

    pub fn with_allowance(allowance: u32) -> Self {
        Self {
            allowance,
            spots_placed: 0,
            spots_consumed: 0,
            arrivals: 0,
        }
    }

    pub fn can_place(&self) -> bool {
        self.allowance > 0
    }

    /// Use one unit of allowance for a placement
    /// Returns true if successful, false if none remain
    pub fn spend(&mut self) -> bool {
        if self.can_place() {
            self.allowance -= 1;
            self.spots_placed += 1;
            true
        } else {
            false
        }
    }

    /// Record a vehicle arrival and award allowance
    pub fn record_arrival(&mut self) {
        self.arrivals += 1;
        self.allowance += FUEL_SPOTS_PER_ARRIVAL;
    }

    pub fn record_pickup(&mut self) {
        self.spots_consumed += 1;
    }

    /// Get a summary string for display
    pub fn summary(&self) -> String {
        format!(
            "Fuel Spots: {} | Placed: {} | Consumed: {} | Arrivals: {}",
            self.allowance, self.spots_placed, self.spots_consumed, self.arrivals
        )
    }
}
