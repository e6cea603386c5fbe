//! Vehicle movement and fuel logic
//!
//! A vehicle follows its assigned path one tick at a time, burning fuel as it
//! moves and refilling when it drives onto a fuel spot.

use super::error::SimError;
use super::grid::GridMap;
use super::pathfinder::Path;
use super::types::{
    Coord, Position, VehicleId, FUEL_EPSILON, FUEL_PER_TICK, REFUEL_AMOUNT, STARTING_FUEL,
    STEPS_PER_SEGMENT,
};

/// Coarse state of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleState {
    /// No path assigned, waiting for a trip
    Idle,
    /// Following a path
    Traveling,
    /// Sub-state of `Traveling`: the path is kept but the tank is empty,
    /// so the vehicle holds its position until refueled
    Stalled,
}

/// Result of a vehicle update indicating what happened this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleUpdateResult {
    /// Vehicle has no trip
    Idle,
    /// Vehicle advanced; `refueled` is set when it drove onto a fuel spot
    Moved { refueled: bool },
    /// Vehicle is out of fuel and did not move
    Stalled,
    /// Vehicle reached the end of its path
    Arrived { destination: Coord, refueled: bool },
}

/// A vehicle in the simulation
#[derive(Debug, Clone)]
pub struct SimVehicle {
    pub id: VehicleId,
    /// Continuous position in cells; `None` while parked
    pub position: Option<Position>,
    pub path: Option<Path>,
    /// Index of the last path node fully reached
    pub path_index: usize,
    /// Ticks spent on the current segment
    pub progress: u32,
    pub origin: Option<Coord>,
    pub destination: Option<Coord>,
    /// Where the vehicle last parked, used as the next trip's origin
    pub parked_at: Option<Coord>,
    pub fuel: f32,
    pub trips_completed: u32,
    pub refuels: u32,
}

impl SimVehicle {
    /// A new idle vehicle with a full tank
    pub fn new(id: VehicleId) -> Self {
        Self {
            id,
            position: None,
            path: None,
            path_index: 0,
            progress: 0,
            origin: None,
            destination: None,
            parked_at: None,
            fuel: STARTING_FUEL,
            trips_completed: 0,
            refuels: 0,
        }
    }

    pub fn state(&self) -> VehicleState {
        match self.path {
            None => VehicleState::Idle,
            Some(_) if self.fuel <= 0.0 => VehicleState::Stalled,
            Some(_) => VehicleState::Traveling,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.path.is_none()
    }

    /// Start a trip along `path`
    ///
    /// The vehicle must be idle and the path must run from `origin` to
    /// `destination`.
    pub fn assign_destination(
        &mut self,
        origin: Coord,
        destination: Coord,
        path: Path,
    ) -> Result<(), SimError> {
        if !self.is_idle() {
            return Err(SimError::NotIdle(self.id));
        }
        if path.start() != origin {
            return Err(SimError::InvalidEndpoint {
                coord: origin,
                kind: None,
            });
        }
        if path.end() != destination {
            return Err(SimError::InvalidEndpoint {
                coord: destination,
                kind: None,
            });
        }

        self.origin = Some(origin);
        self.destination = Some(destination);
        self.position = Some(origin.to_position());
        self.path = Some(path);
        self.path_index = 0;
        self.progress = 0;
        Ok(())
    }

    /// Path cells not yet reached
    pub fn remaining_path(&self) -> &[Coord] {
        match &self.path {
            Some(path) => &path.cells()[(self.path_index + 1).min(path.node_count())..],
            None => &[],
        }
    }

    fn burn_fuel(&mut self) {
        self.fuel = (self.fuel - FUEL_PER_TICK).max(0.0);
        if self.fuel < FUEL_EPSILON {
            self.fuel = 0.0;
        }
    }

    /// Park at the destination and drop the trip
    fn arrive(&mut self, destination: Coord, refueled: bool) -> VehicleUpdateResult {
        self.position = None;
        self.path = None;
        self.path_index = 0;
        self.progress = 0;
        self.origin = None;
        self.destination = None;
        self.parked_at = Some(destination);
        self.trips_completed += 1;
        VehicleUpdateResult::Arrived {
            destination,
            refueled,
        }
    }

    /// Advance the vehicle by one tick
    ///
    /// On reaching a fuel spot the spot is cleared from `grid` and the tank is
    /// topped up.
    pub fn update(&mut self, grid: &mut GridMap) -> Result<VehicleUpdateResult, SimError> {
        let (from, next, last_index) = match &self.path {
            None => return Ok(VehicleUpdateResult::Idle),
            Some(path) => (
                path.cells()[self.path_index.min(path.steps())],
                path.get(self.path_index + 1),
                path.steps(),
            ),
        };

        // Single-cell trip: already standing on the destination
        let Some(to) = next else {
            return Ok(self.arrive(from, false));
        };

        if self.fuel <= 0.0 {
            return Ok(VehicleUpdateResult::Stalled);
        }

        self.progress += 1;
        self.burn_fuel();

        if self.progress < STEPS_PER_SEGMENT {
            let ratio = self.progress as f32 / STEPS_PER_SEGMENT as f32;
            self.position = Some(from.to_position().lerp(&to.to_position(), ratio));
            return Ok(VehicleUpdateResult::Moved { refueled: false });
        }

        self.progress = 0;
        self.path_index += 1;
        self.position = Some(to.to_position());

        let refueled = grid.clear_fuel_spot(to)?;
        if refueled {
            self.fuel += REFUEL_AMOUNT;
            self.refuels += 1;
        }

        if self.path_index >= last_index {
            return Ok(self.arrive(to, refueled));
        }

        Ok(VehicleUpdateResult::Moved { refueled })
    }
}
