//! Standalone grid traffic simulation module
//!
//! This module contains all the simulation logic: the grid, A* routing,
//! vehicle movement and the driver that ties them together. It has no
//! rendering dependencies and can be tested from the console.

mod economy;
mod error;
mod grid;
mod map_loader;
mod pathfinder;
mod types;
mod vehicle;
mod world;

pub use economy::{FuelEconomy, FUEL_SPOTS_PER_ARRIVAL, STARTING_FUEL_SPOTS};
pub use error::{MapError, SimError};
pub use grid::GridMap;
pub use map_loader::{load_map, parse_map};
pub use pathfinder::{find_path, Path, Pathfinder};
pub use types::{
    CellKind, Coord, Position, SimId, VehicleId, DEFAULT_TICK_RATE, FUEL_EPSILON, FUEL_PER_TICK,
    MAX_ROUTE_ATTEMPTS, MAX_TICK_RATE, MIN_TICK_RATE, REFUEL_AMOUNT, STARTING_FUEL,
    STEPS_PER_SEGMENT,
};
pub use vehicle::{SimVehicle, VehicleState, VehicleUpdateResult};
pub use world::{SimWorld, VehicleSnapshot, WorldSnapshot};
