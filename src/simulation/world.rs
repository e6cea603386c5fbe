//! Main simulation world that ties everything together
//!
//! `SimWorld` owns the grid, the vehicles and the fuel-spot economy. It is the
//! only way for a front end to change the simulation.

use log::{debug, info, warn};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::economy::FuelEconomy;
use super::error::SimError;
use super::grid::GridMap;
use super::pathfinder::Pathfinder;
use super::types::{
    CellKind, Coord, Position, SimId, VehicleId, DEFAULT_TICK_RATE, MAX_ROUTE_ATTEMPTS,
    MAX_TICK_RATE, MIN_TICK_RATE,
};
use super::vehicle::{SimVehicle, VehicleState, VehicleUpdateResult};

/// Read-only view of one vehicle for renderers
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSnapshot {
    pub id: VehicleId,
    pub state: VehicleState,
    pub position: Option<Position>,
    pub origin: Option<Coord>,
    pub destination: Option<Coord>,
    pub fuel: f32,
    /// Path cells still ahead of the vehicle
    pub remaining_path: Vec<Coord>,
}

/// Read-only view of the whole world for renderers
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSnapshot {
    pub width: usize,
    pub height: usize,
    /// Row-major cell kinds
    pub cells: Vec<CellKind>,
    pub vehicles: Vec<VehicleSnapshot>,
    pub house_count: usize,
    pub fuel_allowance: u32,
    pub paused: bool,
    pub tick_rate: u32,
    pub ticks: u64,
}

/// The main simulation world
pub struct SimWorld {
    /// The map, including live fuel spots
    grid: GridMap,

    /// Pathfinding graph built from the map layout
    pathfinder: Pathfinder,

    /// All vehicles, in creation order
    vehicles: Vec<SimVehicle>,

    /// Fuel-spot allowance and totals
    economy: FuelEconomy,

    /// Ticks per second of simulated time
    tick_rate: u32,

    paused: bool,

    /// Wall time not yet turned into ticks
    tick_accumulator: f32,

    /// Next ID to assign
    next_id: usize,

    /// Ticks run so far
    ticks: u64,

    /// Simulation time
    pub time: f32,

    /// Trips started
    routes_assigned: u32,

    /// Route queries that found no path
    routing_failures: u32,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl SimWorld {
    fn new_internal(grid: GridMap, rng: Option<StdRng>) -> Self {
        let pathfinder = Pathfinder::new(&grid);
        Self {
            grid,
            pathfinder,
            vehicles: Vec::new(),
            economy: FuelEconomy::new(),
            tick_rate: DEFAULT_TICK_RATE,
            paused: false,
            tick_accumulator: 0.0,
            next_id: 0,
            ticks: 0,
            time: 0.0,
            routes_assigned: 0,
            routing_failures: 0,
            rng,
        }
    }

    pub fn new(grid: GridMap) -> Self {
        Self::new_internal(grid, None)
    }

    /// Create a new SimWorld with a seeded RNG for reproducible simulations
    pub fn new_with_seed(grid: GridMap, seed: u64) -> Self {
        Self::new_internal(grid, Some(StdRng::seed_from_u64(seed)))
    }

    /// Replace the starting fuel-spot allowance
    pub fn with_economy(mut self, economy: FuelEconomy) -> Self {
        self.economy = economy;
        self
    }

    /// Get a random index below `len`, using seeded RNG if available
    fn random_index(&mut self, len: usize) -> usize {
        match &mut self.rng {
            Some(rng) => rng.random_range(0..len),
            None => rand::rng().random_range(0..len),
        }
    }

    fn next_sim_id(&mut self) -> SimId {
        let id = SimId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn grid(&self) -> &GridMap {
        &self.grid
    }

    pub fn vehicles(&self) -> &[SimVehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&SimVehicle> {
        self.vehicles.iter().find(|vehicle| vehicle.id == id)
    }

    pub fn economy(&self) -> &FuelEconomy {
        &self.economy
    }

    pub fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn routes_assigned(&self) -> u32 {
        self.routes_assigned
    }

    pub fn routing_failures(&self) -> u32 {
        self.routing_failures
    }

    /// Add an idle vehicle; it gets a trip on the next tick
    pub fn add_vehicle(&mut self) -> VehicleId {
        let id = VehicleId(self.next_sim_id());
        self.vehicles.push(SimVehicle::new(id));
        debug!("Added vehicle {}", id);
        id
    }

    /// Set ticks per second, clamped to the supported range
    /// Returns the rate actually applied
    pub fn set_tick_rate(&mut self, rate: u32) -> u32 {
        self.tick_rate = rate.clamp(MIN_TICK_RATE, MAX_TICK_RATE);
        self.tick_rate
    }

    /// Flip between running and paused
    /// Returns true if the world is now paused
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.tick_accumulator = 0.0;
        info!("Simulation {}", if self.paused { "paused" } else { "resumed" });
        self.paused
    }

    /// Place a fuel spot on a road cell, spending one unit of allowance
    ///
    /// The allowance is only spent when the grid accepts the spot.
    pub fn place_fuel_spot(&mut self, coord: Coord) -> Result<(), SimError> {
        if !self.economy.can_place() {
            warn!("Cannot place fuel spot at {}: no allowance left", coord);
            return Err(SimError::NoAllowance);
        }
        self.grid.place_fuel_spot(coord)?;
        self.economy.spend();
        info!(
            "Placed fuel spot at {} ({} left)",
            coord, self.economy.allowance
        );
        Ok(())
    }

    /// Pick a random house other than `origin`
    fn pick_destination(&mut self, origin: Coord) -> Option<Coord> {
        let house_count = self.grid.houses().len();
        let origin_index = self.grid.houses().iter().position(|house| *house == origin);

        let index = match origin_index {
            Some(origin_index) => {
                if house_count < 2 {
                    return None;
                }
                let index = self.random_index(house_count - 1);
                if index >= origin_index {
                    index + 1
                } else {
                    index
                }
            }
            None => {
                if house_count == 0 {
                    return None;
                }
                self.random_index(house_count)
            }
        };

        self.grid.houses().get(index).copied()
    }

    /// Try to start a trip for an idle vehicle
    /// Returns true if a route was assigned
    fn assign_trip(&mut self, index: usize) -> bool {
        let house_count = self.grid.houses().len();
        if house_count < 2 {
            return false;
        }

        let parked_at = self.vehicles[index].parked_at;

        for attempt in 1..=MAX_ROUTE_ATTEMPTS {
            let origin = match parked_at {
                Some(coord) => coord,
                None => {
                    let origin_index = self.random_index(house_count);
                    self.grid.houses()[origin_index]
                }
            };

            let Some(destination) = self.pick_destination(origin) else {
                return false;
            };

            match self.pathfinder.find_path(&self.grid, origin, destination) {
                Ok(Some(path)) => {
                    let steps = path.steps();
                    let vehicle = &mut self.vehicles[index];
                    return match vehicle.assign_destination(origin, destination, path) {
                        Ok(()) => {
                            self.routes_assigned += 1;
                            debug!(
                                "Vehicle {} heading from {} to {} ({} steps)",
                                vehicle.id, origin, destination, steps
                            );
                            true
                        }
                        Err(e) => {
                            warn!("Failed to assign trip: {}", e);
                            false
                        }
                    };
                }
                Ok(None) => {
                    self.routing_failures += 1;
                    debug!(
                        "No route from {} to {} (attempt {}/{})",
                        origin, destination, attempt, MAX_ROUTE_ATTEMPTS
                    );
                }
                Err(e) => {
                    self.routing_failures += 1;
                    warn!("Route query from {} to {} failed: {}", origin, destination, e);
                }
            }
        }

        warn!(
            "Vehicle {} found no route after {} attempts, staying idle",
            self.vehicles[index].id, MAX_ROUTE_ATTEMPTS
        );
        false
    }

    /// Update all vehicles in the simulation
    fn update_vehicles(&mut self) {
        for index in 0..self.vehicles.len() {
            if self.vehicles[index].is_idle() && !self.assign_trip(index) {
                continue;
            }

            let vehicle = &mut self.vehicles[index];
            let fuel_before = vehicle.fuel;
            let result = vehicle.update(&mut self.grid);
            let id = vehicle.id;
            let fuel_after = vehicle.fuel;

            match result {
                Ok(VehicleUpdateResult::Moved { refueled }) => {
                    if refueled {
                        self.economy.record_pickup();
                        debug!("Vehicle {} refueled to {:.1}", id, fuel_after);
                    } else if fuel_before > 0.0 && fuel_after <= 0.0 {
                        debug!("Vehicle {} ran out of fuel", id);
                    }
                }
                Ok(VehicleUpdateResult::Arrived {
                    destination,
                    refueled,
                }) => {
                    if refueled {
                        self.economy.record_pickup();
                    }
                    self.economy.record_arrival();
                    debug!(
                        "Vehicle {} arrived at {}, fuel spots available: {}",
                        id, destination, self.economy.allowance
                    );
                }
                Ok(VehicleUpdateResult::Stalled) | Ok(VehicleUpdateResult::Idle) => {}
                Err(e) => {
                    warn!("Vehicle {} update failed: {}", id, e);
                }
            }
        }
    }

    /// Main simulation tick
    ///
    /// Does nothing while paused.
    pub fn tick(&mut self) {
        if self.paused {
            return;
        }

        self.ticks += 1;
        self.time += 1.0 / self.tick_rate as f32;

        self.update_vehicles();
    }

    /// Run as many ticks as `elapsed_secs` of wall time allows at the current
    /// tick rate
    /// Returns the number of ticks run
    pub fn advance(&mut self, elapsed_secs: f32) -> u32 {
        if self.paused {
            return 0;
        }

        self.tick_accumulator += elapsed_secs;
        let rate = self.tick_rate as f32;
        // Tolerance absorbs rounding in the accumulated time
        let due = (self.tick_accumulator * rate + 1e-4).floor();
        self.tick_accumulator = (self.tick_accumulator - due / rate).max(0.0);

        let due = due as u32;
        for _ in 0..due {
            self.tick();
        }
        due
    }

    /// Capture the state a renderer needs
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            width: self.grid.width(),
            height: self.grid.height(),
            cells: self.grid.cells().map(|(_, kind)| kind).collect(),
            vehicles: self
                .vehicles
                .iter()
                .map(|vehicle| VehicleSnapshot {
                    id: vehicle.id,
                    state: vehicle.state(),
                    position: vehicle.position,
                    origin: vehicle.origin,
                    destination: vehicle.destination,
                    fuel: vehicle.fuel,
                    remaining_path: vehicle.remaining_path().to_vec(),
                })
                .collect(),
            house_count: self.grid.houses().len(),
            fuel_allowance: self.economy.allowance,
            paused: self.paused,
            tick_rate: self.tick_rate,
            ticks: self.ticks,
        }
    }

    fn count_in_state(&self, state: VehicleState) -> usize {
        self.vehicles
            .iter()
            .filter(|vehicle| vehicle.state() == state)
            .count()
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Grid Traffic Summary ===");
        println!("Time: {:.2}s ({} ticks)", self.time, self.ticks);
        println!(
            "Number of Vehicles: {} (traveling {}, stalled {}, idle {})",
            self.vehicles.len(),
            self.count_in_state(VehicleState::Traveling),
            self.count_in_state(VehicleState::Stalled),
            self.count_in_state(VehicleState::Idle)
        );
        println!("Number of Houses: {}", self.grid.houses().len());
        println!(
            "Tick Rate: {}{}",
            self.tick_rate,
            if self.paused { " (paused)" } else { "" }
        );
        println!("{}", self.economy.summary());
        println!(
            "Routes: {} assigned, {} not found",
            self.routes_assigned, self.routing_failures
        );

        if let Some(vehicle) = self
            .vehicles
            .iter()
            .filter(|vehicle| !vehicle.is_idle())
            .min_by_key(|vehicle| OrderedFloat(vehicle.fuel))
        {
            println!("Lowest fuel: vehicle {} at {:.1}", vehicle.id, vehicle.fuel);
        }

        let active: Vec<&SimVehicle> = self
            .vehicles
            .iter()
            .filter(|vehicle| !vehicle.is_idle())
            .collect();
        if !active.is_empty() {
            println!("--- Active Vehicles ---");
            for vehicle in active {
                let position = vehicle.position.unwrap_or_default();
                println!(
                    "  Vehicle {}: origin={}, destination={}, fuel={:.1}, position=({:.1}, {:.1}), path_remaining={}",
                    vehicle.id,
                    vehicle.origin.map(|c| c.to_string()).unwrap_or_default(),
                    vehicle.destination.map(|c| c.to_string()).unwrap_or_default(),
                    vehicle.fuel,
                    position.x,
                    position.y,
                    vehicle.remaining_path().len()
                );
            }
        }
    }

    /// Draw a visual map of the world in the terminal
    pub fn draw_map(&self) {
        let mut canvas: Vec<Vec<char>> = self
            .grid
            .rows()
            .map(|row| row.iter().map(|kind| kind.glyph()).collect())
            .collect();

        // Upcoming path cells, skipping houses
        for vehicle in &self.vehicles {
            for cell in vehicle.remaining_path() {
                let glyph = &mut canvas[cell.row][cell.col];
                if *glyph == CellKind::Road.glyph() {
                    *glyph = if vehicle.fuel > 0.0 { '*' } else { '!' };
                }
            }
        }

        for vehicle in &self.vehicles {
            if let Some(position) = vehicle.position {
                let cell = position.nearest_cell();
                if self.grid.contains(cell) {
                    canvas[cell.row][cell.col] = 'V';
                }
            }
        }

        println!("\n=== World Map ===");
        println!("Legend: .=Road, T=Tree, H=House, F=Fuel spot, V=Vehicle, *=Route, !=Route (no fuel)");
        println!();
        for row in &canvas {
            let line: String = row.iter().collect();
            println!("{}", line);
        }
        println!();
    }
}
