//! Core types for the grid traffic simulation
//!
//! These are plain data types shared by the grid, the pathfinder and the
//! vehicles.

use std::fmt;

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimId(pub usize);

/// A wrapper type for vehicle IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub SimId);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0 .0)
    }
}

/// What occupies a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Road,
    Tree,
    House,
    /// A road cell carrying a fuel spot
    FuelSpot,
}

impl CellKind {
    /// Whether the cell can be used as an interior pathfinding node
    pub fn is_passable(self) -> bool {
        matches!(self, CellKind::Road | CellKind::FuelSpot)
    }

    /// Parse a numeric code from the map file format
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(CellKind::Road),
            1 => Some(CellKind::Tree),
            2 => Some(CellKind::House),
            3 => Some(CellKind::FuelSpot),
            _ => None,
        }
    }

    /// Single character used by the terminal map
    pub fn glyph(self) -> char {
        match self {
            CellKind::Road => '.',
            CellKind::Tree => 'T',
            CellKind::House => 'H',
            CellKind::FuelSpot => 'F',
        }
    }
}

/// A grid cell address (column, row), 0-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub col: usize,
    pub row: usize,
}

impl Coord {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    /// Number of 4-directional steps between two cells
    pub fn manhattan(&self, other: &Coord) -> usize {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row)
    }

    pub fn is_adjacent(&self, other: &Coord) -> bool {
        self.manhattan(other) == 1
    }

    /// Continuous position of the cell's origin corner
    pub fn to_position(self) -> Position {
        Position::new(self.col as f32, self.row as f32)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// A continuous 2D position measured in cells
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(&self, other: &Position, t: f32) -> Position {
        Position {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// The cell this position currently lies in
    pub fn nearest_cell(&self) -> Coord {
        Coord::new(self.x.round().max(0.0) as usize, self.y.round().max(0.0) as usize)
    }
}

/// Ticks needed to cross one path segment
pub const STEPS_PER_SEGMENT: u32 = 10;

/// Fuel a freshly added vehicle starts with
pub const STARTING_FUEL: f32 = 100.0;

/// Fuel burned per tick of movement
pub const FUEL_PER_TICK: f32 = 0.2;

/// Fuel gained when driving onto a fuel spot
pub const REFUEL_AMOUNT: f32 = 50.0;

/// Fuel levels below half a tick's burn are treated as empty
pub const FUEL_EPSILON: f32 = FUEL_PER_TICK * 0.5;

/// Tick rate bounds and default, in ticks per second
pub const MIN_TICK_RATE: u32 = 10;
pub const MAX_TICK_RATE: u32 = 120;
pub const DEFAULT_TICK_RATE: u32 = 60;

/// Destination pairs tried per idle vehicle per tick
pub const MAX_ROUTE_ATTEMPTS: usize = 5;
