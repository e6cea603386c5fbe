//! Error taxonomy for the simulation
//!
//! A route that does not exist is not an error: the pathfinder reports it as
//! `Ok(None)`. Everything here is either a caller bug or a rejected command.

use thiserror::Error;

use super::types::{CellKind, Coord, VehicleId};

/// Errors raised by the grid, the pathfinder, vehicles and the driver
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("coordinate {coord} lies outside the {width}x{height} grid")]
    OutOfBounds {
        coord: Coord,
        width: usize,
        height: usize,
    },

    #[error("cell {coord} ({kind:?}) cannot start or end a route")]
    InvalidEndpoint { coord: Coord, kind: Option<CellKind> },

    #[error("cell {coord} is {kind:?}; fuel spots can only be placed on road")]
    AlreadyOccupied { coord: Coord, kind: CellKind },

    #[error("no fuel spots left to place")]
    NoAllowance,

    #[error("vehicle {0} is already traveling")]
    NotIdle(VehicleId),
}

/// Errors raised while parsing a map file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map contains no rows")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}, column {col}: invalid cell value {token:?}")]
    InvalidCell {
        row: usize,
        col: usize,
        token: String,
    },
}
