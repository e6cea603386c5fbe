//! Occupancy grid with the fuel-spot overlay
//!
//! The layout of trees, houses and roads is fixed once the map is loaded.
//! Only fuel spots change at runtime, and they never change passability.

use std::fmt;

use super::error::{MapError, SimError};
use super::types::{CellKind, Coord};

/// A fixed-size grid of cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    width: usize,
    height: usize,
    /// Row-major cell storage
    cells: Vec<CellKind>,
    /// House coordinates in row-major order, computed once
    houses: Vec<Coord>,
}

impl GridMap {
    /// Build a grid from rows of cells
    ///
    /// Every row must have the same, non-zero length.
    pub fn from_rows(rows: Vec<Vec<CellKind>>) -> Result<Self, MapError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(MapError::Empty);
        }

        let mut cells = Vec::with_capacity(width * height);
        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(MapError::Ragged {
                    row: row_index,
                    expected: width,
                    found: row.len(),
                });
            }
            cells.extend(row);
        }

        let houses = cells
            .iter()
            .enumerate()
            .filter(|(_, kind)| **kind == CellKind::House)
            .map(|(index, _)| Coord::new(index % width, index / width))
            .collect();

        Ok(Self {
            width,
            height,
            cells,
            houses,
        })
    }

    /// A grid where every cell is road
    pub fn all_road(width: usize, height: usize) -> Result<Self, MapError> {
        Self::from_rows(vec![vec![CellKind::Road; width]; height])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.col < self.width && coord.row < self.height
    }

    fn index(&self, coord: Coord) -> Result<usize, SimError> {
        if self.contains(coord) {
            Ok(coord.row * self.width + coord.col)
        } else {
            Err(SimError::OutOfBounds {
                coord,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn cell_kind(&self, coord: Coord) -> Result<CellKind, SimError> {
        let index = self.index(coord)?;
        Ok(self.cells[index])
    }

    /// Road and fuel-spot cells are passable; trees and houses are not
    pub fn is_passable(&self, coord: Coord) -> Result<bool, SimError> {
        Ok(self.cell_kind(coord)?.is_passable())
    }

    /// Turn a road cell into a fuel spot
    pub fn place_fuel_spot(&mut self, coord: Coord) -> Result<(), SimError> {
        let index = self.index(coord)?;
        match self.cells[index] {
            CellKind::Road => {
                self.cells[index] = CellKind::FuelSpot;
                Ok(())
            }
            kind => Err(SimError::AlreadyOccupied { coord, kind }),
        }
    }

    /// Turn a fuel spot back into road
    ///
    /// Returns `true` when a spot was actually removed. Clearing any other
    /// kind of cell does nothing.
    pub fn clear_fuel_spot(&mut self, coord: Coord) -> Result<bool, SimError> {
        let index = self.index(coord)?;
        if self.cells[index] == CellKind::FuelSpot {
            self.cells[index] = CellKind::Road;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// All house cells, the pool of trip origins and destinations
    pub fn houses(&self) -> &[Coord] {
        &self.houses
    }

    pub fn fuel_spot_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|kind| **kind == CellKind::FuelSpot)
            .count()
    }

    /// In-bounds 4-directional neighbours of a cell, regardless of kind
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        let Coord { col, row } = coord;
        [
            col.checked_add(1).map(|c| Coord::new(c, row)),
            col.checked_sub(1).map(|c| Coord::new(c, row)),
            row.checked_add(1).map(|r| Coord::new(col, r)),
            row.checked_sub(1).map(|r| Coord::new(col, r)),
        ]
        .into_iter()
        .flatten()
        .filter(move |neighbor| self.contains(*neighbor))
    }

    /// Iterate over every cell with its coordinate, row by row
    pub fn cells(&self) -> impl Iterator<Item = (Coord, CellKind)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, kind)| (Coord::new(index % self.width, index / self.width), *kind))
    }

    /// Iterate over the rows of the grid
    pub fn rows(&self) -> impl Iterator<Item = &[CellKind]> {
        self.cells.chunks(self.width)
    }
}

impl fmt::Display for GridMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|kind| kind.glyph()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
