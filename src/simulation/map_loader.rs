//! Map file parsing
//!
//! One row per line, whitespace separated cell codes:
//! 0 = road, 1 = tree, 2 = house, 3 = fuel spot.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::error::MapError;
use super::grid::GridMap;
use super::types::CellKind;

/// Parse map text into a grid
pub fn parse_map(text: &str) -> Result<GridMap, MapError> {
    let mut rows = Vec::new();

    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        let row_index = rows.len();
        let row = line
            .split_whitespace()
            .enumerate()
            .map(|(col, token)| {
                token
                    .parse::<u8>()
                    .ok()
                    .and_then(CellKind::from_code)
                    .ok_or_else(|| MapError::InvalidCell {
                        row: row_index,
                        col,
                        token: token.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    GridMap::from_rows(rows)
}

/// Read and parse a map file
pub fn load_map(path: impl AsRef<Path>) -> Result<GridMap> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read map file {}", path.display()))?;
    let grid =
        parse_map(&text).with_context(|| format!("Malformed map file {}", path.display()))?;

    log::info!(
        "Loaded {}x{} map from {} ({} houses, {} fuel spots)",
        grid.width(),
        grid.height(),
        path.display(),
        grid.houses().len(),
        grid.fuel_spot_count()
    );

    Ok(grid)
}
