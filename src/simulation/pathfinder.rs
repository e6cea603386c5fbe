//! Grid graph for pathfinding
//!
//! The grid is turned into a petgraph directed graph once, since trees and
//! houses never move. Routes are found with A* and a Manhattan heuristic.

use petgraph::algo::astar;
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};
use petgraph::visit::{EdgeFiltered, EdgeRef};
use std::collections::{HashMap, HashSet};

use super::error::SimError;
use super::grid::GridMap;
use super::types::{CellKind, Coord};

/// A route through the grid
///
/// Always holds at least one cell. Consecutive cells are 4-adjacent; the first
/// cell is the start and the last is the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path(Vec<Coord>);

impl Path {
    /// Wrap a cell sequence, rejecting empty or non-contiguous ones
    pub fn new(cells: Vec<Coord>) -> Option<Self> {
        if cells.is_empty() || cells.windows(2).any(|pair| !pair[0].is_adjacent(&pair[1])) {
            return None;
        }
        Some(Self(cells))
    }

    pub fn cells(&self) -> &[Coord] {
        &self.0
    }

    /// Number of cells, including both endpoints
    pub fn node_count(&self) -> usize {
        self.0.len()
    }

    /// Number of moves, one per segment
    pub fn steps(&self) -> usize {
        self.0.len() - 1
    }

    pub fn start(&self) -> Coord {
        self.0[0]
    }

    pub fn end(&self) -> Coord {
        self.0[self.0.len() - 1]
    }

    pub fn get(&self, index: usize) -> Option<Coord> {
        self.0.get(index).copied()
    }
}

/// Pathfinding graph over a grid's static layout
///
/// Every non-tree cell is a node and adjacent nodes are linked in both
/// directions. Houses are nodes too, but a route may only use a house as its
/// first or last cell; edges touching any other house are filtered out per
/// query.
#[derive(Debug, Clone, Default)]
pub struct Pathfinder {
    /// The underlying petgraph directed graph
    graph: DiGraph<Coord, ()>,

    /// Maps grid cells to their node indices in the graph
    cell_to_node: HashMap<Coord, NodeIndex>,

    /// Nodes that sit on house cells
    house_nodes: HashSet<NodeIndex>,

    /// Cached routes, keyed by (start, end)
    path_cache: HashMap<(Coord, Coord), Path>,
}

impl Pathfinder {
    /// Build the graph for a grid
    pub fn new(grid: &GridMap) -> Self {
        let mut pathfinder = Self::default();

        for (coord, kind) in grid.cells() {
            if kind == CellKind::Tree {
                continue;
            }
            let node = pathfinder.graph.add_node(coord);
            pathfinder.cell_to_node.insert(coord, node);
            if kind == CellKind::House {
                pathfinder.house_nodes.insert(node);
            }
        }

        // Row-major edge order keeps tie-breaking identical across rebuilds
        for (coord, _) in grid.cells() {
            let Some(&node) = pathfinder.cell_to_node.get(&coord) else {
                continue;
            };
            for neighbor in grid.neighbors(coord) {
                if let Some(&neighbor_node) = pathfinder.cell_to_node.get(&neighbor) {
                    pathfinder.graph.add_edge(node, neighbor_node, ());
                }
            }
        }

        pathfinder
    }

    /// Number of routable cells in the graph
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn endpoint_node(&self, grid: &GridMap, coord: Coord) -> Result<NodeIndex, SimError> {
        let kind = grid
            .cell_kind(coord)
            .map_err(|_| SimError::InvalidEndpoint { coord, kind: None })?;

        self.cell_to_node
            .get(&coord)
            .copied()
            .ok_or(SimError::InvalidEndpoint {
                coord,
                kind: Some(kind),
            })
    }

    /// Find a shortest route between two cells using A*
    ///
    /// Returns `Ok(None)` when no route exists. Endpoints must be in bounds and
    /// must be road, fuel spot or house cells.
    pub fn find_path(
        &mut self,
        grid: &GridMap,
        start: Coord,
        end: Coord,
    ) -> Result<Option<Path>, SimError> {
        let start_node = self.endpoint_node(grid, start)?;
        let end_node = self.endpoint_node(grid, end)?;

        if start == end {
            return Ok(Some(Path(vec![start])));
        }

        // Check cache first
        if let Some(path) = self.path_cache.get(&(start, end)) {
            return Ok(Some(path.clone()));
        }

        let graph = &self.graph;
        let house_nodes = &self.house_nodes;
        let routable = EdgeFiltered::from_fn(graph, |edge: EdgeReference<'_, ()>| {
            (edge.source() == start_node || !house_nodes.contains(&edge.source()))
                && (edge.target() == end_node || !house_nodes.contains(&edge.target()))
        });

        let result = astar(
            &routable,
            start_node,
            |node| node == end_node,
            |_| 1u32,
            |node| graph[node].manhattan(&end) as u32,
        );

        let Some((_, node_path)) = result else {
            return Ok(None);
        };

        let path = Path(node_path.iter().map(|node| graph[*node]).collect());

        // Cache the result
        self.path_cache.insert((start, end), path.clone());

        Ok(Some(path))
    }
}

/// One-off route query that builds a throwaway graph
pub fn find_path(grid: &GridMap, start: Coord, end: Coord) -> Result<Option<Path>, SimError> {
    Pathfinder::new(grid).find_path(grid, start, end)
}
