//! Grid Traffic Simulation Library
//!
//! Vehicles drive between houses on a fixed grid map, burning fuel and
//! picking up fuel spots along the way. The simulation runs headless and
//! exposes snapshots for any renderer.

pub mod simulation;
