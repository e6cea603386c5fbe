//! Driver tests: trip assignment, the fuel-spot economy and commands

use grid_traffic::simulation::{
    parse_map, CellKind, Coord, FuelEconomy, GridMap, SimError, SimWorld, VehicleState,
    MAX_ROUTE_ATTEMPTS, MAX_TICK_RATE, MIN_TICK_RATE, STARTING_FUEL_SPOTS, STEPS_PER_SEGMENT,
};

/// Two houses joined by a single road cell
fn two_house_world(seed: u64) -> SimWorld {
    SimWorld::new_with_seed(parse_map("2 0 2\n").unwrap(), seed)
}

#[test]
fn test_new_world_defaults() {
    let world = two_house_world(1);

    assert!(world.vehicles().is_empty());
    assert!(!world.is_paused());
    assert_eq!(world.economy().allowance, STARTING_FUEL_SPOTS);
    assert_eq!(world.ticks(), 0);
}

#[test]
fn test_idle_vehicle_gets_a_trip() {
    let mut world = two_house_world(1);
    let id = world.add_vehicle();
    assert!(world.vehicle(id).unwrap().is_idle());

    world.tick();

    let vehicle = world.vehicle(id).unwrap();
    assert_eq!(vehicle.state(), VehicleState::Traveling);
    let origin = vehicle.origin.unwrap();
    let destination = vehicle.destination.unwrap();
    assert_ne!(origin, destination);
    assert!(world.grid().houses().contains(&origin));
    assert!(world.grid().houses().contains(&destination));
    assert_eq!(vehicle.progress, 1);
    assert_eq!(world.routes_assigned(), 1);
}

#[test]
fn test_arrival_awards_fuel_spot() {
    let mut world = two_house_world(9);
    let id = world.add_vehicle();

    // Two segments: the first tick assigns and moves
    for _ in 0..(STEPS_PER_SEGMENT * 2 - 1) {
        world.tick();
    }
    assert!(!world.vehicle(id).unwrap().is_idle());
    assert_eq!(world.economy().allowance, STARTING_FUEL_SPOTS);

    world.tick();

    let vehicle = world.vehicle(id).unwrap();
    assert_eq!(vehicle.state(), VehicleState::Idle);
    assert_eq!(vehicle.trips_completed, 1);
    assert_eq!(world.economy().allowance, STARTING_FUEL_SPOTS + 1);
    assert_eq!(world.economy().arrivals, 1);
}

#[test]
fn test_next_trip_starts_where_the_last_ended() {
    let mut world = two_house_world(4);
    let id = world.add_vehicle();

    for _ in 0..(STEPS_PER_SEGMENT * 2) {
        world.tick();
    }
    let parked_at = world.vehicle(id).unwrap().parked_at.unwrap();

    world.tick();

    let vehicle = world.vehicle(id).unwrap();
    assert_eq!(vehicle.origin, Some(parked_at));
    assert_ne!(vehicle.destination, Some(parked_at));
}

#[test]
fn test_unreachable_houses_leave_vehicle_idle() {
    let mut world = SimWorld::new_with_seed(parse_map("2 1 2\n").unwrap(), 3);
    let id = world.add_vehicle();

    world.tick();

    assert!(world.vehicle(id).unwrap().is_idle());
    assert_eq!(world.routing_failures(), MAX_ROUTE_ATTEMPTS as u32);
    assert_eq!(world.routes_assigned(), 0);

    world.tick();
    assert_eq!(world.routing_failures(), 2 * MAX_ROUTE_ATTEMPTS as u32);
}

#[test]
fn test_retry_finds_reachable_pair() {
    // The left house is walled off; the other two are connected
    let mut world = SimWorld::new_with_seed(parse_map("2 1 2 0 2\n").unwrap(), 11);
    let id = world.add_vehicle();
    let isolated = Coord::new(0, 0);

    for _ in 0..200 {
        world.tick();
        let vehicle = world.vehicle(id).unwrap();
        assert_ne!(vehicle.origin, Some(isolated));
        assert_ne!(vehicle.destination, Some(isolated));
    }

    assert!(world.routes_assigned() > 1);
    assert!(world.economy().arrivals > 0);
}

#[test]
fn test_no_houses_means_no_trips() {
    let mut world = SimWorld::new_with_seed(GridMap::all_road(4, 4).unwrap(), 2);
    let id = world.add_vehicle();

    world.tick();

    assert!(world.vehicle(id).unwrap().is_idle());
    assert_eq!(world.routing_failures(), 0);
}

#[test]
fn test_place_fuel_spot_spends_allowance() {
    let mut world = SimWorld::new(parse_map("2 0 1\n0 0 2\n").unwrap());
    let road = Coord::new(1, 0);

    world.place_fuel_spot(road).unwrap();

    assert_eq!(world.grid().cell_kind(road).unwrap(), CellKind::FuelSpot);
    assert_eq!(world.economy().allowance, STARTING_FUEL_SPOTS - 1);
    assert_eq!(world.economy().spots_placed, 1);
}

#[test]
fn test_rejected_placement_keeps_allowance() {
    let mut world = SimWorld::new(parse_map("2 0 1\n0 0 2\n").unwrap());

    let err = world.place_fuel_spot(Coord::new(2, 0)).unwrap_err();
    assert!(matches!(err, SimError::AlreadyOccupied { .. }));

    let err = world.place_fuel_spot(Coord::new(9, 9)).unwrap_err();
    assert!(matches!(err, SimError::OutOfBounds { .. }));

    assert_eq!(world.economy().allowance, STARTING_FUEL_SPOTS);
}

#[test]
fn test_no_allowance() {
    let mut world = SimWorld::new(GridMap::all_road(3, 3).unwrap())
        .with_economy(FuelEconomy::with_allowance(1));

    world.place_fuel_spot(Coord::new(0, 0)).unwrap();
    let err = world.place_fuel_spot(Coord::new(1, 1)).unwrap_err();

    assert_eq!(err, SimError::NoAllowance);
    assert_eq!(world.grid().cell_kind(Coord::new(1, 1)).unwrap(), CellKind::Road);
    assert_eq!(world.grid().fuel_spot_count(), 1);
}

#[test]
fn test_pause_stops_ticks() {
    let mut world = two_house_world(5);
    let id = world.add_vehicle();

    assert!(world.toggle_pause());
    world.tick();
    assert_eq!(world.advance(1.0), 0);

    assert_eq!(world.ticks(), 0);
    assert!(world.vehicle(id).unwrap().is_idle());

    assert!(!world.toggle_pause());
    world.tick();
    assert_eq!(world.ticks(), 1);
    assert!(!world.vehicle(id).unwrap().is_idle());
}

#[test]
fn test_tick_rate_is_clamped() {
    let mut world = two_house_world(5);

    assert_eq!(world.set_tick_rate(1), MIN_TICK_RATE);
    assert_eq!(world.set_tick_rate(10_000), MAX_TICK_RATE);
    assert_eq!(world.set_tick_rate(30), 30);
    assert_eq!(world.tick_rate(), 30);
}

#[test]
fn test_advance_follows_tick_rate() {
    let mut world = two_house_world(5);
    world.set_tick_rate(16);

    assert_eq!(world.advance(1.0), 16);
    assert_eq!(world.ticks(), 16);

    assert_eq!(world.advance(0.03), 0);
    assert_eq!(world.advance(0.03), 0);
    assert_eq!(world.advance(0.03), 1);
}

#[test]
fn test_advance_runs_full_second_at_common_rates() {
    for rate in [10, 20, 30, 90] {
        let mut world = two_house_world(5);
        assert_eq!(world.set_tick_rate(rate), rate);

        assert_eq!(world.advance(1.0), rate, "rate {}", rate);
        assert_eq!(world.ticks(), rate as u64);
    }
}

#[test]
fn test_vehicle_picks_up_placed_fuel_spot() {
    let mut world = two_house_world(6);
    world.place_fuel_spot(Coord::new(1, 0)).unwrap();
    let id = world.add_vehicle();

    for _ in 0..STEPS_PER_SEGMENT {
        world.tick();
    }

    assert_eq!(world.vehicle(id).unwrap().refuels, 1);
    assert_eq!(world.economy().spots_consumed, 1);
    assert_eq!(world.grid().fuel_spot_count(), 0);
}

#[test]
fn test_snapshot_reflects_world() {
    let mut world = two_house_world(8);
    let id = world.add_vehicle();
    world.tick();

    let snapshot = world.snapshot();

    assert_eq!(snapshot.width, 3);
    assert_eq!(snapshot.height, 1);
    assert_eq!(
        snapshot.cells,
        vec![CellKind::House, CellKind::Road, CellKind::House]
    );
    assert_eq!(snapshot.house_count, 2);
    assert_eq!(snapshot.fuel_allowance, STARTING_FUEL_SPOTS);
    assert_eq!(snapshot.ticks, 1);

    let vehicle = &snapshot.vehicles[0];
    assert_eq!(vehicle.id, id);
    assert_eq!(vehicle.state, VehicleState::Traveling);
    assert!(vehicle.position.is_some());
    assert_eq!(vehicle.remaining_path.len(), 2);
}

#[test]
fn test_seeded_worlds_are_reproducible() {
    let map = include_str!("../maps/map.txt");
    let mut first = SimWorld::new_with_seed(parse_map(map).unwrap(), 42);
    let mut second = SimWorld::new_with_seed(parse_map(map).unwrap(), 42);

    for _ in 0..4 {
        first.add_vehicle();
        second.add_vehicle();
    }
    for _ in 0..300 {
        first.tick();
        second.tick();
    }

    assert_eq!(first.snapshot(), second.snapshot());
    assert!(first.routes_assigned() >= 4);
}
