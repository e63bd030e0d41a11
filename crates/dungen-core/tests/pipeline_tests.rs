//! End-to-end pipeline tests: full generation runs checked against the
//! structural guarantees every stage is supposed to uphold.

use proptest::prelude::*;

use dungen_core::map::{
    minimum_spanning_tree, triangulate, GeneratedMap, GridPoint, TileType,
};
use dungen_core::{ConnectionKind, MapGenerator, MapSettings, MinMax, PlacementKind};

fn generate(settings: MapSettings, seed: u64) -> GeneratedMap {
    MapGenerator::new(settings)
        .expect("settings must validate")
        .generate_seeded(seed)
}

/// Rooms keep their clearance margin: no pair passes the overlap test.
fn assert_clearance(map: &GeneratedMap) {
    for a in &map.rooms {
        for b in &map.rooms {
            if a.index < b.index {
                assert!(
                    !a.overlaps(b.coordinates, b.size),
                    "rooms {} and {} are too close",
                    a.index,
                    b.index
                );
            }
        }
    }
}

/// After wall derivation no occupied tile touches a bare `Empty` cell.
fn assert_walls_complete(map: &GeneratedMap) {
    let size = map.grid.size();
    for x in 0..size.x {
        for z in 0..size.z {
            if map.grid.get(GridPoint::new(x, z)) == TileType::Empty {
                assert!(
                    !map.grid.is_adjacent_to_occupied(x, z),
                    "unwalled empty cell at ({x}, {z})"
                );
            }
        }
    }
}

/// Every room is reachable from room 0 through the corridor list.
fn assert_graph_connected(map: &GeneratedMap) {
    if map.rooms.is_empty() {
        return;
    }
    let mut seen = vec![false; map.rooms.len()];
    let mut stack = vec![0usize];
    seen[0] = true;
    while let Some(node) = stack.pop() {
        for corridor in &map.corridors {
            if corridor.touches(node) {
                let other = if corridor.rooms[0] == node {
                    corridor.rooms[1]
                } else {
                    corridor.rooms[0]
                };
                if !seen[other] {
                    seen[other] = true;
                    stack.push(other);
                }
            }
        }
    }
    assert!(seen.into_iter().all(|s| s), "corridor graph is disconnected");
}

#[test]
fn fixed_size_rooms_yield_spanning_tree() {
    let settings = MapSettings {
        map_size: GridPoint::new(20, 20),
        room_count: 5,
        room_size: MinMax::fixed(3),
        placement: PlacementKind::Random,
        ..MapSettings::default()
    };

    let mut full_runs = 0;
    for seed in 0..8 {
        let map = generate(settings.clone(), seed);
        assert!(map.rooms.len() <= 5);
        for room in &map.rooms {
            assert_eq!(room.size, GridPoint::new(3, 3));
        }
        assert_clearance(&map);

        // Whatever was placed, the MST alone spans it with n - 1 edges.
        let candidates = triangulate(&map.rooms, settings.map_size);
        let mst = minimum_spanning_tree(&map.rooms, &candidates);
        assert_eq!(mst.len(), map.rooms.len().saturating_sub(1));

        assert_graph_connected(&map);
        if map.rooms.len() == 5 {
            full_runs += 1;
        }
    }
    // A 20x20 map holds five 3x3 rooms comfortably; placement should
    // nearly always succeed.
    assert!(full_runs >= 6, "only {full_runs} of 8 runs placed all rooms");
}

#[test]
fn direct_door_pair_abuts_without_corridors() {
    let settings = MapSettings {
        map_size: GridPoint::new(30, 30),
        room_count: 2,
        room_size: MinMax::fixed(4),
        connection: ConnectionKind::DirectDoor,
        ..MapSettings::default()
    };

    let mut connected_runs = 0;
    for seed in 0..8 {
        let map = generate(settings.clone(), seed);
        assert!(map.corridors.is_empty());
        assert_eq!(map.grid.count(TileType::Corridor), 0);

        if map.rooms.len() == 2 && !map.rooms[0].doors.is_empty() {
            connected_runs += 1;
            let a = &map.rooms[0];
            let b = &map.rooms[1];
            assert_eq!(a.doors.len(), 1);
            assert_eq!(b.doors.len(), 1);
            assert_eq!(a.doors[0].direction, b.doors[0].direction.opposite());
            assert_eq!(a.doors[0].connected_room, 1);
            assert_eq!(b.doors[0].connected_room, 0);

            // Exactly one tile of gap on the connection axis.
            let direction = a.doors[0].direction;
            let gap = if direction.is_horizontal() {
                (b.coordinates.x - a.coordinates.x).abs()
                    - if b.coordinates.x > a.coordinates.x {
                        a.size.x
                    } else {
                        b.size.x
                    }
            } else {
                (b.coordinates.z - a.coordinates.z).abs()
                    - if b.coordinates.z > a.coordinates.z {
                        a.size.z
                    } else {
                        b.size.z
                    }
            };
            assert_eq!(gap, 1);

            // The doors landed on the grid.
            assert!(map.grid.count(TileType::Door) >= 1);
        }
        assert_walls_complete(&map);
    }
    assert!(connected_runs >= 4, "only {connected_runs} of 8 pairs connected");
}

#[test]
fn grid_based_nine_rooms_fill_a_three_by_three() {
    let settings = MapSettings {
        map_size: GridPoint::new(50, 50),
        room_count: 9,
        room_size: MinMax::new(3, 5),
        placement: PlacementKind::GridBased,
        ..MapSettings::default()
    };
    let map = generate(settings, 42);

    assert_eq!(map.rooms.len(), 9);
    assert_clearance(&map);

    // Each room center falls in its own cell of the 3x3 logical grid.
    let cell = 50.0 / 3.0;
    let mut occupied = [[false; 3]; 3];
    for room in &map.rooms {
        let (cx, cz) = room.center();
        let column = ((cx / cell) as usize).min(2);
        let row = ((cz / cell) as usize).min(2);
        assert!(
            !occupied[column][row],
            "two rooms share logical cell ({column}, {row})"
        );
        occupied[column][row] = true;
    }
}

#[test]
fn corridors_touch_both_endpoint_rooms() {
    let settings = MapSettings {
        map_size: GridPoint::new(60, 60),
        room_count: 7,
        ..MapSettings::default()
    };
    let map = generate(settings, 99);

    for corridor in &map.corridors {
        for &index in &corridor.rooms {
            assert!(index < map.rooms.len(), "corridor references missing room");
        }
    }
    // Corridor tiles exist and no tile type other than the five known ones
    // appears (render covers the whole grid without panicking).
    assert!(map.grid.count(TileType::Corridor) > 0);
    let rows = map.grid.render_ascii();
    assert_eq!(rows.len(), 60);
}

#[test]
fn map_serializes_and_restores() {
    let map = generate(MapSettings::default(), 7);
    let json = serde_json::to_string(&map).expect("map serializes");
    let back: GeneratedMap = serde_json::from_str(&json).expect("map deserializes");

    assert_eq!(back.seed, map.seed);
    assert_eq!(back.rooms.len(), map.rooms.len());
    assert_eq!(back.grid.render_ascii(), map.grid.render_ascii());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Any seed and strategy combination upholds the structural
    /// invariants: clearance, complete walls, connected corridor graph.
    #[test]
    fn generation_invariants_hold(
        seed in any::<u64>(),
        room_count in 2usize..10,
        placement_pick in 0u8..3,
        direct_doors in any::<bool>(),
    ) {
        let placement = match placement_pick {
            0 => PlacementKind::Random,
            1 => PlacementKind::GridBased,
            _ => PlacementKind::Clustered,
        };
        let settings = MapSettings {
            map_size: GridPoint::new(48, 48),
            room_count,
            room_size: MinMax::new(3, 6),
            placement,
            connection: if direct_doors {
                ConnectionKind::DirectDoor
            } else {
                ConnectionKind::Corridor
            },
            ..MapSettings::default()
        };
        let mut map = generate(settings, seed);

        prop_assert!(!map.rooms.is_empty());
        assert_walls_complete(&map);

        // Re-deriving walls on a finished map changes nothing.
        let walls_before = map.grid.count(TileType::Wall);
        dungen_core::map::derive_walls(&mut map.grid);
        prop_assert_eq!(map.grid.count(TileType::Wall), walls_before);
        if direct_doors {
            prop_assert!(map.corridors.is_empty());
        } else {
            assert_clearance(&map);
            assert_graph_connected(&map);

            // Rooms never move in corridor mode, so every floor tile
            // survives the later stages.
            for room in &map.rooms {
                for cell in room.cells() {
                    prop_assert_eq!(map.grid.get(cell), TileType::Room);
                }
            }
        }
    }

    /// The same seed always reproduces the same map.
    #[test]
    fn generation_is_deterministic(seed in any::<u64>()) {
        let generator = MapGenerator::new(MapSettings::default()).expect("valid settings");
        let a = generator.generate_seeded(seed);
        let b = generator.generate_seeded(seed);
        prop_assert_eq!(a.grid.render_ascii(), b.grid.render_ascii());
    }
}
