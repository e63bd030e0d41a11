//! Room placement strategies.
//!
//! All strategies share the clearance-based overlap test from [`Room`] and
//! mark accepted rooms into the grid as they go. Placement is best-effort:
//! when a strategy runs out of space it logs and returns what it managed to
//! place, leaving the rest of the pipeline to work with fewer rooms.

use log::{debug, warn};

use crate::rng::MapRng;
use crate::settings::{MapSettings, PlacementKind};

use super::grid::{GridPoint, MapGrid};
use super::room::Room;

/// Place rooms according to the configured strategy.
pub fn place_rooms(grid: &mut MapGrid, settings: &MapSettings, rng: &mut MapRng) -> Vec<Room> {
    match settings.placement {
        PlacementKind::Random => random_placement(grid, settings, rng),
        PlacementKind::GridBased => grid_based_placement(grid, settings, rng),
        PlacementKind::Clustered => clustered_placement(grid, settings, rng),
    }
}

/// Sample a room size, each axis independent within the configured range.
fn random_size(settings: &MapSettings, rng: &mut MapRng) -> GridPoint {
    GridPoint::new(
        rng.range_i32(settings.room_size.min, settings.room_size.max),
        rng.range_i32(settings.room_size.min, settings.room_size.max),
    )
}

/// Sample a position leaving at least one empty tile to every map border.
fn random_position(map_size: GridPoint, size: GridPoint, rng: &mut MapRng) -> GridPoint {
    GridPoint::new(
        rng.range_i32(1, map_size.x - size.x - 2),
        rng.range_i32(1, map_size.z - size.z - 2),
    )
}

fn overlaps_any(rooms: &[Room], coordinates: GridPoint, size: GridPoint) -> bool {
    rooms.iter().any(|room| room.overlaps(coordinates, size))
}

/// Accept a candidate box: append the room and mark its floor tiles.
fn accept(
    rooms: &mut Vec<Room>,
    grid: &mut MapGrid,
    coordinates: GridPoint,
    size: GridPoint,
) {
    let room = Room::new(rooms.len(), coordinates, size);
    room.mark_tiles(grid);
    rooms.push(room);
}

/// Clamp a coordinate into `[1, max]`, mirroring the behavior of the other
/// strategies' bounds correction (lower bound wins when the range is empty).
fn clamp_axis(value: i32, max: i32) -> i32 {
    if value < 1 {
        1
    } else if value > max {
        max
    } else {
        value
    }
}

/// Uniformly random placement with a retry budget per room.
///
/// The size is sampled once per room; only the position is re-rolled. When
/// a room exhausts its attempts the map is considered full and the
/// remaining rooms are abandoned.
fn random_placement(grid: &mut MapGrid, settings: &MapSettings, rng: &mut MapRng) -> Vec<Room> {
    let mut rooms = Vec::with_capacity(settings.room_count);
    let map_size = grid.size();

    for _ in 0..settings.room_count {
        let size = random_size(settings, rng);
        let mut placed = false;

        for _attempt in 0..100 {
            let coordinates = random_position(map_size, size, rng);
            if !overlaps_any(&rooms, coordinates, size) {
                accept(&mut rooms, grid, coordinates, size);
                placed = true;
                break;
            }
        }

        if !placed {
            warn!(
                "cannot place more rooms, stopping at {} of {}",
                rooms.len(),
                settings.room_count
            );
            break;
        }
    }

    rooms
}

/// Logical grid dimensions `(columns, rows)` for a room count, keeping the
/// cell aspect close to the map's aspect ratio.
fn grid_dimensions(room_count: usize, map_size: GridPoint) -> (i32, i32) {
    let ratio = map_size.x as f32 / map_size.z as f32;

    let mut rows = (room_count as f32 / ratio).sqrt().floor() as i32;
    if rows <= 0 {
        rows = 1;
    }
    let mut columns = (room_count as f32 / rows as f32).ceil() as i32;
    if columns <= 0 {
        columns = 1;
    }
    while columns * rows < room_count as i32 {
        rows += 1;
    }

    (columns, rows)
}

/// One room per cell of a logical grid, with jitter inside each cell.
///
/// Room sizes are capped at 80% of the cell (but never below the configured
/// minimum). Cells that stay empty after their retry budget are filled by a
/// random-placement fallback at the end.
fn grid_based_placement(grid: &mut MapGrid, settings: &MapSettings, rng: &mut MapRng) -> Vec<Room> {
    let mut rooms = Vec::with_capacity(settings.room_count);
    let map_size = grid.size();

    let (columns, rows) = grid_dimensions(settings.room_count, map_size);
    let cell_width = map_size.x as f32 / columns as f32;
    let cell_height = map_size.z as f32 / rows as f32;
    debug!(
        "logical grid {}x{} for {} rooms, cell {}x{}",
        columns, rows, settings.room_count, cell_width, cell_height
    );

    'cells: for row in 0..rows {
        for column in 0..columns {
            if rooms.len() >= settings.room_count {
                break 'cells;
            }

            let sampled = random_size(settings, rng);
            let size = GridPoint::new(
                sampled
                    .x
                    .min((cell_width * 0.8) as i32)
                    .max(settings.room_size.min),
                sampled
                    .z
                    .min((cell_height * 0.8) as i32)
                    .max(settings.room_size.min),
            );

            let mut placed = false;
            for _attempt in 0..10 {
                let center_x = (column as f32 + 0.5) * cell_width
                    + rng.range_f32(-cell_width * 0.15, cell_width * 0.15);
                let center_z = (row as f32 + 0.5) * cell_height
                    + rng.range_f32(-cell_height * 0.15, cell_height * 0.15);

                let coordinates = GridPoint::new(
                    clamp_axis(
                        (center_x - size.x as f32 / 2.0).floor() as i32,
                        map_size.x - size.x - 1,
                    ),
                    clamp_axis(
                        (center_z - size.z as f32 / 2.0).floor() as i32,
                        map_size.z - size.z - 1,
                    ),
                );

                if !overlaps_any(&rooms, coordinates, size) {
                    accept(&mut rooms, grid, coordinates, size);
                    placed = true;
                    break;
                }
            }

            if !placed {
                debug!("could not place a room in grid cell ({column}, {row})");
            }
        }
    }

    if rooms.len() < settings.room_count {
        let remaining = settings.room_count - rooms.len();
        debug!("filling {remaining} unplaced grid cells with random positions");
        // Single-shot attempts, more of them than rooms left.
        for _ in 0..remaining * 5 {
            let size = random_size(settings, rng);
            let coordinates = random_position(map_size, size, rng);
            if !overlaps_any(&rooms, coordinates, size) {
                accept(&mut rooms, grid, coordinates, size);
                if rooms.len() >= settings.room_count {
                    break;
                }
            }
        }
    }

    if rooms.len() < settings.room_count {
        warn!(
            "grid-based placement created {} of {} rooms",
            rooms.len(),
            settings.room_count
        );
    }
    rooms
}

/// Rooms ring the map center at radial distances that grow with the room
/// ordinal. The first room sits on the center itself.
fn clustered_placement(grid: &mut MapGrid, settings: &MapSettings, rng: &mut MapRng) -> Vec<Room> {
    let mut rooms = Vec::with_capacity(settings.room_count);
    let map_size = grid.size();
    let center = (map_size.x as f32 / 2.0, map_size.z as f32 / 2.0);

    let center_size = random_size(settings, rng);
    let center_coordinates = GridPoint::new(
        (center.0 - center_size.x as f32 / 2.0).floor() as i32,
        (center.1 - center_size.z as f32 / 2.0).floor() as i32,
    );

    // The center room must fit inside the one-tile border without being
    // moved; otherwise the radial layout has no anchor and random
    // placement takes over entirely.
    if center_coordinates.x < 1
        || center_coordinates.z < 1
        || center_coordinates.x > map_size.x - center_size.x - 1
        || center_coordinates.z > map_size.z - center_size.z - 1
    {
        warn!("could not place center room, falling back to random placement");
        return random_placement(grid, settings, rng);
    }
    accept(&mut rooms, grid, center_coordinates, center_size);

    for i in 1..settings.room_count {
        // Radial distance grows toward a third of the map width.
        let distance = (i as f32 / settings.room_count as f32) * (map_size.x as f32 / 3.0);
        let size = random_size(settings, rng);

        let mut placed = false;
        for _attempt in 0..50 {
            let angle = rng.angle_deg().to_radians();
            let x = center.0 + distance * angle.cos();
            let z = center.1 + distance * angle.sin();

            let coordinates = GridPoint::new(
                clamp_axis(
                    (x - size.x as f32 / 2.0).floor() as i32,
                    map_size.x - size.x - 1,
                ),
                clamp_axis(
                    (z - size.z as f32 / 2.0).floor() as i32,
                    map_size.z - size.z - 1,
                ),
            );

            if !overlaps_any(&rooms, coordinates, size) {
                accept(&mut rooms, grid, coordinates, size);
                placed = true;
                break;
            }
        }

        if !placed {
            warn!(
                "could not place all rooms in clustered mode, placed {}",
                rooms.len()
            );
            break;
        }
    }

    rooms
}
