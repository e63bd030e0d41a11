//! Connection carving: realize the room graph on the grid.
//!
//! Corridor mode walks the corridor list and carves each edge as an
//! L-shaped run. DirectDoor mode ignores the corridor list entirely:
//! it pulls connected rooms together until they abut with a one-tile gap
//! and cuts doorways through the shared strip.

use log::debug;

use crate::rng::MapRng;
use crate::settings::{ConnectionKind, MapSettings};

use super::corridor::Corridor;
use super::grid::{Direction, GridPoint, MapGrid, TileType};
use super::room::Room;

/// Realize the connections according to the configured strategy.
///
/// In DirectDoor mode the corridor list is cleared: the rooms themselves
/// carry the connectivity through their door lists, and no corridor tiles
/// exist on the grid.
pub fn connect_rooms(
    grid: &mut MapGrid,
    rooms: &mut [Room],
    corridors: &mut Vec<Corridor>,
    settings: &MapSettings,
    rng: &mut MapRng,
) {
    match settings.connection {
        ConnectionKind::Corridor => carve_corridors(grid, rooms, corridors, settings, rng),
        ConnectionKind::DirectDoor => {
            connect_directly(grid, rooms, settings, rng);
            corridors.clear();
        }
    }
}

fn carve_corridors(
    grid: &mut MapGrid,
    rooms: &[Room],
    corridors: &mut [Corridor],
    settings: &MapSettings,
    rng: &mut MapRng,
) {
    debug!("carving {} corridors", corridors.len());
    for corridor in corridors.iter_mut() {
        corridor.width = rng.range_i32(settings.corridor_width.min, settings.corridor_width.max);
        corridor.carve(grid, rooms);
    }
}

/// Pair rooms off a work queue and pull each pair together.
///
/// The head of the queue connects to its nearest remaining rooms (one, or
/// up to the configured limit when multi-connections are enabled); every
/// chosen target leaves the queue whether or not its alignment succeeded.
fn connect_directly(grid: &mut MapGrid, rooms: &mut [Room], settings: &MapSettings, rng: &mut MapRng) {
    debug!("processing direct connections for {} rooms", rooms.len());

    let mut queue: Vec<usize> = (0..rooms.len()).collect();
    while queue.len() > 1 {
        let primary = queue.remove(0);

        let mut targets = queue.clone();
        targets.sort_by(|&a, &b| {
            rooms[primary]
                .distance_to(&rooms[a])
                .total_cmp(&rooms[primary].distance_to(&rooms[b]))
        });
        let take = if settings.multi_connections {
            settings.max_connections_per_room
        } else {
            1
        };

        for &target in targets.iter().take(take) {
            connect_pair(grid, rooms, primary, target, settings, rng);
            queue.retain(|&r| r != target);
        }
    }
}

/// Align two rooms and cut a door through the shared wall strip.
/// Returns false when the alignment would push a room out of the map
/// interior; the rooms stay where they were in that case.
fn connect_pair(
    grid: &mut MapGrid,
    rooms: &mut [Room],
    primary: usize,
    target: usize,
    settings: &MapSettings,
    rng: &mut MapRng,
) -> bool {
    let direction = connection_direction(&rooms[primary], &rooms[target]);
    let width = rng.range_i32(settings.corridor_width.min, settings.corridor_width.max);

    if !align_rooms(grid, rooms, primary, target, direction) {
        debug!(
            "alignment of rooms {} and {} toward {} failed, keeping original positions",
            primary, target, direction
        );
        return false;
    }

    let (a, b) = pair_mut(rooms, primary, target);
    a.cut_door(grid, direction, b.index, width);
    b.cut_door(grid, direction.opposite(), a.index, width);

    // The strip between the rooms holds only the doors; any leftover cells
    // must read Empty so wall derivation rebuilds a clean shared wall.
    clear_wall_strip(grid, a, direction);
    clear_wall_strip(grid, b, direction.opposite());
    true
}

/// Dominant-axis direction from `a`'s center toward `b`'s center. Vertical
/// wins ties.
fn connection_direction(a: &Room, b: &Room) -> Direction {
    let (ax, az) = a.center();
    let (bx, bz) = b.center();
    let dx = bx - ax;
    let dz = bz - az;

    if dx.abs() > dz.abs() {
        if dx > 0.0 { Direction::East } else { Direction::West }
    } else if dz > 0.0 {
        Direction::North
    } else {
        Direction::South
    }
}

/// Move one of the two rooms so they abut with a one-tile gap on the
/// connection axis, centers aligned on the other axis.
///
/// For North/East the target room moves toward the primary; for
/// South/West the primary moves instead, so the moving room is always the
/// one on the far side of the connection.
fn align_rooms(
    grid: &mut MapGrid,
    rooms: &mut [Room],
    primary: usize,
    target: usize,
    direction: Direction,
) -> bool {
    let map_size = grid.size();

    rooms[primary].clear_tiles(grid);
    rooms[target].clear_tiles(grid);

    let mut offset1 = GridPoint::new(0, 0);
    let mut offset2 = GridPoint::new(0, 0);
    {
        let r1 = &rooms[primary];
        let r2 = &rooms[target];
        match direction {
            Direction::North => {
                offset2.z = r1.coordinates.z + r1.size.z - r2.coordinates.z + 1;
                offset2.x = r1.center_tile().x - r2.center_tile().x;
            }
            Direction::East => {
                offset2.x = r1.coordinates.x + r1.size.x - r2.coordinates.x + 1;
                offset2.z = r1.center_tile().z - r2.center_tile().z;
            }
            Direction::South => {
                offset1.z = r2.coordinates.z + r2.size.z - r1.coordinates.z + 1;
                offset1.x = r2.center_tile().x - r1.center_tile().x;
            }
            Direction::West => {
                offset1.x = r2.coordinates.x + r2.size.x - r1.coordinates.x + 1;
                offset1.z = r2.center_tile().z - r1.center_tile().z;
            }
        }
    }

    let moved1 = rooms[primary].coordinates + offset1;
    let moved2 = rooms[target].coordinates + offset2;
    let ok = fits_interior(moved1, rooms[primary].size, map_size)
        && fits_interior(moved2, rooms[target].size, map_size);

    if ok {
        rooms[primary].coordinates = moved1;
        rooms[target].coordinates = moved2;
    }
    rooms[primary].force_mark_tiles(grid);
    rooms[target].force_mark_tiles(grid);
    ok
}

/// A room fits the interior when a one-tile border remains on every side.
fn fits_interior(coordinates: GridPoint, size: GridPoint, map_size: GridPoint) -> bool {
    coordinates.x >= 1
        && coordinates.z >= 1
        && coordinates.x + size.x <= map_size.x - 1
        && coordinates.z + size.z <= map_size.z - 1
}

/// Reset the one-tile strip along a room's wall back to `Empty`, leaving
/// door and floor tiles untouched.
fn clear_wall_strip(grid: &mut MapGrid, room: &Room, direction: Direction) {
    let (start, length, step) = match direction {
        Direction::North => (
            GridPoint::new(room.coordinates.x, room.coordinates.z + room.size.z),
            room.size.x,
            GridPoint::new(1, 0),
        ),
        Direction::East => (
            GridPoint::new(room.coordinates.x + room.size.x, room.coordinates.z),
            room.size.z,
            GridPoint::new(0, 1),
        ),
        Direction::South => (
            GridPoint::new(room.coordinates.x, room.coordinates.z - 1),
            room.size.x,
            GridPoint::new(1, 0),
        ),
        Direction::West => (
            GridPoint::new(room.coordinates.x - 1, room.coordinates.z),
            room.size.z,
            GridPoint::new(0, 1),
        ),
    };

    let mut tile = start;
    for _ in 0..length {
        let current = grid.get(tile);
        if current == TileType::Wall || current == TileType::Empty {
            grid.set(tile, TileType::Empty);
        }
        tile = tile + step;
    }
}

fn pair_mut(rooms: &mut [Room], i: usize, j: usize) -> (&mut Room, &mut Room) {
    debug_assert_ne!(i, j);
    if i < j {
        let (left, right) = rooms.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = rooms.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}
