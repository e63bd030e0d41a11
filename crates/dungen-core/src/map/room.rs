//! Rooms: axis-aligned boxes on the grid, plus their doorways.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::settings::RoomStyle;

use super::grid::{Direction, DirectionSet, GridPoint, MapGrid, TileType};

/// Clearance factor for the expanded-rectangle overlap test. Two rooms
/// conflict when their center distance per axis is below this fraction of
/// their summed sizes; 0.5 would be strict touching, 0.7 keeps a margin of
/// empty tiles between rooms.
pub const ROOM_CLEARANCE: f32 = 0.7;

/// A doorway cut into one side of a room.
///
/// At most one `DoorInfo` exists per direction; a second connection on the
/// same side replaces the tile list instead of adding a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoorInfo {
    pub direction: Direction,
    /// Index of the room on the other side of the door.
    pub connected_room: usize,
    /// Door tile coordinates in the wall strip, ordered along the wall.
    pub tiles: Vec<GridPoint>,
}

/// An axis-aligned rectangular room.
///
/// Occupies the half-open box `[coordinates, coordinates + size)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Stable ordinal, also the room's identity in the connection graph.
    pub index: usize,
    /// Lower-left corner.
    pub coordinates: GridPoint,
    /// Width (x) and depth (z), both at least the configured minimum.
    pub size: GridPoint,
    /// Opaque visual binding assigned from the settings; never interpreted.
    pub style: Option<RoomStyle>,
    /// Doorways cut into this room, one entry per used direction.
    pub doors: Vec<DoorInfo>,
    /// Which sides already carry a door.
    pub door_sides: DirectionSet,
}

impl Room {
    pub fn new(index: usize, coordinates: GridPoint, size: GridPoint) -> Self {
        Self {
            index,
            coordinates,
            size,
            style: None,
            doors: Vec::new(),
            door_sides: DirectionSet::default(),
        }
    }

    /// Geometric center in continuous coordinates.
    pub fn center(&self) -> (f32, f32) {
        (
            self.coordinates.x as f32 + self.size.x as f32 * 0.5,
            self.coordinates.z as f32 + self.size.z as f32 * 0.5,
        )
    }

    /// Center tile, rounded down. Corridors anchor on this.
    pub fn center_tile(&self) -> GridPoint {
        GridPoint::new(
            self.coordinates.x + self.size.x / 2,
            self.coordinates.z + self.size.z / 2,
        )
    }

    /// Euclidean distance between room centers.
    pub fn distance_to(&self, other: &Room) -> f32 {
        let (ax, az) = self.center();
        let (bx, bz) = other.center();
        ((ax - bx).powi(2) + (az - bz).powi(2)).sqrt()
    }

    /// Expanded-rectangle overlap test against a candidate box.
    ///
    /// Stricter than plain intersection: the clearance factor keeps a band
    /// of empty tiles between any two rooms.
    pub fn overlaps(&self, coordinates: GridPoint, size: GridPoint) -> bool {
        let dx = (self.coordinates.x - coordinates.x) as f32
            + (self.size.x - size.x) as f32 * 0.5;
        let dz = (self.coordinates.z - coordinates.z) as f32
            + (self.size.z - size.z) as f32 * 0.5;
        dx.abs() < (self.size.x + size.x) as f32 * ROOM_CLEARANCE
            && dz.abs() < (self.size.z + size.z) as f32 * ROOM_CLEARANCE
    }

    /// Iterate every coordinate in the room's box.
    pub fn cells(&self) -> impl Iterator<Item = GridPoint> + '_ {
        let coords = self.coordinates;
        let size = self.size;
        (0..size.x)
            .flat_map(move |x| (0..size.z).map(move |z| GridPoint::new(coords.x + x, coords.z + z)))
    }

    /// Mark the room's box as `Room` tiles. Cells that are already taken
    /// are left alone and logged; that indicates a placement bug upstream.
    pub fn mark_tiles(&self, grid: &mut MapGrid) {
        for cell in self.cells() {
            if grid.get(cell) == TileType::Empty {
                grid.set(cell, TileType::Room);
            } else {
                warn!("tile conflict at {} while marking room {}", cell, self.index);
            }
        }
    }

    /// Mark the room's box unconditionally. Used when re-marking after an
    /// alignment move, where the destination is known to be cleared.
    pub fn force_mark_tiles(&self, grid: &mut MapGrid) {
        for cell in self.cells() {
            grid.set(cell, TileType::Room);
        }
    }

    /// Reset the room's box back to `Empty`. Only cells currently marked
    /// `Room` are touched, so corridors and doors crossing the perimeter
    /// survive.
    pub fn clear_tiles(&self, grid: &mut MapGrid) {
        for cell in self.cells() {
            if grid.get(cell) == TileType::Room {
                grid.set(cell, TileType::Empty);
            }
        }
    }

    /// Midpoint of the room's wall facing `direction`, on the perimeter.
    pub fn door_anchor(&self, direction: Direction) -> GridPoint {
        match direction {
            Direction::North => GridPoint::new(
                self.coordinates.x + self.size.x / 2,
                self.coordinates.z + self.size.z - 1,
            ),
            Direction::East => GridPoint::new(
                self.coordinates.x + self.size.x - 1,
                self.coordinates.z + self.size.z / 2,
            ),
            Direction::South => {
                GridPoint::new(self.coordinates.x + self.size.x / 2, self.coordinates.z)
            }
            Direction::West => {
                GridPoint::new(self.coordinates.x, self.coordinates.z + self.size.z / 2)
            }
        }
    }

    /// Cut a door of the given width through the wall strip just outside
    /// the room on `direction`, recording it in the door list.
    ///
    /// A second connection in the same direction replaces the previous
    /// door's tiles rather than adding another entry.
    pub fn cut_door(
        &mut self,
        grid: &mut MapGrid,
        direction: Direction,
        connected_room: usize,
        width: i32,
    ) {
        let tiles = self.door_tiles(direction, width);
        for &tile in &tiles {
            // Only claim cells nothing passable owns yet.
            let current = grid.get(tile);
            if current == TileType::Empty || current == TileType::Wall {
                grid.set(tile, TileType::Door);
            }
        }

        if let Some(existing) = self.doors.iter_mut().find(|d| d.direction == direction) {
            existing.connected_room = connected_room;
            existing.tiles = tiles;
        } else {
            self.doors.push(DoorInfo {
                direction,
                connected_room,
                tiles,
            });
        }
        self.door_sides.add(direction);
    }

    /// Door tile coordinates for a door of `width` centered on the wall
    /// facing `direction`, in the one-tile strip outside the room.
    fn door_tiles(&self, direction: Direction, width: i32) -> Vec<GridPoint> {
        let half = width / 2;
        let start = match direction {
            Direction::North => GridPoint::new(
                self.coordinates.x + self.size.x / 2 - half,
                self.coordinates.z + self.size.z,
            ),
            Direction::East => GridPoint::new(
                self.coordinates.x + self.size.x,
                self.coordinates.z + self.size.z / 2 - half,
            ),
            Direction::South => GridPoint::new(
                self.coordinates.x + self.size.x / 2 - half,
                self.coordinates.z - 1,
            ),
            Direction::West => GridPoint::new(
                self.coordinates.x - 1,
                self.coordinates.z + self.size.z / 2 - half,
            ),
        };

        (0..width)
            .map(|i| match direction {
                Direction::North | Direction::South => GridPoint::new(start.x + i, start.z),
                Direction::East | Direction::West => GridPoint::new(start.x, start.z + i),
            })
            .collect()
    }

    /// Check whether a coordinate is one of this room's door tiles.
    pub fn is_door_tile(&self, point: GridPoint) -> bool {
        self.doors
            .iter()
            .any(|info| info.tiles.iter().any(|&t| t == point))
    }
}
