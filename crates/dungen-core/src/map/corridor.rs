//! Corridors: graph edges between two rooms, carved as L-shaped tile runs.

use serde::{Deserialize, Serialize};

use super::grid::{GridPoint, MapGrid, TileType};
use super::room::Room;

/// A connection between two rooms.
///
/// `rooms[0]` is the far room and `rooms[1]` the origin; the corridor runs
/// horizontally along the far room's center row and vertically along the
/// origin's center column, meeting at the elbow coordinate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corridor {
    /// Endpoint room indices, `[far, origin]`.
    pub rooms: [usize; 2],
    /// The elbow where the corridor turns from one axis to the other.
    pub coordinates: GridPoint,
    /// Euclidean distance between the room centers when the corridor was
    /// created. Used as the MST edge weight; not recomputed if rooms move.
    pub length: f32,
    /// Carved width in tiles (the actual run is `2 * (width / 2) + 1` wide).
    pub width: i32,
}

impl Corridor {
    /// Create a corridor from `origin` toward `far`.
    pub fn link(origin: &Room, far: &Room) -> Self {
        Self {
            rooms: [far.index, origin.index],
            coordinates: GridPoint::new(origin.center_tile().x, far.center_tile().z),
            length: origin.distance_to(far),
            width: 1,
        }
    }

    /// Check whether this corridor connects the two given rooms.
    pub fn connects(&self, a: usize, b: usize) -> bool {
        (self.rooms[0] == a && self.rooms[1] == b) || (self.rooms[0] == b && self.rooms[1] == a)
    }

    /// Check whether this corridor touches the given room.
    pub fn touches(&self, room: usize) -> bool {
        self.rooms[0] == room || self.rooms[1] == room
    }

    /// Carve the corridor into the grid.
    ///
    /// Two axis-aligned runs, each widened symmetrically around its center
    /// line. Only `Empty` cells are written; rooms, doors and earlier
    /// corridors are never overwritten, and out-of-bounds tiles are skipped.
    pub fn carve(&mut self, grid: &mut MapGrid, rooms: &[Room]) {
        let far = &rooms[self.rooms[0]];
        let origin = &rooms[self.rooms[1]];

        self.unstick(far, origin);

        let half = self.width / 2;

        // Horizontal run along the far room's center row.
        let (start_x, end_x) = sorted(far.center_tile().x, self.coordinates.x);
        for x in start_x..=end_x {
            for offset in -half..=half {
                self.carve_tile(grid, GridPoint::new(x, self.coordinates.z + offset));
            }
        }

        // Vertical run along the origin room's center column.
        let (start_z, end_z) = sorted(origin.center_tile().z, self.coordinates.z);
        for z in start_z..=end_z {
            for offset in -half..=half {
                self.carve_tile(grid, GridPoint::new(self.coordinates.x + offset, z));
            }
        }
    }

    fn carve_tile(&self, grid: &mut MapGrid, coordinates: GridPoint) {
        if grid.is_valid(coordinates) && grid.get(coordinates) == TileType::Empty {
            grid.set(coordinates, TileType::Corridor);
        }
    }

    /// Nudge the elbow off a room edge it landed exactly on, so the turn
    /// does not hug a wall line.
    fn unstick(&mut self, far: &Room, origin: &Room) {
        let mut correction = GridPoint::new(0, 0);

        let elbow = self.coordinates;
        if far.coordinates.x == elbow.x + 1 {
            correction.x = 2;
        } else if far.coordinates.x + far.size.x == elbow.x {
            correction.x = -2;
        } else if far.coordinates.x == elbow.x {
            correction.x = 1;
        } else if far.coordinates.x + far.size.x == elbow.x + 1 {
            correction.x = -1;
        }

        if origin.coordinates.z == elbow.z + 1 {
            correction.z = 2;
        } else if origin.coordinates.z + origin.size.z == elbow.z {
            correction.z = -2;
        } else if origin.coordinates.z == elbow.z {
            correction.z = 1;
        } else if origin.coordinates.z + origin.size.z == elbow.z + 1 {
            correction.z = -1;
        }

        self.coordinates = self.coordinates + correction;
    }
}

fn sorted(a: i32, b: i32) -> (i32, i32) {
    if a <= b { (a, b) } else { (b, a) }
}
