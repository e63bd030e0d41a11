//! Tile types and the shared occupancy grid.
//!
//! The grid is the ground truth every stage reads and mutates. All of its
//! operations are total: out-of-bounds reads return `Empty`, out-of-bounds
//! writes are ignored.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// What occupies a single grid cell.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum TileType {
    #[default]
    Empty = 0,
    Room = 1,
    Corridor = 2,
    Wall = 3,
    Door = 4,
}

impl TileType {
    /// Check if this tile counts as occupied for wall derivation.
    pub const fn is_occupied(&self) -> bool {
        matches!(self, TileType::Room | TileType::Corridor | TileType::Door)
    }

    /// Check if this tile can be walked through.
    pub const fn is_passable(&self) -> bool {
        matches!(self, TileType::Room | TileType::Corridor | TileType::Door)
    }

    /// Display character for ASCII dumps.
    pub const fn symbol(&self) -> char {
        match self {
            TileType::Empty => ' ',
            TileType::Room => '.',
            TileType::Corridor => '#',
            TileType::Wall => '+',
            TileType::Door => '/',
        }
    }
}

/// Integer grid coordinate (x across, z up).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub z: i32,
}

impl GridPoint {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl core::ops::Add for GridPoint {
    type Output = GridPoint;

    fn add(self, rhs: GridPoint) -> GridPoint {
        GridPoint::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl core::ops::Sub for GridPoint {
    type Output = GridPoint;

    fn sub(self, rhs: GridPoint) -> GridPoint {
        GridPoint::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl core::fmt::Display for GridPoint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Cardinal direction along the grid axes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Unit offset toward this direction. North is +z.
    pub const fn offset(&self) -> GridPoint {
        match self {
            Direction::North => GridPoint::new(0, 1),
            Direction::East => GridPoint::new(1, 0),
            Direction::South => GridPoint::new(0, -1),
            Direction::West => GridPoint::new(-1, 0),
        }
    }

    pub const fn opposite(&self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// True for East/West.
    pub const fn is_horizontal(&self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }

    const fn bit(&self) -> DirectionSet {
        match self {
            Direction::North => DirectionSet::NORTH,
            Direction::East => DirectionSet::EAST,
            Direction::South => DirectionSet::SOUTH,
            Direction::West => DirectionSet::WEST,
        }
    }
}

bitflags! {
    /// A set of room sides, used to track which walls already carry a door.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct DirectionSet: u8 {
        const NORTH = 0x01;
        const EAST = 0x02;
        const SOUTH = 0x04;
        const WEST = 0x08;
    }
}

impl DirectionSet {
    pub fn has(&self, direction: Direction) -> bool {
        self.contains(direction.bit())
    }

    pub fn add(&mut self, direction: Direction) {
        self.insert(direction.bit());
    }
}

// Manual serde impl for DirectionSet
impl Serialize for DirectionSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DirectionSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(DirectionSet::from_bits_truncate(bits))
    }
}

/// Dense 2D occupancy grid, indexed `[x][z]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapGrid {
    size: GridPoint,
    tiles: Vec<Vec<TileType>>,
}

impl MapGrid {
    /// Create an all-`Empty` grid of the given dimensions.
    pub fn new(size: GridPoint) -> Self {
        let width = size.x.max(0) as usize;
        let depth = size.z.max(0) as usize;
        Self {
            size,
            tiles: vec![vec![TileType::Empty; depth]; width],
        }
    }

    pub fn size(&self) -> GridPoint {
        self.size
    }

    /// Check whether a coordinate lies inside the grid.
    pub fn is_valid(&self, coordinates: GridPoint) -> bool {
        coordinates.x >= 0
            && coordinates.x < self.size.x
            && coordinates.z >= 0
            && coordinates.z < self.size.z
    }

    /// Read a tile. Out-of-bounds coordinates read as `Empty`.
    pub fn get(&self, coordinates: GridPoint) -> TileType {
        if self.is_valid(coordinates) {
            self.tiles[coordinates.x as usize][coordinates.z as usize]
        } else {
            TileType::Empty
        }
    }

    /// Write a tile. Out-of-bounds writes are ignored.
    pub fn set(&mut self, coordinates: GridPoint, tile: TileType) {
        if self.is_valid(coordinates) {
            self.tiles[coordinates.x as usize][coordinates.z as usize] = tile;
        }
    }

    /// Check whether any of the 8 neighbors of `(x, z)` is occupied
    /// (Room, Corridor or Door). The cell itself is not examined.
    pub fn is_adjacent_to_occupied(&self, x: i32, z: i32) -> bool {
        for i in (x - 1)..=(x + 1) {
            if i < 0 || i >= self.size.x {
                continue;
            }
            for j in (z - 1)..=(z + 1) {
                if j < 0 || j >= self.size.z || (i == x && j == z) {
                    continue;
                }
                if self.tiles[i as usize][j as usize].is_occupied() {
                    return true;
                }
            }
        }
        false
    }

    /// Count tiles of a given type, for diagnostics and tests.
    pub fn count(&self, tile: TileType) -> usize {
        self.tiles
            .iter()
            .flat_map(|col| col.iter())
            .filter(|&&t| t == tile)
            .count()
    }

    /// Render the grid as ASCII rows, highest z first so north is up.
    pub fn render_ascii(&self) -> Vec<String> {
        let mut rows = Vec::with_capacity(self.size.z.max(0) as usize);
        for z in (0..self.size.z).rev() {
            let mut row = String::with_capacity(self.size.x.max(0) as usize);
            for x in 0..self.size.x {
                row.push(self.get(GridPoint::new(x, z)).symbol());
            }
            rows.push(row);
        }
        rows
    }
}
