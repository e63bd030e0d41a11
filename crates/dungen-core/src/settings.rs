//! Generation settings and strategy selectors.
//!
//! `MapSettings` is the single input to a generation run. Selector enums
//! parse from their variant names, so an unrecognized selector in host
//! configuration fails at parse time instead of silently defaulting.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, VariantNames};
use thiserror::Error;

use crate::map::GridPoint;

/// Inclusive integer range used for room and corridor sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinMax {
    pub min: i32,
    pub max: i32,
}

impl MinMax {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// A range that always yields the same value.
    pub const fn fixed(value: i32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.min >= 1 && self.min <= self.max
    }
}

/// Room placement policy.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    VariantNames,
)]
#[strum(ascii_case_insensitive)]
pub enum PlacementKind {
    /// Uniformly random positions with a retry budget. The documented
    /// default, and the fallback for the other strategies.
    #[default]
    Random,
    /// One room per cell of a logical grid sized to the room count.
    GridBased,
    /// Rooms ring the map center at increasing radial distance.
    Clustered,
}

/// How connectivity edges are realized on the grid.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    VariantNames,
)]
#[strum(ascii_case_insensitive)]
pub enum ConnectionKind {
    /// Carve L-shaped corridors between room centers.
    #[default]
    Corridor,
    /// Pull connected rooms together and cut doorways through the
    /// shared wall.
    DirectDoor,
}

/// Opaque per-room visual binding. The generator assigns one of the
/// configured styles to each room and never interprets it; the host's
/// instantiation layer decides what it means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomStyle(pub u32);

/// Settings for one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapSettings {
    /// Map dimensions in tiles (width x depth).
    pub map_size: GridPoint,
    /// Number of rooms to attempt to place.
    pub room_count: usize,
    /// Inclusive size range, sampled independently per axis.
    pub room_size: MinMax,
    /// Room placement policy.
    pub placement: PlacementKind,
    /// Connection carving policy.
    pub connection: ConnectionKind,
    /// Corridor width range (also used for door widths in DirectDoor mode).
    pub corridor_width: MinMax,
    /// Allow a room to connect to more than one neighbor in DirectDoor mode.
    pub multi_connections: bool,
    /// Upper bound on connections per room when `multi_connections` is set.
    pub max_connections_per_room: usize,
    /// Visual styles to distribute over rooms; may be empty.
    #[serde(default)]
    pub room_styles: Vec<RoomStyle>,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            map_size: GridPoint::new(60, 60),
            room_count: 8,
            room_size: MinMax::new(4, 9),
            placement: PlacementKind::Random,
            connection: ConnectionKind::Corridor,
            corridor_width: MinMax::new(1, 2),
            multi_connections: false,
            max_connections_per_room: 3,
            room_styles: Vec::new(),
        }
    }
}

/// Configuration problems that abort a run before any stage starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("map size {0}x{1} is not positive")]
    InvalidMapSize(i32, i32),

    #[error("room count must be at least 1")]
    NoRooms,

    #[error("room size range {min}..={max} is invalid")]
    InvalidRoomSize { min: i32, max: i32 },

    #[error("corridor width range {min}..={max} is invalid")]
    InvalidCorridorWidth { min: i32, max: i32 },

    #[error("minimum room size {room} does not fit in map {map_x}x{map_z} with a 1-tile border")]
    RoomTooLargeForMap { room: i32, map_x: i32, map_z: i32 },

    #[error("max connections per room must be at least 1")]
    InvalidConnectionLimit,
}

impl MapSettings {
    /// Check the settings for problems that would make a run meaningless.
    ///
    /// Everything else (placement exhaustion, alignment failures) is a
    /// local, non-fatal condition handled inside the pipeline.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.map_size.x <= 0 || self.map_size.z <= 0 {
            return Err(SettingsError::InvalidMapSize(
                self.map_size.x,
                self.map_size.z,
            ));
        }
        if self.room_count == 0 {
            return Err(SettingsError::NoRooms);
        }
        if !self.room_size.is_valid() {
            return Err(SettingsError::InvalidRoomSize {
                min: self.room_size.min,
                max: self.room_size.max,
            });
        }
        if !self.corridor_width.is_valid() {
            return Err(SettingsError::InvalidCorridorWidth {
                min: self.corridor_width.min,
                max: self.corridor_width.max,
            });
        }
        if self.room_size.min + 2 > self.map_size.x || self.room_size.min + 2 > self.map_size.z {
            return Err(SettingsError::RoomTooLargeForMap {
                room: self.room_size.min,
                map_x: self.map_size.x,
                map_z: self.map_size.z,
            });
        }
        if self.max_connections_per_room == 0 {
            return Err(SettingsError::InvalidConnectionLimit);
        }
        Ok(())
    }
}
