//! The generation pipeline, stage by stage.

use log::info;
use serde::{Deserialize, Serialize};

use crate::rng::MapRng;
use crate::settings::{MapSettings, SettingsError};

use super::connection::connect_rooms;
use super::corridor::Corridor;
use super::grid::{MapGrid, TileType};
use super::placement::place_rooms;
use super::room::Room;
use super::triangulation::build_connections;
use super::walls::derive_walls;

/// A finished map: the tile grid plus the structures that produced it.
///
/// The seed is carried along so a map can be reproduced from its settings
/// alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedMap {
    pub grid: MapGrid,
    pub rooms: Vec<Room>,
    pub corridors: Vec<Corridor>,
    pub seed: u64,
}

impl GeneratedMap {
    /// Look up a room by its index.
    pub fn room(&self, index: usize) -> Option<&Room> {
        self.rooms.get(index)
    }

    /// The corridor directly connecting two rooms, if one exists.
    pub fn corridor_between(&self, a: usize, b: usize) -> Option<&Corridor> {
        self.corridors.iter().find(|c| c.connects(a, b))
    }

    /// Total number of passable tiles.
    pub fn floor_area(&self) -> usize {
        self.grid.count(TileType::Room)
            + self.grid.count(TileType::Corridor)
            + self.grid.count(TileType::Door)
    }
}

/// Drives the stages: placement, triangulation, connection, walls.
///
/// Settings are validated once at construction; a generator that exists
/// can always run.
#[derive(Debug, Clone)]
pub struct MapGenerator {
    settings: MapSettings,
}

impl MapGenerator {
    pub fn new(settings: MapSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    /// Run the full pipeline with the given RNG.
    pub fn generate(&self, rng: &mut MapRng) -> GeneratedMap {
        let settings = &self.settings;
        info!(
            "generating {}x{} map, {} rooms, {} placement, {} connections, seed {}",
            settings.map_size.x,
            settings.map_size.z,
            settings.room_count,
            settings.placement,
            settings.connection,
            rng.seed()
        );

        let mut grid = MapGrid::new(settings.map_size);

        let mut rooms = place_rooms(&mut grid, settings, rng);
        if !settings.room_styles.is_empty() {
            for room in &mut rooms {
                room.style = rng.choose(&settings.room_styles).copied();
            }
        }

        let mut corridors = build_connections(&rooms, settings.map_size);
        connect_rooms(&mut grid, &mut rooms, &mut corridors, settings, rng);

        derive_walls(&mut grid);

        info!(
            "generated {} rooms, {} corridors, {} wall tiles",
            rooms.len(),
            corridors.len(),
            grid.count(TileType::Wall)
        );
        GeneratedMap {
            grid,
            rooms,
            corridors,
            seed: rng.seed(),
        }
    }

    /// Run the full pipeline with a fresh RNG for `seed`.
    pub fn generate_seeded(&self, seed: u64) -> GeneratedMap {
        self.generate(&mut MapRng::new(seed))
    }
}
