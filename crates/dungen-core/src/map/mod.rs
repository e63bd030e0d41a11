//! Map generation pipeline
//!
//! Contains the tile grid, rooms, corridors, placement and connection
//! strategies, and the generator that runs them in order.

mod connection;
mod corridor;
mod generator;
mod grid;
mod placement;
mod room;
mod triangulation;
mod walls;

pub use connection::connect_rooms;
pub use corridor::Corridor;
pub use generator::{GeneratedMap, MapGenerator};
pub use grid::{Direction, DirectionSet, GridPoint, MapGrid, TileType};
pub use placement::place_rooms;
pub use room::{DoorInfo, Room, ROOM_CLEARANCE};
pub use triangulation::{build_connections, minimum_spanning_tree, repair_connectivity, triangulate};
pub use walls::derive_walls;
