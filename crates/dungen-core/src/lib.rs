//! dungen-core: procedural room-and-corridor map generation
//!
//! This crate contains the whole generation pipeline with no I/O
//! dependencies: seeded RNG, settings, room placement, Delaunay/MST
//! connectivity, corridor and door carving, and wall derivation.
//!
//! A run is fully reproducible: the same [`MapSettings`] and seed always
//! produce the same [`map::GeneratedMap`].

pub mod map;
pub mod rng;
pub mod settings;

pub use map::{GeneratedMap, MapGenerator};
pub use rng::MapRng;
pub use settings::{
    ConnectionKind, MapSettings, MinMax, PlacementKind, RoomStyle, SettingsError,
};
