//! Procedural world
//!
//! Everything here is a pure function of chunk index or distance travelled.
//! Nothing is a source of truth: chunks outside the window around the player
//! are dropped and regenerated identically when needed again.

pub mod chunk;
pub mod rng;
pub mod stations;

pub use chunk::{
    ChunkCache, Decorations, EnvironmentObject, ObjectKind, TerrainChunk, chunk_index, generate_chunk,
};
pub use rng::{RandomStream, SeededRandom};
pub use stations::{
    ContainerPlacement, approaching_station, clear_of_stations, nearest_station, next_station,
    visible_stations,
};
