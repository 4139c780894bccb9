//! Boundary with the external rules and search engine.

mod snapshot;
mod types;

pub use snapshot::{GameFactory, GameSnapshot};
pub use types::{Bug, Color, GameState, Hex, MoveEdge, Placements, Tile, TileStack};
