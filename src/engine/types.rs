//! Vocabulary shared with the rules engine.

use std::collections::BTreeSet;
use std::fmt;

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Side of the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum::EnumIter,
)]
pub enum Color {
    /// White moves first.
    White,
    /// Black moves second.
    Black,
}

impl Color {
    /// Lowercase name used in status labels.
    pub fn label(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

/// Kind of bug printed on a tile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum::EnumIter,
)]
pub enum Bug {
    /// Queen bee.
    Bee,
    /// Beetle, the only bug that climbs.
    Beetle,
    /// Grasshopper.
    Grasshopper,
    /// Spider.
    Spider,
    /// Soldier ant.
    Ant,
}

/// A single playing piece.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, new,
)]
pub struct Tile {
    /// Owner of the tile.
    pub color: Color,
    /// Bug shown on the tile.
    pub bug: Bug,
}

/// Axial hex coordinate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, new,
)]
pub struct Hex {
    /// Column.
    pub x: i32,
    /// Row, skewed with the column.
    pub y: i32,
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Pile of tiles occupying one hex, top tile first.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct TileStack {
    /// Where the pile sits.
    hex: Hex,
    /// Tiles from top to bottom.
    tiles: Vec<Tile>,
}

impl TileStack {
    /// Returns the visible tile, if the pile is not empty.
    pub fn top(&self) -> Option<&Tile> {
        self.tiles.first()
    }
}

/// Every destination reachable by the tile on top of `source`.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct MoveEdge {
    /// Hex the tile leaves.
    source: Hex,
    /// Hexes it may land on.
    targets: BTreeSet<Hex>,
}

/// Bug kinds the side to move may place, and the hexes it may place them on.
///
/// Every listed bug may go to every listed target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, new)]
pub struct Placements {
    /// Placeable kinds.
    bugs: BTreeSet<Bug>,
    /// Hexes that accept a new tile.
    targets: BTreeSet<Hex>,
}

impl Placements {
    /// Returns true when `bug` may be placed on `target`.
    #[instrument(skip(self))]
    pub fn allows(&self, bug: Bug, target: Hex) -> bool {
        self.bugs.contains(&bug) && self.targets.contains(&target)
    }
}

/// Raw state tag reported by the engine for a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
pub enum GameState {
    /// White to move.
    NextTurnByWhite,
    /// Black to move.
    NextTurnByBlack,
    /// White surrounded the black bee.
    WonByWhite,
    /// Black surrounded the white bee.
    WonByBlack,
    /// Both bees surrounded at once.
    Tie,
    /// The engine refused to continue the game.
    Aborted,
}

impl GameState {
    /// Returns the side to move, or `None` for a finished game.
    pub fn to_move(self) -> Option<Color> {
        match self {
            GameState::NextTurnByWhite => Some(Color::White),
            GameState::NextTurnByBlack => Some(Color::Black),
            GameState::WonByWhite | GameState::WonByBlack | GameState::Tie | GameState::Aborted => {
                None
            }
        }
    }
}
