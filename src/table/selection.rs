//! What the player currently has picked up.
//!
//! The three selection sources are mutually exclusive, so they are one enum
//! rather than three independent slots. Writing any slot produces a whole
//! new selection; there is no intermediate state where two slots are set.

use crate::engine::{Hex, Tile};

/// The single active selection source, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Selection {
    /// Nothing is picked up.
    #[default]
    None,
    /// A tile on the board, identified by its hex.
    InPlay(Hex),
    /// A tile from black's reserve.
    ReserveBlack(Tile),
    /// A tile from white's reserve.
    ReserveWhite(Tile),
}

impl Selection {
    /// Board hex slot.
    pub fn in_play(self) -> Option<Hex> {
        match self {
            Selection::InPlay(hex) => Some(hex),
            _ => None,
        }
    }

    /// Black reserve slot.
    pub fn reserve_black(self) -> Option<Tile> {
        match self {
            Selection::ReserveBlack(tile) => Some(tile),
            _ => None,
        }
    }

    /// White reserve slot.
    pub fn reserve_white(self) -> Option<Tile> {
        match self {
            Selection::ReserveWhite(tile) => Some(tile),
            _ => None,
        }
    }

    /// Selection after writing the board slot.
    ///
    /// Setting a value replaces whatever was selected. Clearing only has an
    /// effect when this slot is the active one.
    pub fn with_in_play(self, hex: Option<Hex>) -> Self {
        match hex {
            Some(hex) => Selection::InPlay(hex),
            None if self.in_play().is_some() => Selection::None,
            None => self,
        }
    }

    /// Selection after writing the black reserve slot.
    pub fn with_reserve_black(self, tile: Option<Tile>) -> Self {
        match tile {
            Some(tile) => Selection::ReserveBlack(tile),
            None if self.reserve_black().is_some() => Selection::None,
            None => self,
        }
    }

    /// Selection after writing the white reserve slot.
    pub fn with_reserve_white(self, tile: Option<Tile>) -> Self {
        match tile {
            Some(tile) => Selection::ReserveWhite(tile),
            None if self.reserve_white().is_some() => Selection::None,
            None => self,
        }
    }
}
