//! Read-facing view of the board.
//!
//! The projection holds one [`BoardHex`] per occupied hex plus one
//! zero-height "frontier" hex per empty cell that is currently a legal drop
//! target. Frontier hexes exist only while they are targets.

use crate::engine::{Hex, Tile, TileStack};
use crate::store::Observable;

use super::property::Property;

/// One projected hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardHex {
    hex: Hex,
    tiles: Vec<Tile>,
    pub(crate) is_drop_target: Observable<Property, bool>,
}

impl BoardHex {
    /// Projects an occupied stack; not a drop target until resolved.
    pub(crate) fn occupied(stack: &TileStack) -> Self {
        let hex = *stack.hex();
        Self {
            hex,
            tiles: stack.tiles().clone(),
            is_drop_target: Observable::with_value(Property::IsDropTarget(hex), false),
        }
    }

    /// Projects an empty hex that is a drop target.
    pub(crate) fn frontier(hex: Hex) -> Self {
        Self {
            hex,
            tiles: Vec::new(),
            is_drop_target: Observable::with_value(Property::IsDropTarget(hex), true),
        }
    }

    /// Position on the board.
    pub fn hex(&self) -> Hex {
        self.hex
    }

    /// Visible tile.
    pub fn top(&self) -> Option<&Tile> {
        self.tiles.first()
    }

    /// Number of tiles in the pile.
    pub fn height(&self) -> usize {
        self.tiles.len()
    }

    /// Tiles under the top one, top first.
    pub fn below(&self) -> &[Tile] {
        self.tiles.get(1..).unwrap_or(&[])
    }

    /// The hex accepts the currently selected tile.
    pub fn is_drop_target(&self) -> bool {
        *self.is_drop_target.get()
    }

    /// Empty hex shown only because it is a drop target.
    pub fn is_frontier(&self) -> bool {
        self.tiles.is_empty()
    }

    /// The pile is tall enough that the tiles underneath are worth showing.
    pub fn shows_stack_depth(&self) -> bool {
        self.height() > 1
    }
}

/// Every projected hex, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardProjection {
    hexes: Vec<BoardHex>,
}

impl BoardProjection {
    /// Projects the occupied stacks of a snapshot.
    pub fn from_stacks(stacks: &[TileStack]) -> Self {
        Self {
            hexes: stacks.iter().map(BoardHex::occupied).collect(),
        }
    }

    /// All projected hexes.
    pub fn hexes(&self) -> &[BoardHex] {
        &self.hexes
    }

    /// Projection at `hex`, if any.
    pub fn get(&self, hex: Hex) -> Option<&BoardHex> {
        self.hexes.iter().find(|h| h.hex == hex)
    }

    /// Number of projected hexes.
    pub fn len(&self) -> usize {
        self.hexes.len()
    }

    /// Returns true when nothing is projected.
    pub fn is_empty(&self) -> bool {
        self.hexes.is_empty()
    }

    /// Hexes currently flagged as drop targets.
    pub fn drop_targets(&self) -> impl Iterator<Item = Hex> + '_ {
        self.hexes
            .iter()
            .filter(|h| h.is_drop_target())
            .map(|h| h.hex)
    }

    pub(crate) fn hexes_mut(&mut self) -> &mut Vec<BoardHex> {
        &mut self.hexes
    }
}
