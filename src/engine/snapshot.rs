//! The engine contract consumed by the table.
//!
//! A snapshot is one immutable game position produced by the rules engine.
//! Every transition returns a brand new snapshot; nothing here mutates in
//! place, so a snapshot can be handed to a background search while the
//! interactive side keeps reading its own copy.

use std::collections::BTreeSet;
use std::time::Duration;

use super::types::{Bug, Color, GameState, Hex, MoveEdge, Placements, Tile, TileStack};

/// One immutable game position, together with the transitions out of it.
///
/// Implementations are expected to be internally consistent: legal moves and
/// placements always describe the side named by [`GameSnapshot::state`].
pub trait GameSnapshot: Sized + Send + Sync + 'static {
    /// Occupied hexes with their tiles, top first.
    fn stacks(&self) -> &[TileStack];

    /// Tiles of `color` not yet on the board.
    fn reserve(&self, color: Color) -> &[Tile];

    /// Whose turn it is, or how the game ended.
    fn state(&self) -> GameState;

    /// Move edges available to the side to move.
    fn legal_moves(&self) -> &[MoveEdge];

    /// Placements available to the side to move.
    fn legal_placements(&self) -> &Placements;

    /// Moves the top tile of `source` onto `target`.
    fn apply_move(&self, source: Hex, target: Hex) -> Self;

    /// Places a reserve tile of kind `bug` on `target`.
    fn apply_placement(&self, bug: Bug, target: Hex) -> Self;

    /// Passes the turn to the opponent.
    fn skip_turn(&self) -> Self;

    /// Searches for the best turn and returns the position after playing it.
    ///
    /// The search is bounded by `max_depth` plies and `max_time` of wall
    /// clock. Running out of time is not a failure: the best turn found so
    /// far is played.
    fn best_turn(&self, max_depth: u32, max_time: Duration) -> Self;

    /// Union of every destination reachable from `source`.
    fn moves_from(&self, source: Hex) -> BTreeSet<Hex> {
        self.legal_moves()
            .iter()
            .filter(|edge| *edge.source() == source)
            .flat_map(|edge| edge.targets().iter().copied())
            .collect()
    }

    /// Returns true when the engine lists `source → target`.
    fn is_legal_move(&self, source: Hex, target: Hex) -> bool {
        self.legal_moves()
            .iter()
            .any(|edge| *edge.source() == source && edge.targets().contains(&target))
    }

    /// Returns true when the engine lists `bug` at `target`.
    fn is_legal_placement(&self, bug: Bug, target: Hex) -> bool {
        self.legal_placements().allows(bug, target)
    }

    /// Returns true when the side to move has neither moves nor placements.
    fn must_pass(&self) -> bool {
        self.legal_moves().is_empty() && self.legal_placements().bugs().is_empty()
    }
}

/// Produces the opening position for a new game.
pub type GameFactory<S> = Box<dyn Fn() -> S + Send + Sync>;
