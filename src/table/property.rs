//! Names of every observable attribute on the table.

use derive_more::Display;

use crate::engine::Hex;

/// Key published on the notification stream when an attribute changes.
///
/// The display form is the attribute name a presentation layer binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Property {
    /// Current [`Status`](super::Status).
    GameStatus,
    /// Progress ticks of the running search.
    ThinkProgress,
    /// A computer turn is being searched.
    IsThinking,
    /// A game is under way.
    IsGameInProgress,
    /// No game is under way.
    IsGameNotInProgress,
    /// White reserve tiles may be dragged.
    CanDragReserveWhite,
    /// Black reserve tiles may be dragged.
    CanDragReserveBlack,
    /// Board tiles may be dragged.
    CanDragTileOnBoard,
    /// Wall-clock budget for a computer turn.
    ThinkTime,
    /// Ply budget for a computer turn.
    ThinkDepth,
    /// Who plays which side.
    GamePlayMode,
    /// Membership of the board projection.
    Stacks,
    /// Black tiles not yet placed.
    ReserveBlack,
    /// White tiles not yet placed.
    ReserveWhite,
    /// Board hex picked up by the player.
    SelectedInPlay,
    /// Black reserve tile picked up by the player.
    SelectedReserveBlack,
    /// White reserve tile picked up by the player.
    SelectedReserveWhite,
    /// The start command is available.
    CanStart,
    /// The abort command is available.
    CanAbort,
    /// The skip-turn command is available.
    CanSkipTurn,
    /// Move and place intents are accepted.
    CanMove,
    /// Drop-target flag of the projection at a hex.
    #[display("IsDropTarget{_0}")]
    IsDropTarget(Hex),
}
