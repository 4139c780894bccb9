//! Guarded player intents.
//!
//! Each guard is a pure predicate over the status and the current snapshot.
//! The table republishes them as observable properties after every status
//! change and checks them again before executing anything.

use tracing::instrument;

use crate::engine::GameSnapshot;

use super::status::Status;

/// Table-level commands a presentation layer binds to buttons or menu items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Command {
    /// Begin a fresh game.
    Start,
    /// Abandon the current game.
    Abort,
    /// Pass the turn when no move or placement exists.
    SkipTurn,
}

impl Command {
    /// Returns the display label for this command.
    pub fn label(self) -> &'static str {
        match self {
            Command::Start => "Start",
            Command::Abort => "Abort",
            Command::SkipTurn => "Skip turn",
        }
    }
}

/// Result of submitting a command or intent.
///
/// A rejected intent leaves every property untouched and publishes nothing.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandOutcome {
    /// The intent was carried out.
    Applied,
    /// The guard or the engine's legality check refused the intent.
    Rejected,
}

impl CommandOutcome {
    /// Returns true for [`CommandOutcome::Applied`].
    pub fn is_applied(self) -> bool {
        self == CommandOutcome::Applied
    }
}

/// Start is available while no game is under way.
#[instrument]
pub fn can_start(status: Status) -> bool {
    !status.is_game_in_progress()
}

/// Abort is available on a human turn.
///
/// A running search cannot be interrupted, so the computer's turn is never
/// abortable.
#[instrument]
pub fn can_abort(status: Status) -> bool {
    status.is_human_turn()
}

/// Skip is available on a human turn with nothing legal to play.
#[instrument(skip(snapshot))]
pub fn can_skip_turn<S: GameSnapshot>(status: Status, snapshot: &S) -> bool {
    status.is_human_turn() && snapshot.must_pass()
}

/// Move and place intents are accepted on a human turn.
#[instrument]
pub fn can_move(status: Status) -> bool {
    status.is_human_turn()
}
