//! User-facing game status and the flags derived from it.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::engine::{Color, GameState};

/// Who controls which side.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::EnumIter,
)]
pub enum PlayMode {
    /// The person plays white and moves first.
    #[default]
    HumanGoesFirst,
    /// The engine plays white and moves first.
    ComputerGoesFirst,
    /// Two people share the board.
    HumanVersusHuman,
}

impl PlayMode {
    /// Side the engine plays, if any.
    #[instrument]
    pub fn computer_color(self) -> Option<Color> {
        match self {
            PlayMode::HumanGoesFirst => Some(Color::Black),
            PlayMode::ComputerGoesFirst => Some(Color::White),
            PlayMode::HumanVersusHuman => None,
        }
    }

    /// Returns the display label for this option.
    pub fn label(self) -> &'static str {
        match self {
            PlayMode::ComputerGoesFirst => "Computer goes first",
            PlayMode::HumanGoesFirst => "Person goes first",
            PlayMode::HumanVersusHuman => "Person vs. person",
        }
    }
}

/// Classification of whose turn it is and how, or how the game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Status {
    /// No game has been started yet.
    WaitingToStart,
    /// The last game was abandoned.
    PriorGameAborted,
    /// White won.
    WonByWhite,
    /// Black won.
    WonByBlack,
    /// Nobody won.
    Tie,
    /// A person plays the next white turn.
    NextTurnByHumanWhite,
    /// A person plays the next black turn.
    NextTurnByHumanBlack,
    /// The engine plays the next white turn.
    NextTurnByComputerWhite,
    /// The engine plays the next black turn.
    NextTurnByComputerBlack,
}

impl Status {
    /// A turn is pending, by anyone.
    pub fn is_game_in_progress(self) -> bool {
        self.is_human_turn() || self.is_computer_turn()
    }

    /// A person is expected to act.
    pub fn is_human_turn(self) -> bool {
        matches!(self, Status::NextTurnByHumanWhite | Status::NextTurnByHumanBlack)
    }

    /// The engine is expected to act.
    pub fn is_computer_turn(self) -> bool {
        matches!(
            self,
            Status::NextTurnByComputerWhite | Status::NextTurnByComputerBlack
        )
    }

    /// Side a person is expected to play for.
    pub fn human_color(self) -> Option<Color> {
        match self {
            Status::NextTurnByHumanWhite => Some(Color::White),
            Status::NextTurnByHumanBlack => Some(Color::Black),
            _ => None,
        }
    }

    /// Returns the display label for this status.
    pub fn label(self) -> String {
        match self {
            Status::NextTurnByComputerWhite | Status::NextTurnByComputerBlack => {
                let color = if self == Status::NextTurnByComputerWhite {
                    Color::White
                } else {
                    Color::Black
                };
                format!("Computer ({}) thinking...", color.label())
            }
            Status::NextTurnByHumanWhite => format!("Your turn ({})", Color::White.label()),
            Status::NextTurnByHumanBlack => format!("Your turn ({})", Color::Black.label()),
            Status::PriorGameAborted => "Game aborted; no winner".to_string(),
            Status::Tie => "Tie!".to_string(),
            Status::WaitingToStart => "Ready to play?".to_string(),
            Status::WonByBlack => "Black won!".to_string(),
            Status::WonByWhite => "White won!".to_string(),
        }
    }
}

/// Maps an engine state tag onto a status for the configured play mode.
///
/// Finished games map the same way under every play mode; an active game is
/// a computer turn exactly when the play mode hands that side to the engine.
#[instrument]
pub fn derive_status(state: GameState, play_mode: PlayMode) -> Status {
    match state {
        GameState::Tie => Status::Tie,
        GameState::WonByWhite => Status::WonByWhite,
        GameState::WonByBlack => Status::WonByBlack,
        GameState::Aborted => Status::PriorGameAborted,
        GameState::NextTurnByWhite => {
            if play_mode.computer_color() == Some(Color::White) {
                Status::NextTurnByComputerWhite
            } else {
                Status::NextTurnByHumanWhite
            }
        }
        GameState::NextTurnByBlack => {
            if play_mode.computer_color() == Some(Color::Black) {
                Status::NextTurnByComputerBlack
            } else {
                Status::NextTurnByHumanBlack
            }
        }
    }
}

/// Enablement flags recomputed on every status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFlags {
    /// A game is under way.
    pub in_progress: bool,
    /// The engine is searching.
    pub thinking: bool,
    /// White reserve tiles may be dragged.
    pub can_drag_reserve_white: bool,
    /// Black reserve tiles may be dragged.
    pub can_drag_reserve_black: bool,
    /// Board tiles may be dragged.
    pub can_drag_board: bool,
}

impl StatusFlags {
    /// Derives the flags for `status`.
    ///
    /// A reserve is only draggable on its owner's human turn and while it
    /// still holds tiles.
    #[instrument]
    pub fn derive(status: Status, white_reserve_empty: bool, black_reserve_empty: bool) -> Self {
        Self {
            in_progress: status.is_game_in_progress(),
            thinking: status.is_computer_turn(),
            can_drag_reserve_white: status == Status::NextTurnByHumanWhite && !white_reserve_empty,
            can_drag_reserve_black: status == Status::NextTurnByHumanBlack && !black_reserve_empty,
            can_drag_board: status.is_human_turn(),
        }
    }
}
