//! Game table: status machine, selection, drop targets and computer turns.

mod commands;
mod drop_targets;
mod game_table;
mod projection;
mod property;
mod scheduler;
mod selection;
mod status;

pub use commands::{Command, CommandOutcome, can_abort, can_move, can_skip_turn, can_start};
pub use drop_targets::{candidate_targets, recompute_targets};
pub use game_table::GameTable;
pub use projection::{BoardHex, BoardProjection};
pub use property::Property;
pub use scheduler::SearchId;
pub use selection::Selection;
pub use status::{PlayMode, Status, StatusFlags, derive_status};
