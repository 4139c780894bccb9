//! Strictly Hive library - interaction core for a game of Hive
//!
//! This library sits between a person at the board and an external rules and
//! search engine. It owns everything a presentation layer binds to and keeps
//! turns flowing between the human and the computer.
//!
//! # Architecture
//!
//! - **Store**: observable cells with change notification
//! - **Engine**: the snapshot contract the rules engine implements
//! - **Table**: status machine, selection, drop targets, guarded commands and
//!   background computer turns
//! - **Settings**: play mode and think budget, loadable from TOML
//!
//! # Example
//!
//! ```no_run
//! use strictly_hive::{Command, GameSnapshot, GameTable, TableSettings};
//!
//! # async fn example<S: GameSnapshot>(new_game: fn() -> S) {
//! let mut table = GameTable::new(
//!     TableSettings::default(),
//!     new_game,
//!     tokio::runtime::Handle::current(),
//! );
//! let mut changes = table.subscribe();
//!
//! let _ = table.execute(Command::Start);
//! table.run_until_idle().await;
//! while let Ok(property) = changes.try_recv() {
//!     println!("{property} changed");
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod engine;
mod settings;
mod store;
mod table;

// Crate-level exports - Engine contract
pub use engine::{
    Bug, Color, GameFactory, GameSnapshot, GameState, Hex, MoveEdge, Placements, Tile, TileStack,
};

// Crate-level exports - Observable store
pub use store::{Observable, PropertyStore, StoreError};

// Crate-level exports - Settings
pub use settings::{
    ConfigError, DEFAULT_THINK_DEPTH, DEFAULT_THINK_SECONDS, TableSettings, ThinkBudget,
    describe_think_time,
};

// Crate-level exports - Game table
pub use table::{
    BoardHex, BoardProjection, Command, CommandOutcome, GameTable, PlayMode, Property, SearchId,
    Selection, Status, StatusFlags, can_abort, can_move, can_skip_turn, can_start,
    candidate_targets, derive_status, recompute_targets,
};
