//! The game table: every bindable attribute plus the orchestration around it.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, trace, warn};

use crate::engine::{Bug, Color, GameFactory, GameSnapshot, Hex, Tile};
use crate::settings::{ThinkBudget, TableSettings, describe_think_time};
use crate::store::{Observable, PropertyStore};

use super::commands::{self, Command, CommandOutcome};
use super::drop_targets::recompute_targets;
use super::projection::BoardProjection;
use super::property::Property;
use super::scheduler::{Dispatch, SearchId, TurnScheduler};
use super::selection::Selection;
use super::status::{PlayMode, Status, StatusFlags, derive_status};

/// Interactive side of a Hive game.
///
/// All state lives here and is mutated only through `&mut self`, so every
/// transition (a snapshot replacement and the status derived from it) is
/// observed as one step. Attribute changes are published on the streams
/// returned by [`GameTable::subscribe`].
///
/// Computer turns are searched in the background on the runtime passed to
/// [`GameTable::new`]. Their progress ticks and results are queued and only
/// take effect when the owner calls [`GameTable::pump`] or
/// [`GameTable::run_until_idle`].
pub struct GameTable<S: GameSnapshot> {
    store: PropertyStore<Property>,
    new_game: GameFactory<S>,
    game: Arc<S>,
    scheduler: TurnScheduler<S>,
    board: BoardProjection,
    selection: Selection,

    status: Observable<Property, Status>,
    think_progress: Observable<Property, u32>,
    is_thinking: Observable<Property, bool>,
    is_game_in_progress: Observable<Property, bool>,
    is_game_not_in_progress: Observable<Property, bool>,
    can_drag_reserve_white: Observable<Property, bool>,
    can_drag_reserve_black: Observable<Property, bool>,
    can_drag_tile_on_board: Observable<Property, bool>,

    think_time: Observable<Property, Duration>,
    think_depth: Observable<Property, u32>,
    play_mode: Observable<Property, PlayMode>,

    reserve_white: Observable<Property, Vec<Tile>>,
    reserve_black: Observable<Property, Vec<Tile>>,

    selected_in_play: Observable<Property, Option<Hex>>,
    selected_reserve_black: Observable<Property, Option<Tile>>,
    selected_reserve_white: Observable<Property, Option<Tile>>,

    can_start: Observable<Property, bool>,
    can_abort: Observable<Property, bool>,
    can_skip_turn: Observable<Property, bool>,
    can_move: Observable<Property, bool>,
}

impl<S: GameSnapshot> GameTable<S> {
    /// Creates a table holding a fresh game, waiting for [`Command::Start`].
    ///
    /// Background searches are spawned on `runtime`.
    #[instrument(skip(new_game, runtime))]
    pub fn new(
        settings: TableSettings,
        new_game: impl Fn() -> S + Send + Sync + 'static,
        runtime: Handle,
    ) -> Self {
        let new_game: GameFactory<S> = Box::new(new_game);
        let game = Arc::new(new_game());

        let mut table = Self {
            store: PropertyStore::new(),
            new_game,
            game,
            scheduler: TurnScheduler::new(runtime),
            board: BoardProjection::default(),
            selection: Selection::None,
            status: Observable::unset(Property::GameStatus),
            think_progress: Observable::unset(Property::ThinkProgress),
            is_thinking: Observable::unset(Property::IsThinking),
            is_game_in_progress: Observable::unset(Property::IsGameInProgress),
            is_game_not_in_progress: Observable::unset(Property::IsGameNotInProgress),
            can_drag_reserve_white: Observable::unset(Property::CanDragReserveWhite),
            can_drag_reserve_black: Observable::unset(Property::CanDragReserveBlack),
            can_drag_tile_on_board: Observable::unset(Property::CanDragTileOnBoard),
            think_time: Observable::unset(Property::ThinkTime),
            think_depth: Observable::unset(Property::ThinkDepth),
            play_mode: Observable::unset(Property::GamePlayMode),
            reserve_white: Observable::unset(Property::ReserveWhite),
            reserve_black: Observable::unset(Property::ReserveBlack),
            selected_in_play: Observable::unset(Property::SelectedInPlay),
            selected_reserve_black: Observable::unset(Property::SelectedReserveBlack),
            selected_reserve_white: Observable::unset(Property::SelectedReserveWhite),
            can_start: Observable::unset(Property::CanStart),
            can_abort: Observable::unset(Property::CanAbort),
            can_skip_turn: Observable::unset(Property::CanSkipTurn),
            can_move: Observable::unset(Property::CanMove),
        };

        table.store.set(&mut table.think_time, settings.think_time());
        table.store.set(&mut table.think_depth, *settings.think_depth());
        table.store.set(&mut table.play_mode, *settings.play_mode());
        table.select(Selection::None);
        table.publish_game();
        table.set_status(Status::WaitingToStart);

        info!(play_mode = ?settings.play_mode(), "Game table ready");
        table
    }

    /// Opens a stream receiving the [`Property`] of every attribute change.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<Property> {
        self.store.subscribe()
    }

    // ─── Reads ──────────────────────────────────────────────────────────────

    /// Current engine snapshot.
    pub fn game(&self) -> &S {
        &self.game
    }

    /// Current status.
    pub fn status(&self) -> Status {
        *self.status.get()
    }

    /// Progress ticks of the running search, zero when idle.
    pub fn think_progress(&self) -> u32 {
        *self.think_progress.get()
    }

    /// The engine is searching.
    pub fn is_thinking(&self) -> bool {
        *self.is_thinking.get()
    }

    /// A game is under way.
    pub fn is_game_in_progress(&self) -> bool {
        *self.is_game_in_progress.get()
    }

    /// No game is under way.
    pub fn is_game_not_in_progress(&self) -> bool {
        *self.is_game_not_in_progress.get()
    }

    /// Tiles of `color`'s reserve may be dragged.
    pub fn can_drag_reserve(&self, color: Color) -> bool {
        match color {
            Color::White => *self.can_drag_reserve_white.get(),
            Color::Black => *self.can_drag_reserve_black.get(),
        }
    }

    /// Tiles on the board may be dragged.
    pub fn can_drag_tile_on_board(&self) -> bool {
        *self.can_drag_tile_on_board.get()
    }

    /// Wall-clock budget for a computer turn.
    pub fn think_time(&self) -> Duration {
        *self.think_time.get()
    }

    /// Think time as words, e.g. "1 minute 30 seconds".
    pub fn think_time_description(&self) -> String {
        describe_think_time(self.think_time())
    }

    /// Ply budget for a computer turn.
    pub fn think_depth(&self) -> u32 {
        *self.think_depth.get()
    }

    /// Who plays which side.
    pub fn play_mode(&self) -> PlayMode {
        *self.play_mode.get()
    }

    /// Tiles of `color` not yet placed.
    pub fn reserve(&self, color: Color) -> &[Tile] {
        match color {
            Color::White => self.reserve_white.get().as_slice(),
            Color::Black => self.reserve_black.get().as_slice(),
        }
    }

    /// Projected board, including frontier drop targets.
    pub fn board(&self) -> &BoardProjection {
        &self.board
    }

    /// What the player has picked up.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Search started but not yet committed.
    pub fn search_in_flight(&self) -> Option<SearchId> {
        self.scheduler.in_flight()
    }

    /// Whether `command` is currently available.
    pub fn is_enabled(&self, command: Command) -> bool {
        match command {
            Command::Start => *self.can_start.get(),
            Command::Abort => *self.can_abort.get(),
            Command::SkipTurn => *self.can_skip_turn.get(),
        }
    }

    /// Move and place intents are accepted right now.
    pub fn accepts_moves(&self) -> bool {
        *self.can_move.get()
    }

    /// Whether moving the top tile of `source` to `target` would be accepted.
    pub fn can_move(&self, source: Hex, target: Hex) -> bool {
        commands::can_move(self.status()) && self.game.is_legal_move(source, target)
    }

    /// Whether placing a reserve `bug` on `target` would be accepted.
    pub fn can_place(&self, bug: Bug, target: Hex) -> bool {
        commands::can_move(self.status()) && self.game.is_legal_placement(bug, target)
    }

    // ─── Settings ───────────────────────────────────────────────────────────

    /// Changes who plays which side.
    ///
    /// During a game the status is re-derived at once, which may hand the
    /// current turn to the engine. Otherwise the mode applies from the next
    /// start.
    #[instrument(skip(self))]
    pub fn set_play_mode(&mut self, play_mode: PlayMode) {
        if self.store.set(&mut self.play_mode, play_mode) {
            debug!(?play_mode, "Play mode changed");
            if self.status().is_game_in_progress() {
                self.refresh_status();
            }
        }
    }

    /// Changes the wall-clock budget for subsequent searches.
    #[instrument(skip(self))]
    pub fn set_think_time(&mut self, think_time: Duration) {
        self.store.set(&mut self.think_time, think_time);
    }

    /// Changes the ply budget for subsequent searches.
    #[instrument(skip(self))]
    pub fn set_think_depth(&mut self, think_depth: u32) {
        self.store.set(&mut self.think_depth, think_depth);
    }

    fn think_budget(&self) -> ThinkBudget {
        ThinkBudget::new(self.think_depth(), self.think_time())
    }

    // ─── Selection ──────────────────────────────────────────────────────────

    /// Replaces the whole selection and resolves drop targets once.
    ///
    /// Selecting what is already selected publishes nothing.
    #[instrument(skip(self))]
    pub fn select(&mut self, selection: Selection) {
        self.selection = selection;
        let mut changed = self.store.set(&mut self.selected_in_play, selection.in_play());
        changed |= self
            .store
            .set(&mut self.selected_reserve_black, selection.reserve_black());
        changed |= self
            .store
            .set(&mut self.selected_reserve_white, selection.reserve_white());

        if changed {
            debug!(?selection, "Selection changed");
            recompute_targets(selection, self.game.as_ref(), &mut self.board, &mut self.store);
        }
    }

    /// Writes the board slot of the selection.
    pub fn set_selected_in_play(&mut self, hex: Option<Hex>) {
        self.select(self.selection.with_in_play(hex));
    }

    /// Writes the black reserve slot of the selection.
    pub fn set_selected_reserve_black(&mut self, tile: Option<Tile>) {
        self.select(self.selection.with_reserve_black(tile));
    }

    /// Writes the white reserve slot of the selection.
    pub fn set_selected_reserve_white(&mut self, tile: Option<Tile>) {
        self.select(self.selection.with_reserve_white(tile));
    }

    // ─── Commands ───────────────────────────────────────────────────────────

    /// Runs `command` if its guard allows it.
    #[instrument(skip(self))]
    pub fn execute(&mut self, command: Command) -> CommandOutcome {
        let status = self.status();
        let enabled = match command {
            Command::Start => commands::can_start(status),
            Command::Abort => commands::can_abort(status),
            Command::SkipTurn => commands::can_skip_turn(status, self.game.as_ref()),
        };
        if !enabled {
            warn!(?command, ?status, "Command rejected");
            return CommandOutcome::Rejected;
        }

        match command {
            Command::Start => {
                info!(play_mode = ?self.play_mode(), "Starting new game");
                let fresh = (self.new_game)();
                self.replace_game(fresh);
                self.refresh_status();
            }
            Command::Abort => {
                info!("Game aborted");
                self.select(Selection::None);
                self.set_status(Status::PriorGameAborted);
            }
            Command::SkipTurn => {
                info!(?status, "Skipping turn");
                let next = self.game.skip_turn();
                self.replace_game(next);
                self.refresh_status();
            }
        }
        CommandOutcome::Applied
    }

    /// Moves the top tile of `source` to `target`.
    #[instrument(skip(self))]
    pub fn attempt_move(&mut self, source: Hex, target: Hex) -> CommandOutcome {
        if !self.can_move(source, target) {
            warn!(status = ?self.status(), "Move rejected");
            return CommandOutcome::Rejected;
        }
        let next = self.game.apply_move(source, target);
        self.replace_game(next);
        self.refresh_status();
        CommandOutcome::Applied
    }

    /// Places a reserve tile of kind `bug` on `target`.
    #[instrument(skip(self))]
    pub fn attempt_place(&mut self, bug: Bug, target: Hex) -> CommandOutcome {
        if !self.can_place(bug, target) {
            warn!(status = ?self.status(), "Placement rejected");
            return CommandOutcome::Rejected;
        }
        let next = self.game.apply_placement(bug, target);
        self.replace_game(next);
        self.refresh_status();
        CommandOutcome::Applied
    }

    // ─── Background search ──────────────────────────────────────────────────

    /// Applies every queued search message without waiting.
    ///
    /// Returns how many messages were handled.
    ///
    /// # Panics
    ///
    /// Re-raises a panic that occurred inside the engine's search.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(dispatch) = self.scheduler.try_next() {
            self.apply_dispatch(dispatch);
            handled += 1;
        }
        handled
    }

    /// Waits until no search is in flight, applying messages as they arrive.
    ///
    /// Returns immediately when no search is running.
    pub async fn run_until_idle(&mut self) {
        while self.scheduler.in_flight().is_some() {
            match self.scheduler.next().await {
                Some(dispatch) => self.apply_dispatch(dispatch),
                None => break,
            }
        }
        self.pump();
    }

    fn apply_dispatch(&mut self, dispatch: Dispatch<S>) {
        match dispatch {
            Dispatch::Tick(search) => {
                if self.scheduler.is_searching(search, &self.game) {
                    let progress = self.think_progress().saturating_add(1);
                    self.store.set(&mut self.think_progress, progress);
                } else {
                    trace!(%search, "Ignoring tick from a superseded search");
                }
            }
            Dispatch::Completed { search, snapshot } => {
                let Some(origin) = self.scheduler.finish(search) else {
                    warn!(%search, "Ignoring completion of unknown search");
                    return;
                };
                if !Arc::ptr_eq(&origin, &self.game) || !self.status().is_computer_turn() {
                    warn!(%search, status = ?self.status(), "Discarding result searched from a superseded position");
                    self.resume_computer_turn();
                    return;
                }
                info!(%search, "Committing computer turn");
                self.replace_game(snapshot);
                self.refresh_status();
                self.resume_computer_turn();
            }
            Dispatch::Panicked(payload) => std::panic::resume_unwind(payload),
        }
    }

    // ─── Transitions ────────────────────────────────────────────────────────

    /// Swaps in a new snapshot, clearing the selection first.
    fn replace_game(&mut self, next: S) {
        self.select(Selection::None);
        self.game = Arc::new(next);
        self.publish_game();
    }

    /// Rebuilds the projection and reserves from the current snapshot.
    fn publish_game(&mut self) {
        let board = BoardProjection::from_stacks(self.game.stacks());
        if board != self.board {
            self.board = board;
            self.store.notify(Property::Stacks);
        }
        let white = self.game.reserve(Color::White).to_vec();
        let black = self.game.reserve(Color::Black).to_vec();
        self.store.set(&mut self.reserve_white, white);
        self.store.set(&mut self.reserve_black, black);
    }

    fn refresh_status(&mut self) {
        let status = derive_status(self.game.state(), self.play_mode());
        self.set_status(status);
    }

    /// Writes `status` and everything derived from it.
    ///
    /// Progress is reset and a computer turn is scheduled only when the
    /// status actually changes.
    fn set_status(&mut self, status: Status) {
        let changed = self.store.set(&mut self.status, status);
        self.refresh_flags();
        self.refresh_commands();

        if !changed {
            return;
        }
        info!(?status, label = %status.label(), "Status changed");
        self.store.set(&mut self.think_progress, 0);

        if status.is_computer_turn() {
            let budget = self.think_budget();
            self.scheduler.activate(Arc::clone(&self.game), budget);
        }
    }

    /// Searches the current position if the engine is to move and idle.
    ///
    /// Covers a computer turn whose activation was refused while an older
    /// search was still running, and an engine that keeps the turn.
    fn resume_computer_turn(&mut self) {
        if self.status().is_computer_turn() && self.scheduler.in_flight().is_none() {
            debug!(status = ?self.status(), "Searching the current position");
            let budget = self.think_budget();
            self.scheduler.activate(Arc::clone(&self.game), budget);
        }
    }

    fn refresh_flags(&mut self) {
        let flags = StatusFlags::derive(
            self.status(),
            self.reserve(Color::White).is_empty(),
            self.reserve(Color::Black).is_empty(),
        );
        self.store.set(&mut self.is_game_in_progress, flags.in_progress);
        self.store.set(&mut self.is_game_not_in_progress, !flags.in_progress);
        self.store.set(&mut self.is_thinking, flags.thinking);
        self.store
            .set(&mut self.can_drag_reserve_white, flags.can_drag_reserve_white);
        self.store
            .set(&mut self.can_drag_reserve_black, flags.can_drag_reserve_black);
        self.store.set(&mut self.can_drag_tile_on_board, flags.can_drag_board);
    }

    fn refresh_commands(&mut self) {
        let status = self.status();
        let can_skip = commands::can_skip_turn(status, self.game.as_ref());
        self.store.set(&mut self.can_start, commands::can_start(status));
        self.store.set(&mut self.can_abort, commands::can_abort(status));
        self.store.set(&mut self.can_skip_turn, can_skip);
        self.store.set(&mut self.can_move, commands::can_move(status));
    }
}
