//! Scripted engine double shared by the integration tests.
//!
//! Tiles are laid out along one row. The side to move may place any bug left
//! in its reserve, or move any tile it has on top, onto the first free hex of
//! the row. Every transition hands the turn to the opponent.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use strictly_hive::{
    Bug, Color, GameSnapshot, GameState, GameTable, Hex, MoveEdge, Placements, PlayMode, Property,
    TableSettings, Tile, TileStack,
};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;

/// Installs a subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}

/// Builds a table over `game` on the current runtime, with a zero think time.
///
/// Must be called from inside a tokio runtime.
pub fn table(game: ScriptedGame, play_mode: PlayMode) -> GameTable<ScriptedGame> {
    init_tracing();
    let settings = TableSettings::default()
        .with_play_mode(play_mode)
        .with_think_seconds(0);
    GameTable::new(settings, move || game.clone(), Handle::current())
}

/// Every property published since the last drain, in order.
pub fn drain(rx: &mut UnboundedReceiver<Property>) -> Vec<Property> {
    let mut keys = Vec::new();
    while let Ok(key) = rx.try_recv() {
        keys.push(key);
    }
    keys
}

/// Deterministic stand-in for the rules and search engine.
#[derive(Debug, Clone)]
pub struct ScriptedGame {
    pub state: GameState,
    pub stacks: Vec<TileStack>,
    pub white_reserve: Vec<Tile>,
    pub black_reserve: Vec<Tile>,
    pub moves: Vec<MoveEdge>,
    pub placements: Placements,
    /// Incremented on every `best_turn` call, shared across every snapshot.
    pub search_calls: Arc<AtomicUsize>,
    /// How long `best_turn` blocks before answering.
    pub search_delay: Duration,
    /// `best_turn` panics instead of answering.
    pub search_panics: bool,
    /// State forced onto the snapshot produced by the next transition.
    pub ending: Option<GameState>,
}

impl ScriptedGame {
    /// White to move with two bugs per side in reserve.
    pub fn opening() -> Self {
        Self {
            state: GameState::NextTurnByWhite,
            stacks: Vec::new(),
            white_reserve: vec![
                Tile::new(Color::White, Bug::Bee),
                Tile::new(Color::White, Bug::Ant),
            ],
            black_reserve: vec![
                Tile::new(Color::Black, Bug::Bee),
                Tile::new(Color::Black, Bug::Ant),
            ],
            moves: Vec::new(),
            placements: Placements::default(),
            search_calls: Arc::new(AtomicUsize::new(0)),
            search_delay: Duration::ZERO,
            search_panics: false,
            ending: None,
        }
        .rescripted()
    }

    /// Same position with `state` as the side to move, legal sets rebuilt.
    pub fn with_state(mut self, state: GameState) -> Self {
        self.state = state;
        self.rescripted()
    }

    /// Side to move has nothing in reserve and nothing on top of the board.
    pub fn stalemated() -> Self {
        let mut game = Self::opening();
        game.white_reserve.clear();
        game.stacks = vec![TileStack::new(
            Hex::new(0, 0),
            vec![Tile::new(Color::Black, Bug::Bee)],
        )];
        game.rescripted()
    }

    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = delay;
        self
    }

    pub fn with_ending(mut self, ending: GameState) -> Self {
        self.ending = Some(ending);
        self
    }

    pub fn panicking_search(mut self) -> Self {
        self.search_panics = true;
        self
    }

    pub fn searches(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// First hex of the row with no stack.
    pub fn free_hex(&self) -> Hex {
        (0..)
            .map(|x| Hex::new(x, 0))
            .find(|hex| !self.stacks.iter().any(|s| s.hex() == hex))
            .unwrap_or(Hex::new(0, 0))
    }

    fn reserve_mut(&mut self, color: Color) -> &mut Vec<Tile> {
        match color {
            Color::White => &mut self.white_reserve,
            Color::Black => &mut self.black_reserve,
        }
    }

    fn rescripted(mut self) -> Self {
        let Some(to_move) = self.state.to_move() else {
            self.moves.clear();
            self.placements = Placements::default();
            return self;
        };
        let free = self.free_hex();

        let bugs: BTreeSet<Bug> = self.reserve(to_move).iter().map(|t| t.bug).collect();
        let targets = if bugs.is_empty() {
            BTreeSet::new()
        } else {
            BTreeSet::from([free])
        };
        self.placements = Placements::new(bugs, targets);

        self.moves = self
            .stacks
            .iter()
            .filter(|s| s.top().map(|t| t.color) == Some(to_move))
            .map(|s| MoveEdge::new(*s.hex(), BTreeSet::from([free])))
            .collect();
        self
    }

    fn next_turn(mut self) -> Self {
        self.state = match self.ending.take() {
            Some(ending) => ending,
            None => match self.state {
                GameState::NextTurnByWhite => GameState::NextTurnByBlack,
                GameState::NextTurnByBlack => GameState::NextTurnByWhite,
                finished => finished,
            },
        };
        self.rescripted()
    }
}

impl GameSnapshot for ScriptedGame {
    fn stacks(&self) -> &[TileStack] {
        &self.stacks
    }

    fn reserve(&self, color: Color) -> &[Tile] {
        match color {
            Color::White => &self.white_reserve,
            Color::Black => &self.black_reserve,
        }
    }

    fn state(&self) -> GameState {
        self.state
    }

    fn legal_moves(&self) -> &[MoveEdge] {
        &self.moves
    }

    fn legal_placements(&self) -> &Placements {
        &self.placements
    }

    fn apply_move(&self, source: Hex, target: Hex) -> Self {
        let mut next = self.clone();
        let Some(index) = next.stacks.iter().position(|s| *s.hex() == source) else {
            return next.next_turn();
        };
        let mut tiles = next.stacks.remove(index).tiles().clone();
        let moving = tiles.remove(0);
        if !tiles.is_empty() {
            next.stacks.insert(index, TileStack::new(source, tiles));
        }
        match next.stacks.iter().position(|s| *s.hex() == target) {
            Some(at) => {
                let mut landed = vec![moving];
                landed.extend(next.stacks[at].tiles().iter().copied());
                next.stacks[at] = TileStack::new(target, landed);
            }
            None => next.stacks.push(TileStack::new(target, vec![moving])),
        }
        next.next_turn()
    }

    fn apply_placement(&self, bug: Bug, target: Hex) -> Self {
        let mut next = self.clone();
        if let Some(color) = self.state.to_move() {
            let reserve = next.reserve_mut(color);
            if let Some(index) = reserve.iter().position(|t| t.bug == bug) {
                let tile = reserve.remove(index);
                next.stacks.push(TileStack::new(target, vec![tile]));
            }
        }
        next.next_turn()
    }

    fn skip_turn(&self) -> Self {
        self.clone().next_turn()
    }

    fn best_turn(&self, _max_depth: u32, _max_time: Duration) -> Self {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.search_delay);
        if self.search_panics {
            panic!("engine blew up");
        }
        if let (Some(bug), Some(target)) = (
            self.placements.bugs().iter().next(),
            self.placements.targets().iter().next(),
        ) {
            return self.apply_placement(*bug, *target);
        }
        match self.moves.first() {
            Some(edge) => match edge.targets().iter().next() {
                Some(target) => self.apply_move(*edge.source(), *target),
                None => self.skip_turn(),
            },
            None => self.skip_turn(),
        }
    }
}
