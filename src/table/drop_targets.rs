//! Resolves which hexes accept the currently selected tile.

use std::collections::BTreeSet;

use tracing::{debug, instrument};

use crate::engine::{Color, GameSnapshot, Hex, Tile};
use crate::store::PropertyStore;

use super::projection::{BoardHex, BoardProjection};
use super::property::Property;
use super::selection::Selection;

/// Hexes the selected tile may be dropped on.
///
/// Empty unless the selected tile belongs to the side to move and the
/// engine lists at least one destination for it.
#[instrument(skip(snapshot, board))]
pub fn candidate_targets<S: GameSnapshot>(
    selection: Selection,
    snapshot: &S,
    board: &BoardProjection,
) -> BTreeSet<Hex> {
    let to_move = snapshot.state().to_move();
    match selection {
        Selection::None => BTreeSet::new(),
        Selection::InPlay(hex) => {
            let owner = board.get(hex).and_then(BoardHex::top).map(|tile| tile.color);
            if owner.is_none() || owner != to_move {
                return BTreeSet::new();
            }
            snapshot.moves_from(hex)
        }
        Selection::ReserveBlack(tile) => placement_targets(Color::Black, tile, to_move, snapshot),
        Selection::ReserveWhite(tile) => placement_targets(Color::White, tile, to_move, snapshot),
    }
}

fn placement_targets<S: GameSnapshot>(
    reserve: Color,
    tile: Tile,
    to_move: Option<Color>,
    snapshot: &S,
) -> BTreeSet<Hex> {
    let placements = snapshot.legal_placements();
    if to_move == Some(reserve) && placements.bugs().contains(&tile.bug) {
        placements.targets().clone()
    } else {
        BTreeSet::new()
    }
}

/// Brings the projection in line with the current selection.
///
/// Stale frontier hexes are dropped, missing ones added, and every hex's
/// drop-target flag is rewritten. Running it again with the same inputs
/// changes nothing and publishes nothing.
#[instrument(skip(snapshot, board, store))]
pub fn recompute_targets<S: GameSnapshot>(
    selection: Selection,
    snapshot: &S,
    board: &mut BoardProjection,
    store: &mut PropertyStore<Property>,
) {
    let targets = candidate_targets(selection, snapshot, board);

    let hexes = board.hexes_mut();
    let before = hexes.len();
    hexes.retain(|h| !h.is_frontier() || targets.contains(&h.hex()));
    let removed = before - hexes.len();

    let mut added = 0;
    for hex in &targets {
        if !hexes.iter().any(|h| h.hex() == *hex) {
            hexes.push(BoardHex::frontier(*hex));
            added += 1;
        }
    }

    if removed > 0 || added > 0 {
        debug!(removed, added, "Frontier changed");
        store.notify(Property::Stacks);
    }

    for projected in hexes.iter_mut() {
        let is_target = targets.contains(&projected.hex());
        store.set(&mut projected.is_drop_target, is_target);
    }

    debug!(targets = targets.len(), "Drop targets resolved");
}
