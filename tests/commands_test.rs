//! Start, abort and skip-turn through the game table.

mod common;

use common::{ScriptedGame, drain, table};
use strictly_hive::{Bug, Color, Command, CommandOutcome, GameSnapshot, Hex, PlayMode, Property, Selection, Status, Tile};
use strum::IntoEnumIterator;

#[tokio::test]
async fn test_abort_clears_selection_and_reenables_start() {
    let mut table = table(ScriptedGame::opening(), PlayMode::HumanGoesFirst);
    let _ = table.execute(Command::Start);
    table.set_selected_reserve_white(Some(Tile::new(Color::White, Bug::Ant)));

    assert_eq!(table.execute(Command::Abort), CommandOutcome::Applied);

    assert_eq!(table.status(), Status::PriorGameAborted);
    assert_eq!(table.status().label(), "Game aborted; no winner");
    assert_eq!(table.selection(), Selection::None);
    assert!(table.board().is_empty());
    assert!(table.is_enabled(Command::Start));
    assert!(!table.is_enabled(Command::Abort));
    assert!(!table.accepts_moves());
    assert!(!table.can_drag_reserve(Color::White));
}

#[tokio::test]
async fn test_start_after_abort_begins_fresh_game() {
    let mut table = table(ScriptedGame::opening(), PlayMode::HumanVersusHuman);
    let _ = table.execute(Command::Start);
    let _ = table.attempt_place(Bug::Ant, Hex::new(0, 0));
    let _ = table.execute(Command::Abort);
    let mut changes = table.subscribe();

    assert!(table.execute(Command::Start).is_applied());

    assert_eq!(table.status(), Status::NextTurnByHumanWhite);
    assert!(table.game().stacks().is_empty());
    assert_eq!(table.reserve(Color::White).len(), 2);
    let published = drain(&mut changes);
    assert!(published.contains(&Property::Stacks));
    assert!(published.contains(&Property::ReserveWhite));
}

#[tokio::test]
async fn test_start_rejected_during_game() {
    let mut table = table(ScriptedGame::opening(), PlayMode::HumanVersusHuman);
    let _ = table.execute(Command::Start);
    let _ = table.attempt_place(Bug::Ant, Hex::new(0, 0));
    let mut changes = table.subscribe();

    assert_eq!(table.execute(Command::Start), CommandOutcome::Rejected);

    assert_eq!(table.game().stacks().len(), 1);
    assert!(drain(&mut changes).is_empty());
}

#[tokio::test]
async fn test_abort_rejected_while_engine_thinks() {
    let mut table = table(ScriptedGame::opening(), PlayMode::ComputerGoesFirst);
    let _ = table.execute(Command::Start);

    assert!(!table.is_enabled(Command::Abort));
    assert_eq!(table.execute(Command::Abort), CommandOutcome::Rejected);
    assert_eq!(table.status(), Status::NextTurnByComputerWhite);

    table.run_until_idle().await;
    assert!(table.is_enabled(Command::Abort));
}

#[tokio::test]
async fn test_skip_turn_only_when_stuck() {
    let mut table = table(ScriptedGame::opening(), PlayMode::HumanVersusHuman);
    let _ = table.execute(Command::Start);

    assert!(!table.is_enabled(Command::SkipTurn));
    assert_eq!(table.execute(Command::SkipTurn), CommandOutcome::Rejected);
    assert_eq!(table.status(), Status::NextTurnByHumanWhite);
}

#[tokio::test]
async fn test_skip_turn_passes_to_opponent() {
    let mut table = table(ScriptedGame::stalemated(), PlayMode::HumanVersusHuman);
    let _ = table.execute(Command::Start);
    assert!(table.is_enabled(Command::SkipTurn));

    assert_eq!(table.execute(Command::SkipTurn), CommandOutcome::Applied);

    assert_eq!(table.status(), Status::NextTurnByHumanBlack);
    assert!(!table.is_enabled(Command::SkipTurn));
    assert!(!table.can_drag_reserve(Color::White));
    assert!(table.can_drag_reserve(Color::Black));
}

#[tokio::test]
async fn test_published_guards_match_status() {
    let mut table = table(ScriptedGame::opening(), PlayMode::HumanVersusHuman);

    for step in 0..3 {
        let status = table.status();
        assert_eq!(table.is_enabled(Command::Start), !status.is_game_in_progress(), "step {step}");
        assert_eq!(table.is_enabled(Command::Abort), status.is_human_turn(), "step {step}");
        assert_eq!(table.accepts_moves(), status.is_human_turn(), "step {step}");
        match step {
            0 => {
                let _ = table.execute(Command::Start);
            }
            1 => {
                let _ = table.execute(Command::Abort);
            }
            _ => {}
        }
    }
}

#[test]
fn test_every_command_has_a_label() {
    for command in Command::iter() {
        assert!(!command.label().is_empty());
    }
}
