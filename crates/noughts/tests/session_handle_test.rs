//! Timing and cancellation of the computer's move.

use noughts::{Phase, SessionConfig, SessionEvent, SessionHandle};
use noughts_engine::{
    Board, Difficulty, GameStatus, Mark, MoveError, MoveGenerator, OptimalMove, Outcome, Position,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep};

const DELAY: Duration = Duration::from_millis(500);

fn config(difficulty: Difficulty) -> SessionConfig {
    SessionConfig::default()
        .with_difficulty(difficulty)
        .with_thinking_delay_ms(500)
        .with_seed(Some(99))
}

async fn next_computer_move(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Position {
    loop {
        match rx.recv().await.expect("session alive") {
            SessionEvent::MoveMade {
                mv,
                by_computer: true,
            } => return mv.position,
            _ => continue,
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_reply_arrives_after_delay() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let session = SessionHandle::with_events(&config(Difficulty::Hard), tx);

    let start = Instant::now();
    session.play_human(4).expect("legal move");
    assert!(session.is_thinking());
    assert_eq!(session.play_human(0), Err(MoveError::NotYourTurn));

    let reply = next_computer_move(&mut rx).await;
    let elapsed = start.elapsed();
    assert!(elapsed >= DELAY && elapsed < DELAY + Duration::from_millis(10));
    assert_eq!(reply, Position::TopLeft);
    assert_eq!(session.phase(), Phase::HumanToMove);
    assert_eq!(session.history_len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_events_follow_play_order() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let session = SessionHandle::with_events(&config(Difficulty::Hard), tx);
    session.play_human(4).expect("legal move");

    assert!(matches!(
        rx.recv().await,
        Some(SessionEvent::MoveMade {
            by_computer: false,
            ..
        })
    ));
    assert_eq!(
        rx.recv().await,
        Some(SessionEvent::ComputerThinking { step: 1 })
    );
    assert!(matches!(
        rx.recv().await,
        Some(SessionEvent::MoveMade {
            by_computer: true,
            ..
        })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_rewind_cancels_pending_move() {
    let session = SessionHandle::new(&config(Difficulty::Easy));
    session.play_human(4).expect("legal move");

    sleep(Duration::from_millis(200)).await;
    session.jump_to(0).expect("valid step");
    sleep(DELAY * 4).await;

    assert_eq!(session.current_board(), Board::new());
    assert_eq!(session.history_len(), 2);
    assert_eq!(session.phase(), Phase::HumanToMove);
}

#[tokio::test(start_paused = true)]
async fn test_new_game_cancels_pending_move() {
    let session = SessionHandle::new(&config(Difficulty::Medium));
    session.play_human(0).expect("legal move");

    sleep(Duration::from_millis(499)).await;
    session.new_game();
    sleep(DELAY * 4).await;

    assert_eq!(session.history_len(), 1);
    assert_eq!(session.current_status(), GameStatus::InProgress(Mark::X));
}

#[tokio::test(start_paused = true)]
async fn test_difficulty_change_restarts_thinking() {
    let session = SessionHandle::new(&config(Difficulty::Easy));
    session.play_human(4).expect("legal move");

    sleep(Duration::from_millis(300)).await;
    session.set_difficulty(Difficulty::Hard);
    assert_eq!(session.difficulty(), Difficulty::Hard);

    // The Easy move would have landed at 500ms.
    sleep(Duration::from_millis(400)).await;
    assert!(session.is_thinking());
    assert_eq!(session.history_len(), 2);

    sleep(Duration::from_millis(200)).await;
    assert_eq!(session.history_len(), 3);
    assert_eq!(session.moves()[1].position, Position::TopLeft);
}

#[tokio::test(start_paused = true)]
async fn test_jump_restores_every_snapshot() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let session = SessionHandle::with_events(&config(Difficulty::Hard), tx);
    for _ in 0..3 {
        if session.phase() != Phase::HumanToMove {
            break;
        }
        let first_empty = session.current_board().empty_cells()[0];
        session.play_human(first_empty.to_index()).expect("legal move");
        if session.is_thinking() {
            next_computer_move(&mut rx).await;
        }
    }

    let history = session.history();
    assert_eq!(history.len(), session.history_len());
    for (step, board) in history.iter().enumerate() {
        session.jump_to(step).expect("valid step");
        assert_eq!(&session.current_board(), board);
        assert_eq!(session.history(), history);
    }

    let len = history.len();
    assert!(session.jump_to(len).is_err());
    assert_eq!(session.history(), history);
}

#[tokio::test(start_paused = true)]
async fn test_jump_onto_computer_turn_reschedules() {
    let session = SessionHandle::new(&config(Difficulty::Hard));
    session.play_human(4).expect("legal move");
    sleep(DELAY * 2).await;
    session.play_human(8).expect("legal move");
    sleep(DELAY * 2).await;
    assert_eq!(session.history_len(), 5);

    session.jump_to(1).expect("valid step");
    assert!(session.is_thinking());
    sleep(DELAY * 2).await;

    // Playing from step 1 replaces the forward history.
    assert_eq!(session.history_len(), 3);
    assert_eq!(session.phase(), Phase::HumanToMove);
}

#[tokio::test(start_paused = true)]
async fn test_computer_opens_as_x() {
    let session = SessionHandle::new(&config(Difficulty::Hard).with_human_mark(Mark::O));
    assert!(session.is_thinking());
    assert_eq!(session.play_human(4), Err(MoveError::NotYourTurn));

    sleep(DELAY * 2).await;
    assert_eq!(session.current_board().count(Mark::X), 1);
    assert_eq!(session.current_status(), GameStatus::InProgress(Mark::O));
}

#[tokio::test(start_paused = true)]
async fn test_draw_locks_the_board() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let session = SessionHandle::with_events(&config(Difficulty::Hard), tx);
    let mut human = OptimalMove::new();

    while session.phase() == Phase::HumanToMove {
        let pos = human
            .select_move(&session.current_board(), Mark::X)
            .expect("board has room");
        session.play_human(pos.to_index()).expect("legal move");
        if session.is_thinking() {
            next_computer_move(&mut rx).await;
        }
    }

    assert_eq!(session.current_status(), GameStatus::Draw);
    assert_eq!(session.phase(), Phase::Terminal(Outcome::Draw));
    for index in 0..9 {
        assert_eq!(session.play_human(index), Err(MoveError::GameOver));
    }
    assert_eq!(session.history_len(), 10);
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_serializes() {
    let session = SessionHandle::new(&config(Difficulty::Hard));
    session.play_human(4).expect("legal move");
    sleep(DELAY * 2).await;

    let json = serde_json::to_value(session.snapshot()).expect("serializable");
    assert_eq!(json["step"], 2);
    assert_eq!(json["history_len"], 3);
    assert_eq!(json["difficulty"], "hard");
    assert_eq!(json["moves"].as_array().map(Vec::len), Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_thinking() {
    let session = SessionHandle::new(&config(Difficulty::Hard));
    session.play_human(4).expect("legal move");
    assert!(session.is_thinking());

    session.shutdown();
    assert!(!session.is_thinking());
    assert_eq!(session.phase(), Phase::ComputerThinking);

    sleep(DELAY * 4).await;
    assert_eq!(session.history_len(), 2);
}

#[test]
fn test_no_runtime_means_no_thinking() {
    let session = SessionHandle::new(&config(Difficulty::Hard).with_human_mark(Mark::O));
    assert_eq!(session.phase(), Phase::ComputerThinking);
    assert!(!session.is_thinking());
    assert_eq!(session.history_len(), 1);
}
