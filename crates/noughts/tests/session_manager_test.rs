//! Session registry and match runner.

use noughts::{SessionConfig, SessionError, SessionManager, play_match};
use noughts_engine::{Board, Difficulty, Mark};
use std::time::Duration;
use tokio::time::sleep;

fn manager() -> SessionManager {
    SessionManager::new(
        SessionConfig::default()
            .with_difficulty(Difficulty::Hard)
            .with_thinking_delay_ms(100),
    )
}

#[tokio::test(start_paused = true)]
async fn test_sessions_are_isolated() {
    let manager = manager();
    let alice = manager.create_session("alice", None).expect("new id");
    let bob = manager.create_session("bob", None).expect("new id");

    alice.play_human(4).expect("legal move");
    sleep(Duration::from_millis(300)).await;

    assert_eq!(alice.history_len(), 3);
    assert_eq!(bob.history_len(), 1);
    assert_eq!(bob.current_board(), Board::new());

    bob.set_difficulty(Difficulty::Easy);
    assert_eq!(alice.difficulty(), Difficulty::Hard);
}

#[tokio::test(start_paused = true)]
async fn test_handles_share_one_session() {
    let manager = manager();
    manager.create_session("game", None).expect("new id");

    let first = manager.get_session("game").expect("registered");
    let second = manager.get_session("game").expect("registered");
    first.play_human(0).expect("legal move");
    assert_eq!(second.step(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_and_missing_ids() {
    let manager = manager();
    manager.create_session("game", None).expect("new id");
    assert_eq!(
        manager.create_session("game", None).unwrap_err(),
        SessionError::AlreadyExists("game".to_string())
    );
    assert!(manager.get_session("other").is_none());
    assert_eq!(
        manager.remove_session("other"),
        Err(SessionError::NotFound("other".to_string()))
    );
}

#[tokio::test(start_paused = true)]
async fn test_list_and_remove() {
    let manager = manager();
    for id in ["c", "a", "b"] {
        manager.create_session(id, None).expect("new id");
    }
    assert_eq!(manager.list_sessions(), vec!["a", "b", "c"]);

    manager.remove_session("b").expect("registered");
    assert_eq!(manager.list_sessions(), vec!["a", "c"]);
}

#[tokio::test(start_paused = true)]
async fn test_removed_session_stops_thinking() {
    let manager = manager();
    let handle = manager
        .create_session(
            "late",
            Some(SessionConfig::default().with_human_mark(Mark::O)),
        )
        .expect("new id");
    assert!(handle.is_thinking());

    manager.remove_session("late").expect("registered");
    assert!(!handle.is_thinking());
    sleep(Duration::from_secs(5)).await;
    assert_eq!(handle.history_len(), 1);
}

#[test]
fn test_hard_never_loses_to_easy() {
    for (x, o) in [
        (Difficulty::Hard, Difficulty::Easy),
        (Difficulty::Easy, Difficulty::Hard),
    ] {
        let report = play_match(x, o, 40, Some(5)).expect("match runs");
        assert_eq!(report.x_wins + report.o_wins + report.draws, 40);
        if x == Difficulty::Hard {
            assert_eq!(report.o_wins, 0);
        } else {
            assert_eq!(report.x_wins, 0);
        }
    }
}
