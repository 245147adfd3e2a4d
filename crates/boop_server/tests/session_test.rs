//! Session turn handling and broadcasts.

use boop_rules::{MoveError, Phase, PieceKind, Player, Position};
use boop_server::{ServerMessage, Session, SessionError};
use tokio::sync::mpsc;

type Queue = mpsc::UnboundedReceiver<ServerMessage>;

fn drain(queue: &mut Queue) -> Vec<ServerMessage> {
    let mut frames = Vec::new();
    while let Ok(frame) = queue.try_recv() {
        frames.push(frame);
    }
    frames
}

/// A session with both seats filled and the `joined` frames drained.
fn full_session() -> (Session, Queue, Queue) {
    let (tx1, mut rx1) = mpsc::unbounded_channel();
    let (tx2, mut rx2) = mpsc::unbounded_channel();
    let session = Session::open("GAME01".to_string(), tx1);
    assert_eq!(session.seat(tx2), Ok(Player::Two));
    drain(&mut rx1);
    drain(&mut rx2);
    (session, rx1, rx2)
}

#[test]
fn test_seating_queues_joined_frames() {
    let (tx1, mut rx1) = mpsc::unbounded_channel();
    let (tx2, mut rx2) = mpsc::unbounded_channel();
    let session = Session::open("GAME01".to_string(), tx1);
    session.seat(tx2).unwrap();

    for (queue, seat) in [(&mut rx1, Player::One), (&mut rx2, Player::Two)] {
        match drain(queue).as_slice() {
            [ServerMessage::Joined {
                game_id, player_id, ..
            }] => {
                assert_eq!(game_id, "GAME01");
                assert_eq!(*player_id, seat);
            }
            other => panic!("expected a single joined frame, got {other:?}"),
        }
    }
}

#[test]
fn test_moves_wait_for_an_opponent() {
    let (tx1, _rx1) = mpsc::unbounded_channel();
    let session = Session::open("GAME01".to_string(), tx1);

    let result = session.submit_move(Player::One, Position::new(3, 3), 0);
    assert_eq!(result, Err(SessionError::WaitingForOpponent));
    assert_eq!(session.game().turn_number(), 0);
}

#[test]
fn test_move_is_broadcast_to_both_players() {
    let (session, mut rx1, mut rx2) = full_session();

    session
        .submit_move(Player::One, Position::new(3, 3), 0)
        .expect("legal move");

    for (queue, seat) in [(&mut rx1, Player::One), (&mut rx2, Player::Two)] {
        match drain(queue).as_slice() {
            [ServerMessage::GameState {
                player_id,
                state,
                payload,
                ..
            }] => {
                assert_eq!(*player_id, seat);
                assert_eq!(*state, "awaitingMove");
                assert_eq!(payload.turn_number(), 1);
                assert_eq!(
                    payload.board().get(Position::new(3, 3)),
                    Some(PieceKind::P1Kitten)
                );
            }
            other => panic!("expected a single state frame, got {other:?}"),
        }
    }
}

#[test]
fn test_out_of_turn_input_is_rejected() {
    let (session, mut rx1, mut rx2) = full_session();

    let result = session.submit_move(Player::Two, Position::new(0, 0), 0);
    assert_eq!(result, Err(SessionError::NotYourTurn));

    let result = session.submit_choice(Player::Two, Position::new(0, 0));
    assert_eq!(result, Err(SessionError::NotYourTurn));

    assert!(drain(&mut rx1).is_empty());
    assert!(drain(&mut rx2).is_empty());
    assert_eq!(session.game().turn_number(), 0);
}

#[test]
fn test_choice_while_awaiting_move_is_wrong_phase() {
    let (session, _rx1, _rx2) = full_session();

    let result = session.submit_choice(Player::One, Position::new(0, 0));
    assert!(matches!(
        result,
        Err(SessionError::Rule(MoveError::WrongPhase { .. }))
    ));
}

#[test]
fn test_rule_rejection_keeps_state() {
    let (session, _rx1, _rx2) = full_session();
    session.submit_move(Player::One, Position::new(2, 2), 0).unwrap();
    let before = session.game();

    let result = session.submit_move(Player::Two, Position::new(2, 2), 0);
    assert_eq!(
        result,
        Err(SessionError::Rule(MoveError::CellOccupied(Position::new(2, 2))))
    );
    let result = session.submit_move(Player::Two, Position::new(0, 0), 1);
    assert_eq!(
        result,
        Err(SessionError::Rule(MoveError::NoStock(PieceKind::P2Cat)))
    );
    assert_eq!(session.game(), before);
}

#[test]
fn test_players_alternate() {
    let (session, _rx1, _rx2) = full_session();
    let moves = [
        (Player::One, Position::new(0, 0)),
        (Player::Two, Position::new(5, 5)),
        (Player::One, Position::new(0, 5)),
        (Player::Two, Position::new(5, 0)),
    ];

    for (player, position) in moves {
        session.submit_move(player, position, 0).unwrap();
    }

    let game = session.game();
    assert_eq!(game.turn_number(), 4);
    assert_eq!(game.active_player(), Player::One);
    assert_eq!(game.phase(), &Phase::AwaitingMove);
}

#[test]
fn test_departed_player_cannot_move() {
    let (session, _rx1, _rx2) = full_session();

    assert_eq!(session.remove_player(Player::One), 1);
    assert!(!session.is_closed());
    assert_eq!(
        session.submit_move(Player::One, Position::new(0, 0), 0),
        Err(SessionError::UnknownPlayer(Player::One))
    );

    assert_eq!(session.remove_player(Player::Two), 0);
    assert!(session.is_closed());
}

#[test]
fn test_error_frame_carries_phase() {
    let (session, _rx1, _rx2) = full_session();
    match session.error_message("Not your turn") {
        ServerMessage::Error {
            game_id,
            payload,
            state,
        } => {
            assert_eq!(game_id, "GAME01");
            assert_eq!(payload, "Not your turn");
            assert_eq!(state, "awaitingMove");
        }
        other => panic!("expected an error frame, got {other:?}"),
    }
}

#[test]
fn test_concurrent_play_broadcasts_in_commit_order() {
    let (session, mut rx1, mut rx2) = full_session();

    std::thread::scope(|scope| {
        for player in [Player::One, Player::Two] {
            let session = &session;
            scope.spawn(move || {
                for attempt in 0..2_000 {
                    let game = session.game();
                    if game.is_concluded() || game.turn_number() >= 12 {
                        break;
                    }
                    let cell = Position::all().nth(attempt % 36).unwrap();
                    let _ = session.submit_move(player, cell, 0);
                    let _ = session.submit_choice(player, cell);
                }
            });
        }
    });

    let final_game = session.game();
    for queue in [&mut rx1, &mut rx2] {
        let states: Vec<_> = drain(queue)
            .into_iter()
            .map(|frame| match frame {
                ServerMessage::GameState { payload, .. } => payload,
                other => panic!("expected a game state frame, got {other:?}"),
            })
            .collect();

        assert!(!states.is_empty());
        assert!(
            states
                .windows(2)
                .all(|pair| pair[0].turn_number() <= pair[1].turn_number())
        );
        assert_eq!(states.last(), Some(&final_game));
    }
}
