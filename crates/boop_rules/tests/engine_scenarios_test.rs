//! Scenario tests for full moves through the engine.

use boop_rules::{
    Board, BoopMovement, GameState, MoveError, Phase, PieceKind, Player, PlayerStock, Position,
};

fn pos(x: u8, y: u8) -> Position {
    Position::new(x, y)
}

/// Builds a board from `(x, y, piece)` triples.
fn board_with(pieces: &[(u8, u8, PieceKind)]) -> Board {
    let mut board = Board::new();
    for &(x, y, kind) in pieces {
        board.set(pos(x, y), kind).expect("on board");
    }
    board
}

fn stock(kittens: u8, cats: u8, placed: u8) -> PlayerStock {
    PlayerStock::new(kittens, cats, placed).expect("valid stock")
}

fn counts(state: &GameState, player: Player) -> (u8, u8, u8) {
    let s = state.stock(player);
    (s.kittens(), s.cats(), s.placed())
}

#[test]
fn test_first_placement_on_empty_board() {
    let mut game = GameState::new();

    let report = game.place(pos(3, 3), PieceKind::P1Kitten).expect("legal move");

    assert!(report.boops.is_empty());
    assert_eq!(game.board().get(pos(3, 3)), Some(PieceKind::P1Kitten));
    assert!(game.boop_movements().is_empty());
    assert_eq!(game.phase(), &Phase::AwaitingMove);
    assert_eq!(game.turn_number(), 1);
    assert_eq!(game.active_player(), Player::Two);
    assert_eq!(counts(&game, Player::One), (7, 0, 1));
}

#[test]
fn test_boop_pushes_into_empty_cell() {
    let board = board_with(&[(3, 2, PieceKind::P2Kitten)]);
    let mut game = GameState::from_parts(0, board, stock(8, 0, 0), stock(7, 0, 1)).unwrap();

    game.place(pos(3, 3), PieceKind::P1Kitten).expect("legal move");

    assert_eq!(game.board().get(pos(3, 1)), Some(PieceKind::P2Kitten));
    assert!(game.board().is_empty(pos(3, 2)));
    assert_eq!(
        game.boop_movements(),
        &[BoopMovement {
            position: pos(3, 2),
            final_position: pos(3, 1),
            tile: PieceKind::P2Kitten,
        }]
    );
}

#[test]
fn test_boop_off_the_corner_returns_piece_to_hand() {
    let board = board_with(&[(0, 0, PieceKind::P2Kitten)]);
    let mut game = GameState::from_parts(0, board, stock(8, 0, 0), stock(7, 0, 1)).unwrap();

    game.place(pos(1, 1), PieceKind::P1Kitten).expect("legal move");

    assert!(game.board().is_empty(pos(0, 0)));
    assert_eq!(counts(&game, Player::Two), (8, 0, 0));
    assert!(game.boop_movements().is_empty());
}

#[test]
fn test_kitten_cannot_boop_cat() {
    let board = board_with(&[(3, 2, PieceKind::P2Cat)]);
    let mut game = GameState::from_parts(0, board, stock(8, 0, 0), stock(7, 0, 1)).unwrap();

    let report = game.place(pos(3, 3), PieceKind::P1Kitten).expect("legal move");

    assert!(report.boops.is_empty());
    assert_eq!(game.board().get(pos(3, 2)), Some(PieceKind::P2Cat));
    assert!(game.boop_movements().is_empty());
}

#[test]
fn test_single_line_graduates_automatically() {
    let board = board_with(&[(0, 0, PieceKind::P1Kitten), (1, 0, PieceKind::P1Kitten)]);
    let mut game = GameState::from_parts(0, board, stock(6, 0, 2), stock(8, 0, 0)).unwrap();

    let report = game.place(pos(2, 0), PieceKind::P1Kitten).expect("legal move");

    assert_eq!(report.graduated, Some([pos(0, 0), pos(1, 0), pos(2, 0)]));
    for x in 0..3 {
        assert!(game.board().is_empty(pos(x, 0)));
    }
    assert_eq!(counts(&game, Player::One), (5, 3, 0));
    assert_eq!(game.phase(), &Phase::AwaitingMove);
    assert_eq!(game.turn_number(), 1);
}

#[test]
fn test_two_lines_wait_for_a_choice() {
    let board = board_with(&[
        (0, 0, PieceKind::P1Kitten),
        (1, 0, PieceKind::P1Kitten),
        (2, 1, PieceKind::P1Kitten),
        (2, 2, PieceKind::P1Kitten),
    ]);
    let mut game = GameState::from_parts(0, board, stock(4, 0, 4), stock(8, 0, 0)).unwrap();

    game.place(pos(2, 0), PieceKind::P1Kitten).expect("legal move");

    let choices: Vec<_> = game.pending_lines().iter().map(|line| line.choice).collect();
    assert_eq!(choices, vec![pos(0, 0), pos(2, 0)]);
    assert!(matches!(game.phase(), Phase::AwaitingLineChoice { .. }));
    assert_eq!(game.turn_number(), 0);

    // A cell of a line that is not its choice key is refused.
    let before = game.clone();
    assert_eq!(game.choose(pos(1, 0)), Err(MoveError::InvalidLineChoice(pos(1, 0))));
    assert_eq!(game.choose(pos(5, 5)), Err(MoveError::InvalidLineChoice(pos(5, 5))));
    assert_eq!(game, before);

    game.choose(pos(2, 0)).expect("offered choice");

    for y in 0..3 {
        assert!(game.board().is_empty(pos(2, y)));
    }
    assert_eq!(game.board().get(pos(0, 0)), Some(PieceKind::P1Kitten));
    assert_eq!(game.board().get(pos(1, 0)), Some(PieceKind::P1Kitten));
    assert_eq!(counts(&game, Player::One), (3, 3, 2));
    assert_eq!(game.phase(), &Phase::AwaitingMove);
    assert_eq!(game.turn_number(), 1);
    assert!(game.pending_lines().is_empty());
}

#[test]
fn test_lines_meeting_at_a_corner_offer_two_choices() {
    let board = board_with(&[
        (1, 0, PieceKind::P1Kitten),
        (2, 0, PieceKind::P1Kitten),
        (0, 1, PieceKind::P1Kitten),
        (0, 2, PieceKind::P1Kitten),
    ]);
    let mut game = GameState::from_parts(0, board, stock(4, 0, 4), stock(8, 0, 0)).unwrap();

    game.place(pos(0, 0), PieceKind::P1Kitten).expect("legal move");

    let choices: Vec<_> = game.pending_lines().iter().map(|line| line.choice).collect();
    assert_eq!(choices, vec![pos(0, 0), pos(0, 2)]);

    game.choose(pos(0, 2)).expect("vertical line is selectable");

    for y in 0..3 {
        assert!(game.board().is_empty(pos(0, y)));
    }
    assert_eq!(game.board().get(pos(1, 0)), Some(PieceKind::P1Kitten));
    assert_eq!(game.board().get(pos(2, 0)), Some(PieceKind::P1Kitten));
    assert_eq!(counts(&game, Player::One), (3, 3, 2));
    assert_eq!(game.turn_number(), 1);
}

#[test]
fn test_three_cats_win_before_graduation() {
    let board = board_with(&[(0, 0, PieceKind::P1Cat), (1, 0, PieceKind::P1Cat)]);
    let mut game = GameState::from_parts(0, board, stock(5, 1, 2), stock(8, 0, 0)).unwrap();

    let report = game.place(pos(2, 0), PieceKind::P1Cat).expect("legal move");

    assert_eq!(report.graduated, None);
    assert_eq!(game.phase(), &Phase::Concluded { winner: Player::One });
    assert_eq!(game.winner(), Some(Player::One));
    assert_eq!(game.board().count_of(Player::One), 3);
    assert_eq!(game.turn_number(), 0);

    assert_eq!(game.place(pos(5, 5), PieceKind::P2Kitten), Err(MoveError::GameOver));
}

#[test]
fn test_opponent_line_is_left_for_their_turn() {
    let board = board_with(&[
        (0, 5, PieceKind::P2Kitten),
        (1, 5, PieceKind::P2Kitten),
        (2, 5, PieceKind::P2Kitten),
    ]);
    let mut game = GameState::from_parts(0, board, stock(8, 0, 0), stock(5, 0, 3)).unwrap();

    game.place(pos(5, 0), PieceKind::P1Kitten).expect("legal move");
    assert_eq!(game.board().count_of(Player::Two), 3);
    assert_eq!(game.turn_number(), 1);

    let report = game.place(pos(5, 2), PieceKind::P2Kitten).expect("legal move");
    assert_eq!(report.graduated, Some([pos(0, 5), pos(1, 5), pos(2, 5)]));
    assert_eq!(counts(&game, Player::Two), (4, 3, 1));
}

fn spaced_positions() -> [Position; 7] {
    [
        pos(0, 0),
        pos(2, 0),
        pos(4, 0),
        pos(0, 2),
        pos(2, 2),
        pos(4, 2),
        pos(0, 4),
    ]
}

#[test]
fn test_eighth_piece_forces_a_return() {
    let mut board = Board::new();
    for cell in spaced_positions() {
        board.set(cell, PieceKind::P1Kitten).unwrap();
    }
    let mut game = GameState::from_parts(0, board, stock(1, 0, 7), stock(8, 0, 0)).unwrap();

    game.place(pos(4, 4), PieceKind::P1Kitten).expect("legal move");
    assert_eq!(game.phase(), &Phase::AwaitingReturnChoice);
    assert_eq!(game.turn_number(), 0);
    assert_eq!(counts(&game, Player::One), (0, 0, 8));

    let before = game.clone();
    assert_eq!(
        game.choose(pos(1, 1)),
        Err(MoveError::InvalidReturnChoice(pos(1, 1)))
    );
    assert_eq!(game, before);

    assert_eq!(game.choose_return(pos(2, 2)), Ok(PieceKind::P1Kitten));
    assert!(game.board().is_empty(pos(2, 2)));
    assert_eq!(counts(&game, Player::One), (1, 0, 7));
    assert_eq!(game.phase(), &Phase::AwaitingMove);
    assert_eq!(game.turn_number(), 1);
}

#[test]
fn test_returned_cat_stays_a_cat() {
    let mut board = Board::new();
    for cell in spaced_positions() {
        board.set(cell, PieceKind::P1Kitten).unwrap();
    }
    board.set(pos(4, 0), PieceKind::P1Cat).unwrap();
    let mut game = GameState::from_parts(0, board, stock(1, 0, 7), stock(8, 0, 0)).unwrap();

    game.place(pos(4, 4), PieceKind::P1Kitten).expect("legal move");
    game.choose(pos(4, 0)).expect("own piece");

    assert_eq!(counts(&game, Player::One), (0, 1, 7));
}

#[test]
fn test_eight_cats_on_board_wins() {
    let mut board = Board::new();
    for cell in spaced_positions() {
        board.set(cell, PieceKind::P1Cat).unwrap();
    }
    let mut game = GameState::from_parts(0, board, stock(0, 1, 7), stock(8, 0, 0)).unwrap();

    game.place(pos(4, 4), PieceKind::P1Cat).expect("legal move");

    assert_eq!(game.phase(), &Phase::Concluded { winner: Player::One });
    assert_eq!(game.turn_number(), 0);
}

#[test]
fn test_wire_state_offers_line_choices() {
    let board = board_with(&[
        (0, 0, PieceKind::P1Kitten),
        (1, 0, PieceKind::P1Kitten),
        (2, 1, PieceKind::P1Kitten),
        (2, 2, PieceKind::P1Kitten),
    ]);
    let mut game = GameState::from_parts(0, board, stock(4, 0, 4), stock(8, 0, 0)).unwrap();
    game.place(pos(2, 0), PieceKind::P1Kitten).unwrap();

    let json = serde_json::to_value(&game).unwrap();
    assert_eq!(json["phase"]["kind"], "awaitingLineChoice");
    assert_eq!(json["phase"]["lines"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["threeChoices"][1], serde_json::json!({"x": 2, "y": 0}));
    assert_eq!(json["placed"]["piece"], 1);
}
