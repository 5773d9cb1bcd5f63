//! Whole-engine scenarios through the public API.

use rand::SeedableRng;
use rand::rngs::StdRng;
use reversi_engine::ai::{Difficulty, Searcher, TERMINAL_SCORE, best_move, evaluate};
use reversi_engine::{Board, EngineError, Player, Position, initial_board};

fn p(row: u8, col: u8) -> Position {
    Position::new(row, col).unwrap()
}

#[test]
fn opening_moves_and_first_capture() {
    let board = initial_board();

    assert_eq!(
        board.legal_moves(Player::Black),
        vec![p(2, 3), p(3, 2), p(4, 5), p(5, 4)]
    );
    assert_eq!(board.legal_moves(Player::White).len(), 4);

    assert_eq!(board.flipped_by(p(2, 3), Player::Black), vec![p(3, 3)]);
    let next = board.apply_move(p(2, 3), Player::Black).unwrap();
    assert_eq!(next.count(), (4, 1));
}

#[test]
fn corner_capture_along_the_top_edge() {
    let board: Board = "
        .OX.....
        ........
        ........
        ........
        ........
        ........
        ........
        ........"
        .parse()
        .unwrap();

    assert_eq!(board.flipped_by(p(0, 0), Player::Black), vec![p(0, 1)]);
    assert!(board.legal_moves(Player::Black).contains(&p(0, 0)));
}

#[test]
fn illegal_move_fails_loudly() {
    let board = initial_board();

    assert_eq!(
        board.apply_move(p(7, 7), Player::White),
        Err(EngineError::IllegalMove {
            row: 7,
            col: 7,
            player: Player::White
        })
    );
}

#[test]
fn winner_and_terminal_detection() {
    let board: Board = "
        XXXO....
        ........
        ........
        ........
        ........
        ........
        ........
        ........"
        .parse()
        .unwrap();
    assert_eq!(board.winner(), Some(Player::Black));

    let full_white = Board::from_bitboards(0, u64::MAX).unwrap();
    assert!(full_white.is_terminal());
    assert_eq!(full_white.winner(), Some(Player::White));
    assert_eq!(evaluate(&full_white, Player::White), TERMINAL_SCORE);
}

#[test]
fn computer_vs_computer_game_finishes() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut board = initial_board();
    let mut player = Player::Black;
    let mut plies = 0;

    while !board.is_terminal() {
        let tier = match player {
            Player::Black => Difficulty::Easy,
            Player::White => Difficulty::Medium,
        };
        match best_move(&board, player, tier, &mut rng) {
            Some(mv) => {
                board = board.apply_move(mv, player).unwrap();
                plies += 1;
            }
            None => assert!(board.has_legal_move(player.opponent())),
        }
        player = player.opponent();
    }

    assert!(plies <= 60);
    let (black, white) = board.count();
    assert_eq!(black as u32 + white as u32 + board.empty_count() as u32, 64);
}

#[test]
fn searchers_can_run_on_separate_threads() {
    let board = initial_board().apply_move(p(2, 3), Player::Black).unwrap();

    let handles: Vec<_> = (0..4u64)
        .map(|seed| {
            std::thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                Searcher::new(3).search(&board, Player::White, &mut rng)
            })
        })
        .collect();

    for handle in handles {
        let outcome = handle.join().unwrap().unwrap();
        assert!(board.is_legal(outcome.position, Player::White));
    }
}
