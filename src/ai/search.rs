use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;
use web_time::Instant;

use crate::ai::difficulty::Difficulty;
use crate::ai::eval::{TERMINAL_SCORE, evaluate};
use crate::board::Board;
use crate::types::{Player, Position};

const MIN_SCORE: i32 = -TERMINAL_SCORE - 1;
const MAX_SCORE: i32 = TERMINAL_SCORE + 1;

/// Result of a root search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub position: Position,
    /// Minimax score of `position` from the searching player's view.
    pub score: i32,
    pub nodes: u64,
}

/// Depth-limited minimax with alpha-beta pruning.
pub struct Searcher {
    max_depth: u8,
    nodes: u64,
}

impl Searcher {
    /// `max_depth` counts plies including the root move; zero is treated as one.
    pub fn new(max_depth: u8) -> Self {
        Self {
            max_depth: max_depth.max(1),
            nodes: 0,
        }
    }

    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    /// Nodes visited by the last search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Searches the best move for `player`, breaking ties uniformly at random.
    /// Returns `None` when `player` has no legal move.
    pub fn search<R: Rng + ?Sized>(
        &mut self,
        board: &Board,
        player: Player,
        rng: &mut R,
    ) -> Option<SearchOutcome> {
        let start_time = Instant::now();
        self.nodes = 0;

        let moves = board.legal_moves(player);
        let mut best_score = MIN_SCORE;
        let mut best_moves = Vec::with_capacity(moves.len());

        for mv in moves {
            let next = board.play_legal(mv, player);
            // Lower bound one below the best so equal-best siblings get exact scores.
            let score = self.minimax(
                &next,
                self.max_depth - 1,
                false,
                player,
                best_score - 1,
                MAX_SCORE,
            );

            if score > best_score {
                best_score = score;
                best_moves.clear();
                best_moves.push(mv);
            } else if score == best_score {
                best_moves.push(mv);
            }
        }

        let position = *best_moves.choose(rng)?;
        debug!(
            "search depth={} player={} best={} score={} ties={} nodes={} elapsed={:?}",
            self.max_depth,
            player,
            position,
            best_score,
            best_moves.len(),
            self.nodes,
            start_time.elapsed()
        );

        Some(SearchOutcome {
            position,
            score: best_score,
            nodes: self.nodes,
        })
    }

    /// Exact minimax score of every legal move of `player`, in row-major order.
    pub fn score_moves(&mut self, board: &Board, player: Player) -> Vec<(Position, i32)> {
        self.nodes = 0;
        board
            .legal_moves(player)
            .into_iter()
            .map(|mv| {
                let next = board.play_legal(mv, player);
                let score =
                    self.minimax(&next, self.max_depth - 1, false, player, MIN_SCORE, MAX_SCORE);
                (mv, score)
            })
            .collect()
    }

    fn minimax(
        &mut self,
        board: &Board,
        depth: u8,
        maximizing: bool,
        root: Player,
        alpha: i32,
        beta: i32,
    ) -> i32 {
        self.nodes += 1;

        if depth == 0 {
            return evaluate(board, root);
        }

        let to_move = if maximizing { root } else { root.opponent() };
        let moves = board.legal_moves(to_move);
        if moves.is_empty() {
            if !board.has_legal_move(to_move.opponent()) {
                return evaluate(board, root);
            }
            // Pass: same board, the other side moves, and the ply still counts.
            return self.minimax(board, depth - 1, !maximizing, root, alpha, beta);
        }

        let mut alpha = alpha;
        let mut beta = beta;

        if maximizing {
            let mut best = MIN_SCORE;
            for mv in moves {
                let next = board.play_legal(mv, to_move);
                let score = self.minimax(&next, depth - 1, false, root, alpha, beta);
                best = best.max(score);
                alpha = alpha.max(best);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = MAX_SCORE;
            for mv in moves {
                let next = board.play_legal(mv, to_move);
                let score = self.minimax(&next, depth - 1, true, root, alpha, beta);
                best = best.min(score);
                beta = beta.min(best);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }
}

/// Picks a move for `player` at the given strength.
///
/// With the tier's randomness probability a uniformly random legal move is
/// played; otherwise the best move of a search at the tier's depth.
pub fn best_move<R: Rng + ?Sized>(
    board: &Board,
    player: Player,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<Position> {
    let settings = difficulty.settings();
    let moves = board.legal_moves(player);
    if moves.is_empty() {
        return None;
    }

    if settings.randomness > 0.0 && rng.random_bool(settings.randomness) {
        let position = moves.choose(rng).copied();
        debug!("{difficulty} tier played a random move: {position:?}");
        return position;
    }

    Searcher::new(settings.depth)
        .search(board, player, rng)
        .map(|outcome| outcome.position)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn plain_minimax(board: &Board, depth: u8, maximizing: bool, root: Player) -> i32 {
        if depth == 0 || board.is_terminal() {
            return evaluate(board, root);
        }
        let to_move = if maximizing { root } else { root.opponent() };
        let moves = board.legal_moves(to_move);
        if moves.is_empty() {
            return plain_minimax(board, depth - 1, !maximizing, root);
        }
        let scores = moves.iter().map(|&mv| {
            let next = board.apply_move(mv, to_move).unwrap();
            plain_minimax(&next, depth - 1, !maximizing, root)
        });
        if maximizing {
            scores.max().unwrap()
        } else {
            scores.min().unwrap()
        }
    }

    /// Random playout stopped once at most `empties` squares remain.
    fn endgame_board(seed: u64, empties: u8) -> (Board, Player) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = Board::new();
        let mut player = Player::Black;
        while board.empty_count() > empties && !board.is_terminal() {
            if let Some(&pos) = board.legal_moves(player).choose(&mut rng) {
                board = board.apply_move(pos, player).unwrap();
            }
            player = player.opponent();
        }
        if !board.has_legal_move(player) {
            player = player.opponent();
        }
        (board, player)
    }

    #[test]
    fn returns_none_without_legal_moves() {
        let mut rng = StdRng::seed_from_u64(1);
        let board = Board::from_bitboards(u64::MAX, 0).unwrap();

        for tier in Difficulty::ALL {
            assert_eq!(best_move(&board, Player::White, tier, &mut rng), None);
        }
        assert_eq!(Searcher::new(3).search(&board, Player::Black, &mut rng), None);
    }

    #[test]
    fn search_returns_single_legal_move() {
        let mut rng = StdRng::seed_from_u64(2);
        let black = 1u64 << 1;
        let white = u64::MAX ^ 1 ^ black;
        let board = Board::from_bitboards(black, white).unwrap();

        let outcome = Searcher::new(5).search(&board, Player::White, &mut rng).unwrap();
        assert_eq!(outcome.position, Position { row: 0, col: 0 });
        assert_eq!(outcome.score, TERMINAL_SCORE);
    }

    #[test]
    fn alpha_beta_agrees_with_plain_minimax() {
        for seed in 0..3 {
            let (board, player) = endgame_board(seed, 7);
            if board.is_terminal() {
                continue;
            }
            let mut searcher = Searcher::new(5);

            for (mv, score) in searcher.score_moves(&board, player) {
                let next = board.apply_move(mv, player).unwrap();
                assert_eq!(score, plain_minimax(&next, 4, false, player), "{mv}\n{board}");
            }
        }
    }

    #[test]
    fn hard_tier_always_plays_a_maximal_move() {
        for seed in 10..13 {
            let (board, player) = endgame_board(seed, 7);
            if board.is_terminal() {
                continue;
            }
            let best = board
                .legal_moves(player)
                .into_iter()
                .map(|mv| plain_minimax(&board.apply_move(mv, player).unwrap(), 4, false, player))
                .max()
                .unwrap();

            let mut rng = StdRng::seed_from_u64(seed);
            for _ in 0..5 {
                let mv = best_move(&board, player, Difficulty::Hard, &mut rng).unwrap();
                let next = board.apply_move(mv, player).unwrap();
                assert_eq!(plain_minimax(&next, 4, false, player), best, "{mv}\n{board}");
            }
        }
    }

    #[test]
    fn outcome_score_is_the_best_scored_move() {
        let (board, player) = endgame_board(21, 8);
        if board.is_terminal() {
            return;
        }
        let mut searcher = Searcher::new(4);
        let max = searcher
            .score_moves(&board, player)
            .into_iter()
            .map(|(_, score)| score)
            .max();

        let mut rng = StdRng::seed_from_u64(21);
        let outcome = searcher.search(&board, player, &mut rng);
        assert_eq!(outcome.map(|o| o.score), max);
        assert!(searcher.nodes() > 0);
    }

    #[test]
    fn equal_best_moves_are_tie_broken_randomly() {
        // The four opening moves are symmetric and score the same.
        let board = Board::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut searcher = Searcher::new(1);

        let chosen: HashSet<Position> = (0..40)
            .filter_map(|_| searcher.search(&board, Player::Black, &mut rng))
            .map(|outcome| outcome.position)
            .collect();

        assert!(chosen.len() > 1);
        assert!(chosen.iter().all(|&mv| board.is_legal(mv, Player::Black)));
    }

    #[test]
    fn same_seed_gives_same_move() {
        let board = Board::new().apply_move(Position { row: 2, col: 3 }, Player::Black).unwrap();

        let first = best_move(&board, Player::White, Difficulty::Medium, &mut StdRng::seed_from_u64(9));
        let second = best_move(&board, Player::White, Difficulty::Medium, &mut StdRng::seed_from_u64(9));
        assert_eq!(first, second);
    }

    #[test]
    fn every_tier_returns_a_legal_move() {
        let board = Board::new();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mv = best_move(&board, Player::Black, Difficulty::Easy, &mut rng).unwrap();
            assert!(board.is_legal(mv, Player::Black));
        }

        let mut rng = StdRng::seed_from_u64(4);
        let mv = best_move(&board, Player::Black, Difficulty::Hard, &mut rng).unwrap();
        assert!(board.is_legal(mv, Player::Black));
    }

    #[test]
    fn random_path_fires_at_the_tier_rate() {
        // White to move with six candidates; only (7,7) gains discs.
        let board: Board = "
            ..XXXX.X
            X.OOX.X.
            XOOXXOOO
            XOXXXOOX
            XOOOXOO.
            XOXOOX.O
            XOOOXXX.
            XOOXXXX."
            .parse()
            .unwrap();
        let player = Player::White;
        let dominant = Position { row: 7, col: 7 };
        assert_eq!(board.legal_moves(player).len(), 6);

        let maximal = |depth: u8| -> HashSet<Position> {
            let scored = Searcher::new(depth).score_moves(&board, player);
            let best = scored.iter().map(|&(_, score)| score).max().unwrap();
            scored
                .into_iter()
                .filter(|&(_, score)| score == best)
                .map(|(mv, _)| mv)
                .collect()
        };
        assert_eq!(maximal(1), HashSet::from([dominant]));

        let trials = 200;
        let mut rng = StdRng::seed_from_u64(17);
        let easy_deviations = (0..trials)
            .filter(|_| best_move(&board, player, Difficulty::Easy, &mut rng) != Some(dominant))
            .count();
        // Expected 0.3 * 5/6 of the trials, about 50.
        assert!((25..=80).contains(&easy_deviations), "{easy_deviations}");

        let hard_best = maximal(Difficulty::Hard.settings().depth);
        for _ in 0..20 {
            let mv = best_move(&board, player, Difficulty::Hard, &mut rng).unwrap();
            assert!(hard_best.contains(&mv), "{mv}");
        }
    }

    #[test]
    fn pass_ply_consumes_depth() {
        // White takes one of the two holes, black must pass, white takes the other.
        let black = (1u64 << 1) | (1u64 << 62);
        let white = u64::MAX ^ 1 ^ black ^ (1u64 << 63);
        let board = Board::from_bitboards(black, white).unwrap();
        assert!(!board.has_legal_move(Player::Black));

        let mut rng = StdRng::seed_from_u64(5);

        // Root move plus the pass: the leaf is the 62-1 board one move before the end.
        let shallow = Searcher::new(2).search(&board, Player::White, &mut rng).unwrap();
        assert_eq!(shallow.score, 61 * crate::ai::eval::ENDGAME_DISC_WEIGHT);

        let deep = Searcher::new(3).search(&board, Player::White, &mut rng).unwrap();
        assert_eq!(deep.score, TERMINAL_SCORE);
        assert!(board.is_legal(deep.position, Player::White));
    }
}
