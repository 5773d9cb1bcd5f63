use crate::ai::eval::evaluate;
use crate::board::Board;
use crate::types::{MoveEvaluation, Player};

/// Scores every legal move of `player` for move-quality hints.
///
/// `score` is the evaluation of the resulting board from `player`'s view.
/// `normalized_score` maps the candidates' min..max onto -100..100. When all
/// candidates score the same (including a single candidate) it is 0, the
/// neutral midpoint, rather than the bottom of the range: equal moves are
/// shown as neither good nor bad.
pub fn move_evaluations(board: &Board, player: Player) -> Vec<MoveEvaluation> {
    let scored: Vec<_> = board
        .legal_moves(player)
        .into_iter()
        .map(|position| (position, evaluate(&board.play_legal(position, player), player)))
        .collect();

    let min = scored.iter().map(|&(_, score)| score as i64).min().unwrap_or(0);
    let max = scored.iter().map(|&(_, score)| score as i64).max().unwrap_or(0);
    let range = max - min;

    scored
        .into_iter()
        .map(|(position, score)| MoveEvaluation {
            position,
            score,
            normalized_score: if range == 0 {
                0
            } else {
                ((score as i64 - min) * 200 / range - 100) as i32
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::eval::TERMINAL_SCORE;
    use crate::types::Position;

    #[test]
    fn symmetric_opening_moves_all_normalise_to_zero() {
        let evaluations = move_evaluations(&Board::new(), Player::Black);

        assert_eq!(evaluations.len(), 4);
        assert!(evaluations.iter().all(|e| e.normalized_score == 0));
    }

    #[test]
    fn best_and_worst_candidates_span_the_full_range() {
        let board = Board::new()
            .apply_move(Position { row: 2, col: 3 }, Player::Black)
            .unwrap();
        let evaluations = move_evaluations(&board, Player::White);

        let best = evaluations.iter().max_by_key(|e| e.score).unwrap();
        let worst = evaluations.iter().min_by_key(|e| e.score).unwrap();
        if best.score != worst.score {
            assert_eq!(best.normalized_score, 100);
            assert_eq!(worst.normalized_score, -100);
        }
        assert!(
            evaluations
                .iter()
                .all(|e| (-100..=100).contains(&e.normalized_score))
        );
    }

    #[test]
    fn winning_move_is_scored_with_the_sentinel() {
        let black = 1u64 << 1;
        let white = u64::MAX ^ 1 ^ black;
        let board = Board::from_bitboards(black, white).unwrap();

        let evaluations = move_evaluations(&board, Player::White);
        assert_eq!(evaluations.len(), 1);
        assert_eq!(evaluations[0].score, TERMINAL_SCORE);
        assert_eq!(evaluations[0].normalized_score, 0);
    }

    #[test]
    fn no_moves_no_evaluations() {
        let board = Board::from_bitboards(u64::MAX, 0).unwrap();
        assert!(move_evaluations(&board, Player::White).is_empty());
    }
}
