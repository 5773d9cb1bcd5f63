//! Static evaluation of a board from one player's point of view.
//!
//! Non-terminal scores are antisymmetric: `evaluate(b, p) == -evaluate(b, p.opponent())`.
//! Every heuristic is normalised to `-100..=100` with integer division, which
//! truncates toward zero and therefore keeps the antisymmetry exact.

use once_cell::sync::Lazy;

use crate::ai::weights::PhaseWeights;
use crate::board::{Board, DIRECTIONS, bit, in_bounds, pos_to_row_col};
use crate::types::{NUM_SQUARES, Player};

/// Score of a decided game for the winner. Heuristic scores stay far below it.
pub const TERMINAL_SCORE: i32 = 1_000_000;
/// At or below this many empty squares only the disc count matters.
pub const ENDGAME_EMPTIES: u8 = 10;
pub const ENDGAME_DISC_WEIGHT: i32 = 30;
const WEIGHT_SCALE: i32 = 10;

#[rustfmt::skip]
const POSITION_WEIGHTS: [i32; NUM_SQUARES] = [
    100, -20,  10,   5,   5,  10, -20, 100,
    -20, -50,  -2,  -2,  -2,  -2, -50, -20,
     10,  -2,  -1,  -1,  -1,  -1,  -2,  10,
      5,  -2,  -1,  -1,  -1,  -1,  -2,   5,
      5,  -2,  -1,  -1,  -1,  -1,  -2,   5,
     10,  -2,  -1,  -1,  -1,  -1,  -2,  10,
    -20, -50,  -2,  -2,  -2,  -2, -50, -20,
    100, -20,  10,   5,   5,  10, -20, 100,
];

struct CornerRegion {
    corner: usize,
    x_square: usize,
    c_squares: [usize; 2],
}

const CORNER_REGIONS: [CornerRegion; 4] = [
    CornerRegion { corner: 0, x_square: 9, c_squares: [1, 8] },
    CornerRegion { corner: 7, x_square: 14, c_squares: [6, 15] },
    CornerRegion { corner: 56, x_square: 49, c_squares: [57, 48] },
    CornerRegion { corner: 63, x_square: 54, c_squares: [62, 55] },
];

const CORNER_MASK: u64 = (1 << 0) | (1 << 7) | (1 << 56) | (1 << 63);
const X_SQUARE_RISK: i32 = 2;
const C_SQUARE_RISK: i32 = 1;
/// Largest possible risk for one side: four corners, each with X and two C squares.
const MAX_CORNER_RISK: i32 = 4 * (X_SQUARE_RISK + 2 * C_SQUARE_RISK);

/// Line axes; each pairs with its opposite direction.
const AXES: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// 8-neighbourhood of every square.
static NEIGHBOURS: Lazy<[u64; NUM_SQUARES]> = Lazy::new(|| {
    let mut masks = [0u64; NUM_SQUARES];
    for (pos, mask) in masks.iter_mut().enumerate() {
        let (row, col) = pos_to_row_col(pos);
        for (dr, dc) in DIRECTIONS {
            let (r, c) = (row + dr, col + dc);
            if in_bounds(r, c) {
                *mask |= bit((r * 8 + c) as usize);
            }
        }
    }
    masks
});

/// Normalised heuristic values from the evaluated player's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Features {
    pub parity: i32,
    pub mobility: i32,
    pub corners: i32,
    pub corner_adjacency: i32,
    pub stability: i32,
    pub frontier: i32,
    pub positional: i32,
}

impl Features {
    fn compute(board: &Board, player: Player, my_moves: u64, opp_moves: u64) -> Self {
        let me = board.bitboard(player);
        let opp = board.bitboard(player.opponent());
        let empty = board.empty_mask();

        let (my_risk, opp_risk) = corner_risk(me, opp, empty);
        let stable = stable_discs(me, opp);

        Self {
            parity: ratio(popcount(me), popcount(opp)),
            mobility: ratio(popcount(my_moves), popcount(opp_moves)),
            corners: 25 * (popcount(me & CORNER_MASK) - popcount(opp & CORNER_MASK)),
            corner_adjacency: (opp_risk - my_risk) * 100 / MAX_CORNER_RISK,
            stability: ratio(popcount(stable & me), popcount(stable & opp)),
            // Fewer exposed discs is better, hence the swapped arguments.
            frontier: ratio(frontier_count(opp, empty), frontier_count(me, empty)),
            positional: positional(me, opp),
        }
    }

    fn weighted(&self, w: &PhaseWeights) -> i32 {
        let sum = w.parity * self.parity
            + w.mobility * self.mobility
            + w.corners * self.corners
            + w.corner_adjacency * self.corner_adjacency
            + w.stability * self.stability
            + w.frontier * self.frontier
            + w.positional * self.positional;
        sum / WEIGHT_SCALE
    }
}

/// How a score was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// Neither side can move; the sentinel of the outcome.
    Terminal { score: i32 },
    /// Few empties left; pure disc differential.
    Endgame { disc_diff: i32, score: i32 },
    Heuristic {
        features: Features,
        weights: PhaseWeights,
        score: i32,
    },
}

impl Evaluation {
    pub fn score(&self) -> i32 {
        match *self {
            Self::Terminal { score }
            | Self::Endgame { score, .. }
            | Self::Heuristic { score, .. } => score,
        }
    }
}

/// Scores `board` for `player`; larger is better for `player`.
pub fn evaluate(board: &Board, player: Player) -> i32 {
    evaluate_detailed(board, player).score()
}

pub fn evaluate_detailed(board: &Board, player: Player) -> Evaluation {
    let my_moves = board.legal_mask(player);
    let opp_moves = board.legal_mask(player.opponent());

    if my_moves == 0 && opp_moves == 0 {
        let score = match board.winner() {
            Some(winner) if winner == player => TERMINAL_SCORE,
            Some(_) => -TERMINAL_SCORE,
            None => 0,
        };
        return Evaluation::Terminal { score };
    }

    if board.empty_count() <= ENDGAME_EMPTIES {
        let disc_diff =
            board.count_of(player) as i32 - board.count_of(player.opponent()) as i32;
        return Evaluation::Endgame {
            disc_diff,
            score: disc_diff * ENDGAME_DISC_WEIGHT,
        };
    }

    let features = Features::compute(board, player, my_moves, opp_moves);
    let weights = PhaseWeights::at(board.disc_count());
    Evaluation::Heuristic {
        features,
        weights,
        score: features.weighted(&weights),
    }
}

fn popcount(mask: u64) -> i32 {
    mask.count_ones() as i32
}

fn ratio(mine: i32, theirs: i32) -> i32 {
    let total = mine + theirs;
    if total == 0 {
        0
    } else {
        100 * (mine - theirs) / total
    }
}

/// X/C-square risk of both sides, counted only next to empty corners.
fn corner_risk(me: u64, opp: u64, empty: u64) -> (i32, i32) {
    let risk = |discs: u64, region: &CornerRegion| {
        let x = if discs & bit(region.x_square) != 0 {
            X_SQUARE_RISK
        } else {
            0
        };
        let c: i32 = region
            .c_squares
            .iter()
            .filter(|&&sq| discs & bit(sq) != 0)
            .map(|_| C_SQUARE_RISK)
            .sum();
        x + c
    };

    CORNER_REGIONS
        .iter()
        .filter(|region| empty & bit(region.corner) != 0)
        .fold((0, 0), |(mine, theirs), region| {
            (mine + risk(me, region), theirs + risk(opp, region))
        })
}

/// Discs that can no longer be flipped, grown from occupied corners.
///
/// A disc is stable once every axis through it has, on at least one side,
/// either the board edge or a stable disc of the same colour.
fn stable_discs(me: u64, opp: u64) -> u64 {
    let mut stable = 0u64;

    loop {
        let mut changed = false;
        for pos in 0..NUM_SQUARES {
            let square = bit(pos);
            if stable & square != 0 {
                continue;
            }
            let own = if me & square != 0 {
                me
            } else if opp & square != 0 {
                opp
            } else {
                continue;
            };

            let (row, col) = pos_to_row_col(pos);
            let anchored = |r: i32, c: i32| {
                !in_bounds(r, c) || (stable & own & bit((r * 8 + c) as usize)) != 0
            };
            if AXES
                .iter()
                .all(|&(dr, dc)| anchored(row + dr, col + dc) || anchored(row - dr, col - dc))
            {
                stable |= square;
                changed = true;
            }
        }
        if !changed {
            return stable;
        }
    }
}

fn frontier_count(discs: u64, empty: u64) -> i32 {
    (0..NUM_SQUARES)
        .filter(|&pos| discs & bit(pos) != 0 && NEIGHBOURS[pos] & empty != 0)
        .count() as i32
}

fn positional(me: u64, opp: u64) -> i32 {
    let mut diff = 0;
    let mut scale = 0;
    for (pos, &weight) in POSITION_WEIGHTS.iter().enumerate() {
        let square = bit(pos);
        if me & square != 0 {
            diff += weight;
            scale += weight.abs();
        } else if opp & square != 0 {
            diff -= weight;
            scale += weight.abs();
        }
    }
    if scale == 0 { 0 } else { 100 * diff / scale }
}
