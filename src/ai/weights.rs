//! Phase-dependent heuristic weights.
//!
//! Weights are linearly interpolated between an opening table and an endgame
//! table by the number of discs on the board. Tuning happens here only; the
//! heuristics in `eval` never look at the phase.

const INITIAL_DISCS: u8 = 4;
const PHASE_SPAN: i32 = 56;

/// Weight of each normalised heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseWeights {
    pub parity: i32,
    pub mobility: i32,
    pub corners: i32,
    pub corner_adjacency: i32,
    pub stability: i32,
    pub frontier: i32,
    pub positional: i32,
}

pub const OPENING: PhaseWeights = PhaseWeights {
    parity: 5,
    mobility: 40,
    corners: 100,
    corner_adjacency: 50,
    stability: 10,
    frontier: 20,
    positional: 20,
};

pub const ENDGAME: PhaseWeights = PhaseWeights {
    parity: 40,
    mobility: 10,
    corners: 100,
    corner_adjacency: 50,
    stability: 40,
    frontier: 5,
    positional: 10,
};

impl PhaseWeights {
    /// Blend for a board holding `discs` discs.
    pub fn at(discs: u8) -> Self {
        let progress = (discs.saturating_sub(INITIAL_DISCS) as i32).min(PHASE_SPAN);
        let lerp = |open: i32, end: i32| (open * (PHASE_SPAN - progress) + end * progress) / PHASE_SPAN;

        Self {
            parity: lerp(OPENING.parity, ENDGAME.parity),
            mobility: lerp(OPENING.mobility, ENDGAME.mobility),
            corners: lerp(OPENING.corners, ENDGAME.corners),
            corner_adjacency: lerp(OPENING.corner_adjacency, ENDGAME.corner_adjacency),
            stability: lerp(OPENING.stability, ENDGAME.stability),
            frontier: lerp(OPENING.frontier, ENDGAME.frontier),
            positional: lerp(OPENING.positional, ENDGAME.positional),
        }
    }
}
