use thiserror::Error;

use crate::types::Player;

/// Errors reported by the rule engine and the game session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The target cell is occupied or the move flips nothing.
    #[error("illegal move: {player} cannot play ({row}, {col})")]
    IllegalMove { row: u8, col: u8, player: Player },

    #[error("position ({row}, {col}) is off the board")]
    OutOfRange { row: u8, col: u8 },

    /// Rejected while constructing a board from external data.
    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("invalid notation: {0}")]
    InvalidNotation(String),

    #[error("game is already over")]
    GameOver,

    #[error("it is not {0}'s turn")]
    NotYourTurn(Player),

    #[error("{0} has no legal moves")]
    NoLegalMoves(Player),
}

pub type EngineResult<T> = Result<T, EngineError>;
