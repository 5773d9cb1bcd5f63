use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// A side in the game. Black moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    /// Wire code: 1 = black, 2 = white.
    pub fn code(self) -> u8 {
        match self {
            Self::Black => 1,
            Self::White => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Black),
            2 => Some(Self::White),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Black => f.write_str("black"),
            Self::White => f.write_str("white"),
        }
    }
}

/// Content of one board square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
}

impl Cell {
    /// Wire code: 0 = empty, 1 = black, 2 = white.
    pub fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Black => 1,
            Self::White => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Empty),
            1 => Some(Self::Black),
            2 => Some(Self::White),
            _ => None,
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::Black => Self::Black,
            Player::White => Self::White,
        }
    }
}

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// Checked constructor.
    pub fn new(row: u8, col: u8) -> EngineResult<Self> {
        Self { row, col }.checked()
    }

    /// True when both coordinates are in `0..8`. The fields are public, so a
    /// literal `Position` can lie outside the board.
    pub fn is_on_board(self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    pub fn checked(self) -> EngineResult<Self> {
        if self.is_on_board() {
            Ok(self)
        } else {
            Err(EngineError::OutOfRange {
                row: self.row,
                col: self.col,
            })
        }
    }

    /// Row-major square index in `0..64`.
    pub fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    pub(crate) fn from_index(idx: usize) -> Self {
        debug_assert!(idx < NUM_SQUARES);
        Self {
            row: (idx / BOARD_SIZE) as u8,
            col: (idx % BOARD_SIZE) as u8,
        }
    }
}

/// Algebraic notation: column letter then row number, `(0, 0)` is `A1`.
/// Off-board coordinates fall back to `(row,col)`.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_on_board() {
            return write!(f, "({},{})", self.row, self.col);
        }
        let file = char::from(b'A' + self.col);
        write!(f, "{file}{}", u16::from(self.row) + 1)
    }
}

impl FromStr for Position {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();
        let [file, rank] = bytes else {
            return Err(EngineError::InvalidNotation(s.to_string()));
        };

        let col = file.to_ascii_uppercase().wrapping_sub(b'A');
        let row = rank.wrapping_sub(b'1');
        Self::new(row, col).map_err(|_| EngineError::InvalidNotation(s.to_string()))
    }
}

/// A move together with the discs it turned over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Move {
    pub position: Position,
    pub player: Player,
    pub flipped: Vec<Position>,
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    pub board: Vec<u8>,
    /// 0 once the game is over.
    pub current_player: u8,
    pub black_count: u8,
    pub white_count: u8,
    pub is_game_over: bool,
    /// Contract:
    /// - `true` when the side that just moved moves again because its opponent had to pass.
    /// - `false` otherwise.
    pub is_pass: bool,
    /// Contract:
    /// - After a move: flipped squares (0..=63) of that move.
    /// - Before the first move: empty.
    pub flipped: Vec<u8>,
    pub legal_moves: Vec<Position>,
    /// 0 while the game is running or on a draw.
    pub winner: u8,
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub winner: u8,
    pub black_count: u8,
    pub white_count: u8,
}

/// Preview score of one candidate move, used to annotate cells in a UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveEvaluation {
    pub position: Position,
    pub score: i32,
    /// Min-max normalised over the candidates, in `-100..=100`.
    pub normalized_score: i32,
}
