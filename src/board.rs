use std::fmt;
use std::str::FromStr;

use crate::error::{EngineError, EngineResult};
use crate::types::{BOARD_SIZE, Cell, NUM_SQUARES, Player, Position};

pub(crate) const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Reversi board state represented by two bitboards.
///
/// Boards are values: every transition returns a new board and the
/// receiver is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    black: u64,
    white: u64,
}

/// The fixed starting layout.
pub fn initial_board() -> Board {
    Board::new()
}

impl Board {
    /// Creates the initial board:
    /// d4=white, e4=black, d5=black, e5=white.
    pub fn new() -> Self {
        Self {
            black: bit(28) | bit(35),
            white: bit(27) | bit(36),
        }
    }

    /// Builds a board from raw masks. Overlapping masks are rejected.
    pub fn from_bitboards(black: u64, white: u64) -> EngineResult<Self> {
        let overlap = black & white;
        if overlap != 0 {
            return Err(EngineError::InvalidBoard(format!(
                "square {} is occupied by both players",
                overlap.trailing_zeros()
            )));
        }
        Ok(Self { black, white })
    }

    /// Builds a board from 64 row-major cells.
    pub fn from_cells(cells: &[Cell]) -> EngineResult<Self> {
        if cells.len() != NUM_SQUARES {
            return Err(EngineError::InvalidBoard(format!(
                "expected {NUM_SQUARES} cells, got {}",
                cells.len()
            )));
        }

        let mut black = 0u64;
        let mut white = 0u64;
        for (pos, cell) in cells.iter().enumerate() {
            match cell {
                Cell::Black => black |= bit(pos),
                Cell::White => white |= bit(pos),
                Cell::Empty => {}
            }
        }
        Ok(Self { black, white })
    }

    /// Builds a board from `[u8; 64]`-style codes where 0=empty, 1=black, 2=white.
    pub fn from_codes(codes: &[u8]) -> EngineResult<Self> {
        let cells = codes
            .iter()
            .enumerate()
            .map(|(pos, &code)| {
                Cell::from_code(code).ok_or_else(|| {
                    EngineError::InvalidBoard(format!("invalid cell code {code} at square {pos}"))
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;
        Self::from_cells(&cells)
    }

    pub fn bitboard(&self, player: Player) -> u64 {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }

    pub fn empty_mask(&self) -> u64 {
        !(self.black | self.white)
    }

    /// Off-board positions read as empty.
    pub fn cell(&self, pos: Position) -> Cell {
        if !pos.is_on_board() {
            return Cell::Empty;
        }
        let square = bit(pos.index());
        if (self.black & square) != 0 {
            Cell::Black
        } else if (self.white & square) != 0 {
            Cell::White
        } else {
            Cell::Empty
        }
    }

    /// Returns legal move mask for the given side.
    pub fn legal_mask(&self, player: Player) -> u64 {
        let (me, opp) = self.sides(player);
        let occupied = me | opp;
        let mut legal = 0u64;

        for pos in 0..NUM_SQUARES {
            let move_bit = bit(pos);
            if (occupied & move_bit) != 0 {
                continue;
            }
            if Self::collect_flips(pos, me, opp) != 0 {
                legal |= move_bit;
            }
        }

        legal
    }

    /// Legal moves in row-major order.
    pub fn legal_moves(&self, player: Player) -> Vec<Position> {
        mask_to_positions(self.legal_mask(player))
    }

    pub fn has_legal_move(&self, player: Player) -> bool {
        self.legal_mask(player) != 0
    }

    /// Mask of discs that `player` would turn over by playing `pos`.
    /// Zero when the move is illegal or `pos` is off the board.
    pub fn flip_mask(&self, pos: Position, player: Player) -> u64 {
        if !pos.is_on_board() {
            return 0;
        }
        let (me, opp) = self.sides(player);
        Self::collect_flips(pos.index(), me, opp)
    }

    /// Discs turned over by the move, empty iff the move is illegal.
    pub fn flipped_by(&self, pos: Position, player: Player) -> Vec<Position> {
        mask_to_positions(self.flip_mask(pos, player))
    }

    pub fn is_legal(&self, pos: Position, player: Player) -> bool {
        self.flip_mask(pos, player) != 0
    }

    /// Returns the board after `player` plays `pos`.
    ///
    /// Caller contract: the move must be legal. An illegal move is reported
    /// as [`EngineError::IllegalMove`] and never treated as a no-op; an
    /// off-board position as [`EngineError::OutOfRange`].
    pub fn apply_move(&self, pos: Position, player: Player) -> EngineResult<Self> {
        let pos = pos.checked()?;
        let flips = self.flip_mask(pos, player);
        if flips == 0 {
            return Err(EngineError::IllegalMove {
                row: pos.row,
                col: pos.col,
                player,
            });
        }

        Ok(self.with_flips(pos, player, flips))
    }

    /// Applies a move taken from [`Board::legal_moves`] without re-validating it.
    pub(crate) fn play_legal(&self, pos: Position, player: Player) -> Self {
        let flips = self.flip_mask(pos, player);
        debug_assert!(flips != 0, "play_legal() called with an illegal move");
        self.with_flips(pos, player, flips)
    }

    /// True iff neither side can move.
    pub fn is_terminal(&self) -> bool {
        !self.has_legal_move(Player::Black) && !self.has_legal_move(Player::White)
    }

    /// The side with strictly more discs, if any.
    pub fn winner(&self) -> Option<Player> {
        let (black_count, white_count) = self.count();
        match black_count.cmp(&white_count) {
            std::cmp::Ordering::Greater => Some(Player::Black),
            std::cmp::Ordering::Less => Some(Player::White),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Returns `(black_count, white_count)`.
    pub fn count(&self) -> (u8, u8) {
        (self.black.count_ones() as u8, self.white.count_ones() as u8)
    }

    pub fn count_of(&self, player: Player) -> u8 {
        self.bitboard(player).count_ones() as u8
    }

    /// Returns the number of empty squares.
    pub fn empty_count(&self) -> u8 {
        let (black_count, white_count) = self.count();
        NUM_SQUARES as u8 - black_count - white_count
    }

    pub fn disc_count(&self) -> u8 {
        (self.black | self.white).count_ones() as u8
    }

    /// Converts board to `[u8; 64]` where 0=empty, 1=black, 2=white.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut board = [0u8; NUM_SQUARES];
        for (pos, cell) in board.iter_mut().enumerate() {
            *cell = self.cell(Position::from_index(pos)).code();
        }
        board
    }

    fn with_flips(&self, pos: Position, player: Player, flips: u64) -> Self {
        let (me, opp) = self.sides(player);
        let next_me = me | bit(pos.index()) | flips;
        let next_opp = opp & !flips;

        match player {
            Player::Black => Self {
                black: next_me,
                white: next_opp,
            },
            Player::White => Self {
                black: next_opp,
                white: next_me,
            },
        }
    }

    fn sides(&self, player: Player) -> (u64, u64) {
        match player {
            Player::Black => (self.black, self.white),
            Player::White => (self.white, self.black),
        }
    }

    fn collect_flips(pos: usize, me: u64, opp: u64) -> u64 {
        if pos >= NUM_SQUARES {
            return 0;
        }

        let move_bit = bit(pos);
        if ((me | opp) & move_bit) != 0 {
            return 0;
        }

        let (row, col) = pos_to_row_col(pos);
        let mut flips = 0u64;

        for (dr, dc) in DIRECTIONS {
            let mut r = row + dr;
            let mut c = col + dc;
            let mut line = 0u64;

            while in_bounds(r, c) {
                let square = bit((r as usize) * BOARD_SIZE + c as usize);
                if (opp & square) != 0 {
                    line |= square;
                } else {
                    // A run only counts when it is closed by our own disc.
                    if (me & square) != 0 {
                        flips |= line;
                    }
                    break;
                }

                r += dr;
                c += dc;
            }
        }

        flips
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Rows top to bottom, `X` black, `O` white, `.` empty.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let ch = match self.cell(Position::from_index(row * BOARD_SIZE + col)) {
                    Cell::Empty => '.',
                    Cell::Black => 'X',
                    Cell::White => 'O',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parses 64 cells in row-major order; whitespace is ignored.
/// `X`/`B` is black, `O`/`W` is white, `.`/`-` is empty.
impl FromStr for Board {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells = s
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .map(|ch| match ch.to_ascii_uppercase() {
                'X' | 'B' => Ok(Cell::Black),
                'O' | 'W' => Ok(Cell::White),
                '.' | '-' => Ok(Cell::Empty),
                other => Err(EngineError::InvalidBoard(format!(
                    "unexpected character {other:?}"
                ))),
            })
            .collect::<EngineResult<Vec<_>>>()?;
        Self::from_cells(&cells)
    }
}

pub(crate) fn bit(pos: usize) -> u64 {
    if pos < NUM_SQUARES { 1u64 << pos } else { 0 }
}

pub(crate) fn mask_to_positions(mask: u64) -> Vec<Position> {
    let mut bits = mask;
    let mut out = Vec::with_capacity(bits.count_ones() as usize);

    while bits != 0 {
        out.push(Position::from_index(bits.trailing_zeros() as usize));
        bits &= bits - 1;
    }

    out
}

pub(crate) fn pos_to_row_col(pos: usize) -> (i32, i32) {
    ((pos / BOARD_SIZE) as i32, (pos % BOARD_SIZE) as i32)
}

pub(crate) fn in_bounds(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}
