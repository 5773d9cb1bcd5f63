use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::ai::{Difficulty, best_move, move_evaluations};
use crate::board::Board;
use crate::error::{EngineError, EngineResult};
use crate::types::{GameResult, GameState, Move, MoveEvaluation, Player, Position};

/// Against the computer the human plays black and moves first.
pub const HUMAN_PLAYER: Player = Player::Black;
pub const AI_PLAYER: Player = Player::White;

pub trait MoveSelector: Send + Sync {
    fn select_move(
        &mut self,
        board: &Board,
        player: Player,
        difficulty: Difficulty,
    ) -> Option<Position>;
}

/// Alpha-beta search with its own seeded random source.
#[derive(Debug, Clone)]
pub struct SearchSelector {
    rng: StdRng,
}

impl SearchSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl MoveSelector for SearchSelector {
    fn select_move(
        &mut self,
        board: &Board,
        player: Player,
        difficulty: Difficulty,
    ) -> Option<Position> {
        best_move(board, player, difficulty, &mut self.rng)
    }
}

/// One game, either human against computer or two humans on one device.
///
/// Owns the turn order: when the side to move has no legal move but its
/// opponent does, the turn passes automatically.
pub struct GameInstance {
    board: Board,
    current_player: Player,
    difficulty: Difficulty,
    vs_computer: bool,
    is_game_over: bool,
    is_pass: bool,
    flipped: Vec<Position>,
    history: Vec<Move>,
    selector: Box<dyn MoveSelector>,
}

impl GameInstance {
    pub fn new(difficulty: Difficulty, selector: Box<dyn MoveSelector>) -> Self {
        Self {
            board: Board::new(),
            current_player: HUMAN_PLAYER,
            difficulty,
            vs_computer: true,
            is_game_over: false,
            is_pass: false,
            flipped: Vec::new(),
            history: Vec::new(),
            selector,
        }
    }

    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self::new(difficulty, Box::new(SearchSelector::new(seed)))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    pub fn vs_computer(&self) -> bool {
        self.vs_computer
    }

    /// Switches between playing the computer and local two-player mode.
    /// The game in progress continues from the current position.
    pub fn set_vs_computer(&mut self, vs_computer: bool) {
        if self.vs_computer != vs_computer {
            info!("computer opponent {}", if vs_computer { "on" } else { "off" });
        }
        self.vs_computer = vs_computer;
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn is_pass(&self) -> bool {
        self.is_pass
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Always false in two-player mode.
    pub fn is_ai_turn(&self) -> bool {
        self.vs_computer && !self.is_game_over && self.current_player == AI_PLAYER
    }

    /// Starts over with the initial board, keeping difficulty and selector.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.current_player = HUMAN_PLAYER;
        self.is_game_over = false;
        self.is_pass = false;
        self.flipped.clear();
        self.history.clear();
    }

    /// Plays a human move at `(row, col)`.
    ///
    /// Against the computer only black may place; in two-player mode the
    /// move is made for whichever side is to move.
    pub fn place(&mut self, row: u8, col: u8) -> EngineResult<()> {
        if self.is_game_over {
            return Err(EngineError::GameOver);
        }
        if self.vs_computer && self.current_player != HUMAN_PLAYER {
            return Err(EngineError::NotYourTurn(HUMAN_PLAYER));
        }

        let pos = Position::new(row, col)?;
        self.apply_move(pos, self.current_player)
    }

    /// Lets the selector play for the computer and returns its move.
    pub fn do_ai_move(&mut self) -> EngineResult<Position> {
        if self.is_game_over {
            return Err(EngineError::GameOver);
        }
        if !self.is_ai_turn() {
            return Err(EngineError::NotYourTurn(AI_PLAYER));
        }

        let selected = self
            .selector
            .select_move(&self.board, AI_PLAYER, self.difficulty)
            .ok_or(EngineError::NoLegalMoves(AI_PLAYER))?;

        self.apply_move(selected, AI_PLAYER)?;
        Ok(selected)
    }

    pub fn legal_moves(&self) -> Vec<Position> {
        if self.is_game_over {
            return Vec::new();
        }
        self.board.legal_moves(self.current_player)
    }

    /// Move-quality hints for the side to move.
    pub fn move_evaluations(&self) -> Vec<MoveEvaluation> {
        if self.is_game_over {
            return Vec::new();
        }
        move_evaluations(&self.board, self.current_player)
    }

    pub fn winner(&self) -> Option<Player> {
        if self.is_game_over {
            self.board.winner()
        } else {
            None
        }
    }

    pub fn to_game_state(&self) -> GameState {
        let (black_count, white_count) = self.board.count();
        GameState {
            board: self.board.to_array().to_vec(),
            current_player: if self.is_game_over {
                0
            } else {
                self.current_player.code()
            },
            black_count,
            white_count,
            is_game_over: self.is_game_over,
            is_pass: self.is_pass,
            flipped: self.flipped.iter().map(|pos| pos.index() as u8).collect(),
            legal_moves: self.legal_moves(),
            winner: self.winner().map_or(0, Player::code),
        }
    }

    pub fn to_game_result(&self) -> GameResult {
        let (black_count, white_count) = self.board.count();
        GameResult {
            winner: self.board.winner().map_or(0, Player::code),
            black_count,
            white_count,
        }
    }

    fn apply_move(&mut self, pos: Position, player: Player) -> EngineResult<()> {
        let flipped = self.board.flipped_by(pos, player);
        self.board = self.board.apply_move(pos, player)?;

        self.history.push(Move {
            position: pos,
            player,
            flipped: flipped.clone(),
        });
        self.flipped = flipped;
        self.advance_turn(player);

        Ok(())
    }

    fn advance_turn(&mut self, mover: Player) {
        let next = mover.opponent();
        if self.board.has_legal_move(next) {
            self.current_player = next;
            self.is_pass = false;
        } else if self.board.has_legal_move(mover) {
            info!("{next} has no legal moves, {mover} moves again");
            self.current_player = mover;
            self.is_pass = true;
        } else {
            let (black_count, white_count) = self.board.count();
            info!("game over: black {black_count} - white {white_count}");
            self.current_player = next;
            self.is_pass = false;
            self.is_game_over = true;
        }
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, current_player: Player) {
        self.board = board;
        self.current_player = current_player;
        self.is_game_over = false;
        self.is_pass = false;
        self.flipped.clear();
    }
}
