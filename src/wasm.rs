//! JavaScript bindings.
//!
//! Boards cross the boundary as 64 row-major cell codes (0 empty, 1 black,
//! 2 white); structured results are serialised with `serde-wasm-bindgen`.

use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;
use web_time::{SystemTime, UNIX_EPOCH};

use crate::ai::{self, Difficulty};
use crate::board::Board;
use crate::error::EngineError;
use crate::game::GameInstance;
use crate::types::{Player, Position};

impl From<EngineError> for JsValue {
    fn from(err: EngineError) -> Self {
        JsError::new(&err.to_string()).into()
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

fn seed_or_clock(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default()
    })
}

fn parse_player(code: u8) -> Result<Player, JsValue> {
    Player::from_code(code).ok_or_else(|| JsError::new(&format!("invalid player code {code}")).into())
}

/// Installs console logging and the panic hook. Safe to call more than once.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    }
}

#[wasm_bindgen]
pub struct WasmGame {
    inner: GameInstance,
}

#[wasm_bindgen]
impl WasmGame {
    /// `seed` makes the computer's choices reproducible; omitted, the clock is used.
    #[wasm_bindgen(constructor)]
    pub fn new(difficulty: &str, seed: Option<u64>) -> Result<WasmGame, JsValue> {
        let difficulty: Difficulty = difficulty.parse()?;
        Ok(Self {
            inner: GameInstance::with_seed(difficulty, seed_or_clock(seed)),
        })
    }

    pub fn place(&mut self, row: u8, col: u8) -> Result<JsValue, JsValue> {
        self.inner.place(row, col)?;
        self.state()
    }

    #[wasm_bindgen(js_name = aiMove)]
    pub fn ai_move(&mut self) -> Result<JsValue, JsValue> {
        self.inner.do_ai_move()?;
        self.state()
    }

    #[wasm_bindgen(js_name = isAiTurn)]
    pub fn is_ai_turn(&self) -> bool {
        self.inner.is_ai_turn()
    }

    #[wasm_bindgen(js_name = setDifficulty)]
    pub fn set_difficulty(&mut self, difficulty: &str) -> Result<(), JsValue> {
        self.inner.set_difficulty(difficulty.parse()?);
        Ok(())
    }

    /// `false` turns off the computer opponent for a local two-player game.
    #[wasm_bindgen(js_name = setVsComputer)]
    pub fn set_vs_computer(&mut self, vs_computer: bool) {
        self.inner.set_vs_computer(vs_computer);
    }

    #[wasm_bindgen(js_name = isVsComputer)]
    pub fn is_vs_computer(&self) -> bool {
        self.inner.vs_computer()
    }

    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        self.inner.reset();
        self.state()
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.to_game_state())
    }

    pub fn result(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.to_game_result())
    }

    #[wasm_bindgen(js_name = moveEvaluations)]
    pub fn move_evaluations(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.move_evaluations())
    }
}

/// Best move for `player` on a 64-cell board, `undefined` without legal moves.
#[wasm_bindgen(js_name = bestMove)]
pub fn best_move(
    cells: &[u8],
    player: u8,
    difficulty: &str,
    seed: Option<u64>,
) -> Result<JsValue, JsValue> {
    let board = Board::from_codes(cells)?;
    let player = parse_player(player)?;
    let difficulty: Difficulty = difficulty.parse()?;
    let mut rng = StdRng::seed_from_u64(seed_or_clock(seed));

    let mv: Option<Position> = ai::best_move(&board, player, difficulty, &mut rng);
    to_js(&mv)
}

#[wasm_bindgen(js_name = evaluateBoard)]
pub fn evaluate_board(cells: &[u8], player: u8) -> Result<i32, JsValue> {
    let board = Board::from_codes(cells)?;
    Ok(ai::evaluate(&board, parse_player(player)?))
}

#[wasm_bindgen(js_name = legalMoves)]
pub fn legal_moves(cells: &[u8], player: u8) -> Result<JsValue, JsValue> {
    let board = Board::from_codes(cells)?;
    to_js(&board.legal_moves(parse_player(player)?))
}

/// Applies a legal move and returns the new cell codes.
#[wasm_bindgen(js_name = applyMove)]
pub fn apply_move(cells: &[u8], row: u8, col: u8, player: u8) -> Result<Vec<u8>, JsValue> {
    let board = Board::from_codes(cells)?;
    let next = board.apply_move(Position::new(row, col)?, parse_player(player)?)?;
    Ok(next.to_array().to_vec())
}

#[wasm_bindgen(js_name = initialBoard)]
pub fn initial_board() -> Vec<u8> {
    Board::new().to_array().to_vec()
}
