use wasm_bindgen::prelude::*;

pub mod ai;
pub mod board;
pub mod error;
pub mod game;
pub mod types;
pub mod wasm;

pub use board::{Board, initial_board};
pub use error::{EngineError, EngineResult};
pub use types::{Cell, Move, Player, Position};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
