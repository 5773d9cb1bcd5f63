pub mod difficulty;
pub mod eval;
pub mod preview;
pub mod search;
pub mod weights;

pub use difficulty::{Difficulty, DifficultySettings};
pub use eval::{TERMINAL_SCORE, evaluate};
pub use preview::move_evaluations;
pub use search::{SearchOutcome, Searcher, best_move};
