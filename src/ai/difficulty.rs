use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Strength tier selected by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Search parameters for a tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultySettings {
    /// Plies searched, the root move included.
    pub depth: u8,
    /// Probability of playing a uniformly random legal move instead of searching.
    pub randomness: f64,
}

const EASY: DifficultySettings = DifficultySettings {
    depth: 1,
    randomness: 0.3,
};
const MEDIUM: DifficultySettings = DifficultySettings {
    depth: 3,
    randomness: 0.1,
};
const HARD: DifficultySettings = DifficultySettings {
    depth: 5,
    randomness: 0.0,
};

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub fn settings(self) -> DifficultySettings {
        match self {
            Self::Easy => EASY,
            Self::Medium => MEDIUM,
            Self::Hard => HARD,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        })
    }
}

impl FromStr for Difficulty {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(EngineError::UnknownDifficulty(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_get_stronger_and_less_random() {
        let easy = Difficulty::Easy.settings();
        let medium = Difficulty::Medium.settings();
        let hard = Difficulty::Hard.settings();

        assert!(easy.depth < medium.depth && medium.depth < hard.depth);
        assert!(easy.randomness > medium.randomness);
        assert_eq!(hard.randomness, 0.0);
    }

    #[test]
    fn parse_is_case_insensitive_and_rejects_unknown_names() {
        assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" easy ".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!(
            "expert".parse::<Difficulty>(),
            Err(EngineError::UnknownDifficulty("expert".to_string()))
        );
    }

    #[test]
    fn display_round_trips() {
        for tier in Difficulty::ALL {
            assert_eq!(tier.to_string().parse::<Difficulty>(), Ok(tier));
        }
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }
}
