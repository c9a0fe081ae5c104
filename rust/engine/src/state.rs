use serde::{Deserialize, Serialize};

/// Smallest value a die can show.
pub const DIE_MIN: u8 = 1;
/// Largest value a die can show.
pub const DIE_MAX: u8 = 6;

/// Per-player game record for a single game of Pig.
/// The zero-valued default is both "never played" and "freshly reset";
/// there is no separate not-started state.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct UserGameState {
    /// Most recent die value; 0 means no roll yet this turn (or just held)
    pub last_roll: u8,
    /// Points accumulated in the current turn, not yet banked
    pub turn_score: u32,
    /// Banked score across the whole game
    pub total_score: u32,
    /// Count of rolls since the last reset
    pub round: u32,
    /// Count of turn-ending events (bust or hold) since the last reset
    pub turn: u32,
    /// True once total_score has reached the win threshold
    pub game_over: bool,
}

impl UserGameState {
    pub fn new() -> Self {
        Self::default()
    }
}
