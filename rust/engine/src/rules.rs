use crate::errors::GameError;
use crate::state::{UserGameState, DIE_MAX, DIE_MIN};
use serde::{Deserialize, Serialize};

/// Outcome of applying a roll to a game record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollOutcome {
    /// The roll scored; the turn continues with the given unbanked total.
    Scored { turn_score: u32 },
    /// A 1 was rolled; the turn's unbanked points are forfeited.
    Busted,
}

/// Outcome of holding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldOutcome {
    /// Points were banked; the game continues.
    Banked { total_score: u32 },
    /// Banking the points reached the win threshold; the game is over.
    Won { total_score: u32 },
}

/// Immutable payload describing a finished game, handed to the external
/// scoreboard on completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionReport {
    pub total_score: u32,
    pub round: u32,
    pub turn: u32,
}

/// Applies a single die roll to a game record.
///
/// Rolling a 1 busts the turn: the unbanked `turn_score` is forfeited and
/// the turn counter advances. Any other value accumulates into `turn_score`.
/// Every roll advances `round` and records itself as `last_roll`. No win
/// check happens here; a roll can only grow unbanked points, and a bust can
/// never cross the threshold.
///
/// # Errors
///
/// Returns [`GameError`] without touching the record in these cases:
/// - [`GameError::GameOver`] - the game is already over; only reset is allowed
/// - [`GameError::InvalidDieValue`] - `die_value` is outside 1-6
///
/// # Examples
///
/// ```
/// use pigdice_engine::rules::{apply_roll, RollOutcome};
/// use pigdice_engine::state::UserGameState;
///
/// let mut state = UserGameState::default();
/// let outcome = apply_roll(&mut state, 5).expect("valid roll");
/// assert_eq!(outcome, RollOutcome::Scored { turn_score: 5 });
/// assert_eq!(state.round, 1);
///
/// // Rolling a 1 forfeits the turn's points
/// let outcome = apply_roll(&mut state, 1).expect("valid roll");
/// assert_eq!(outcome, RollOutcome::Busted);
/// assert_eq!(state.turn_score, 0);
/// assert_eq!(state.turn, 1);
/// ```
pub fn apply_roll(state: &mut UserGameState, die_value: u8) -> Result<RollOutcome, GameError> {
    if state.game_over {
        return Err(GameError::GameOver);
    }
    if !(DIE_MIN..=DIE_MAX).contains(&die_value) {
        return Err(GameError::InvalidDieValue { value: die_value });
    }

    state.round += 1;
    state.last_roll = die_value;

    if die_value == 1 {
        state.turn_score = 0;
        state.turn += 1;
        Ok(RollOutcome::Busted)
    } else {
        state.turn_score = state.turn_score.saturating_add(u32::from(die_value));
        Ok(RollOutcome::Scored {
            turn_score: state.turn_score,
        })
    }
}

/// Ends the current turn voluntarily, banking its accumulated points.
///
/// The unbanked `turn_score` moves into `total_score`, `last_roll` clears to
/// 0, and the turn counter advances. The win check happens here and only
/// here, since holding is the only way `total_score` changes: reaching or
/// exceeding `win_threshold` marks the game over.
///
/// The threshold is owned by the external scoreboard and must be passed in;
/// this crate never hard-codes it.
///
/// # Errors
///
/// Returns [`GameError::GameOver`] without touching the record if the game
/// is already over.
///
/// # Examples
///
/// ```
/// use pigdice_engine::rules::{apply_hold, apply_roll, HoldOutcome};
/// use pigdice_engine::state::UserGameState;
///
/// let mut state = UserGameState::default();
/// apply_roll(&mut state, 6).expect("roll");
/// let outcome = apply_hold(&mut state, 100).expect("hold");
/// assert_eq!(outcome, HoldOutcome::Banked { total_score: 6 });
/// assert_eq!(state.turn_score, 0);
/// assert_eq!(state.last_roll, 0);
/// ```
pub fn apply_hold(state: &mut UserGameState, win_threshold: u32) -> Result<HoldOutcome, GameError> {
    if state.game_over {
        return Err(GameError::GameOver);
    }

    state.total_score = state.total_score.saturating_add(state.turn_score);
    state.turn_score = 0;
    state.last_roll = 0;
    state.turn += 1;

    if state.total_score >= win_threshold {
        state.game_over = true;
        Ok(HoldOutcome::Won {
            total_score: state.total_score,
        })
    } else {
        Ok(HoldOutcome::Banked {
            total_score: state.total_score,
        })
    }
}

/// Produces the completion payload for a finished game.
///
/// Does not mutate the record; completion itself (forwarding the report and
/// counting the game) is the registry's job.
///
/// # Errors
///
/// Returns [`GameError::GameOver`] if the game is not actually over yet.
pub fn completion_report(state: &UserGameState) -> Result<CompletionReport, GameError> {
    if !state.game_over {
        return Err(GameError::GameOver);
    }
    Ok(CompletionReport {
        total_score: state.total_score,
        round: state.round,
        turn: state.turn,
    })
}
