//! # pigdice-engine: Pig Dice Game Rules Core
//!
//! The rules engine for the dice game Pig: a single player's game record
//! and the transitions over it (roll, hold, completion). Deterministic by
//! construction; the die value always comes from the caller, so every
//! sequence is reproducible.
//!
//! ## Core Modules
//!
//! - [`state`] - The per-player `UserGameState` record
//! - [`rules`] - Roll/hold/completion transitions and their outcomes
//! - [`dice`] - Die source trait and seeded ChaCha20 implementation
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use pigdice_engine::rules::{apply_hold, apply_roll, HoldOutcome};
//! use pigdice_engine::state::UserGameState;
//!
//! let mut state = UserGameState::default();
//!
//! // Roll a 6 and a 5, then bank the 11 points
//! apply_roll(&mut state, 6).expect("roll");
//! apply_roll(&mut state, 5).expect("roll");
//! let outcome = apply_hold(&mut state, 100).expect("hold");
//!
//! assert_eq!(outcome, HoldOutcome::Banked { total_score: 11 });
//! assert_eq!(state.turn, 1);
//! ```
//!
//! ## Deterministic Dice
//!
//! Seeded die sources reproduce the same sequence:
//!
//! ```rust
//! use pigdice_engine::dice::{DieSource, SeededDie};
//!
//! let mut die1 = SeededDie::new_with_seed(42);
//! let mut die2 = SeededDie::new_with_seed(42);
//! assert_eq!(die1.roll(), die2.roll());
//! ```

pub mod dice;
pub mod errors;
pub mod rules;
pub mod state;
