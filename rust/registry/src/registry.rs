use crate::events::{EventBus, GameEvent};
use crate::scoreboard::Scoreboard;
use pigdice_engine::dice::{DieSource, SeededDie};
use pigdice_engine::errors::GameError;
use pigdice_engine::rules::{self, CompletionReport, HoldOutcome, RollOutcome};
use pigdice_engine::state::UserGameState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use thiserror::Error;

/// Opaque, already-authenticated player identifier.
pub type PlayerId = String;

const DEFAULT_DIE_SEED: u64 = 0xD1CE_0B01;

/// Keyed registry of per-player Pig games.
///
/// Owns every game record it contains; all mutation goes through a registry
/// operation. The map lock is only held to locate or insert a record, never
/// across a game mutation, so two players' operations do not contend. Two
/// operations on the same player serialize on that record's own lock.
pub struct GameRegistry {
    games: RwLock<HashMap<PlayerId, Arc<GameRecord>>>,
    games_played: Mutex<u64>,
    scoreboard: Arc<dyn Scoreboard>,
    dice: Mutex<Box<dyn DieSource>>,
    event_bus: Arc<EventBus>,
}

#[derive(Debug)]
struct GameRecord {
    state: Mutex<UserGameState>,
}

impl std::fmt::Debug for GameRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameRegistry")
            .field("players", &self.active_players().len())
            .field("games_played", &self.games_played())
            .finish()
    }
}

impl GameRegistry {
    pub fn new(scoreboard: Arc<dyn Scoreboard>) -> Self {
        Self::with_dice(scoreboard, Box::new(SeededDie::new_with_seed(DEFAULT_DIE_SEED)))
    }

    pub fn with_seed(scoreboard: Arc<dyn Scoreboard>, seed: u64) -> Self {
        Self::with_dice(scoreboard, Box::new(SeededDie::new_with_seed(seed)))
    }

    pub fn with_dice(scoreboard: Arc<dyn Scoreboard>, dice: Box<dyn DieSource>) -> Self {
        Self::with_dice_and_events(scoreboard, dice, Arc::new(EventBus::new()))
    }

    pub fn with_dice_and_events(
        scoreboard: Arc<dyn Scoreboard>,
        dice: Box<dyn DieSource>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            games: RwLock::new(HashMap::new()),
            games_played: Mutex::new(0),
            scoreboard,
            dice: Mutex::new(dice),
            event_bus,
        }
    }

    /// Roll the registry's own die for the player. First roll lazily creates
    /// the player's record.
    pub fn roll(&self, player: &str) -> Result<GameView, RegistryError> {
        let die_value = {
            let mut dice = self
                .dice
                .lock()
                .map_err(|_| RegistryError::StoragePoisoned)?;
            dice.roll()
        };
        self.roll_with_die(player, die_value)
    }

    /// Apply a caller-supplied die value, for callers that bring their own
    /// randomness collaborator and for deterministic tests.
    pub fn roll_with_die(&self, player: &str, die_value: u8) -> Result<GameView, RegistryError> {
        let record = self.get_or_create(player)?;
        let mut state = record
            .state
            .lock()
            .map_err(|_| RegistryError::StoragePoisoned)?;
        let outcome = rules::apply_roll(&mut state, die_value)?;
        let view = snapshot(player, &state);
        drop(state);

        match outcome {
            RollOutcome::Busted => {
                tracing::debug!(player = %player, round = view.round, "turn busted on a 1");
                self.event_bus.broadcast(
                    player,
                    GameEvent::Busted {
                        player: player.to_string(),
                        round: view.round,
                        turn: view.turn,
                    },
                );
            }
            RollOutcome::Scored { turn_score } => {
                tracing::debug!(player = %player, die = die_value, turn_score, "roll scored");
                self.event_bus.broadcast(
                    player,
                    GameEvent::Rolled {
                        player: player.to_string(),
                        die: die_value,
                        turn_score,
                        round: view.round,
                    },
                );
            }
        }

        Ok(view)
    }

    /// Bank the current turn's points. Requires an existing record: there is
    /// no turn to end for a player who has never rolled.
    pub fn hold(&self, player: &str) -> Result<GameView, RegistryError> {
        let record = self.require_existing(player)?;
        let win_threshold = self.scoreboard.win_threshold();
        let mut state = record
            .state
            .lock()
            .map_err(|_| RegistryError::StoragePoisoned)?;
        let outcome = rules::apply_hold(&mut state, win_threshold)?;
        let view = snapshot(player, &state);
        drop(state);

        self.event_bus.broadcast(
            player,
            GameEvent::Held {
                player: player.to_string(),
                total_score: view.total_score,
                turn: view.turn,
            },
        );
        match outcome {
            HoldOutcome::Banked { total_score } => {
                tracing::debug!(player = %player, total_score, "turn points banked");
            }
            HoldOutcome::Won { total_score } => {
                tracing::info!(player = %player, total_score, win_threshold, "game won");
                self.event_bus.broadcast(
                    player,
                    GameEvent::GameWon {
                        player: player.to_string(),
                        total_score,
                    },
                );
            }
        }

        Ok(view)
    }

    /// Report a finished game to the scoreboard and count it.
    ///
    /// The record lock is held across the forward call, so completion is
    /// atomic from the caller's viewpoint; the global counter only moves
    /// once the scoreboard has accepted the report.
    pub fn complete(&self, player: &str) -> Result<CompletionReport, RegistryError> {
        let record = self.require_existing(player)?;
        let state = record
            .state
            .lock()
            .map_err(|_| RegistryError::StoragePoisoned)?;
        let report = rules::completion_report(&state)?;

        self.scoreboard
            .report_completion(player, &report)
            .map_err(|err| {
                tracing::warn!(player = %player, error = %err, "completion report rejected");
                RegistryError::ExternalReport(err.to_string())
            })?;

        let games_played = {
            let mut counter = self
                .games_played
                .lock()
                .map_err(|_| RegistryError::StoragePoisoned)?;
            *counter += 1;
            *counter
        };
        drop(state);

        tracing::info!(
            player = %player,
            total_score = report.total_score,
            games_played,
            "game completion recorded"
        );
        self.event_bus.broadcast(
            player,
            GameEvent::GameCompleted {
                player: player.to_string(),
                total_score: report.total_score,
                round: report.round,
                turn: report.turn,
                games_played,
            },
        );

        Ok(report)
    }

    /// Replace the player's record with the zero-valued default, creating it
    /// if absent. Always succeeds; this is the only way out of a finished
    /// game.
    pub fn reset(&self, player: &str) -> Result<GameView, RegistryError> {
        let record = self.get_or_create(player)?;
        let mut state = record
            .state
            .lock()
            .map_err(|_| RegistryError::StoragePoisoned)?;
        *state = UserGameState::default();
        let view = snapshot(player, &state);
        drop(state);

        tracing::info!(player = %player, "game reset");
        self.event_bus.broadcast(
            player,
            GameEvent::GameReset {
                player: player.to_string(),
            },
        );

        Ok(view)
    }

    // Read-only views. A missing record is a valid query state, not a fault:
    // these return the zero value instead of failing.

    pub fn view(&self, player: &str) -> GameView {
        match self.read_state(player) {
            Some(state) => snapshot(player, &state),
            None => snapshot(player, &UserGameState::default()),
        }
    }

    pub fn last_roll(&self, player: &str) -> u8 {
        self.read_state(player).map_or(0, |s| s.last_roll)
    }

    pub fn round(&self, player: &str) -> u32 {
        self.read_state(player).map_or(0, |s| s.round)
    }

    pub fn turn(&self, player: &str) -> u32 {
        self.read_state(player).map_or(0, |s| s.turn)
    }

    pub fn turn_score(&self, player: &str) -> u32 {
        self.read_state(player).map_or(0, |s| s.turn_score)
    }

    pub fn total_score(&self, player: &str) -> u32 {
        self.read_state(player).map_or(0, |s| s.total_score)
    }

    pub fn game_over(&self, player: &str) -> bool {
        self.read_state(player).is_some_and(|s| s.game_over)
    }

    /// Completions registered through this registry, across all players.
    pub fn games_played(&self) -> u64 {
        self.games_played.lock().map_or(0, |counter| *counter)
    }

    /// Completed games the scoreboard has recorded for the player; 0 when
    /// the scoreboard reports no data.
    pub fn user_games_played_for(&self, player: &str) -> u64 {
        self.scoreboard.completed_games_for(player).unwrap_or(0)
    }

    pub fn active_players(&self) -> Vec<PlayerId> {
        match self.games.read() {
            Ok(guard) => guard.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }

    fn get_or_create(&self, player: &str) -> Result<Arc<GameRecord>, RegistryError> {
        let mut guard = self
            .games
            .write()
            .map_err(|_| RegistryError::StoragePoisoned)?;
        let record = guard
            .entry(player.to_string())
            .or_insert_with(|| {
                tracing::info!(player = %player, "creating game record");
                Arc::new(GameRecord {
                    state: Mutex::new(UserGameState::default()),
                })
            })
            .clone();
        Ok(record)
    }

    fn require_existing(&self, player: &str) -> Result<Arc<GameRecord>, RegistryError> {
        let guard = self
            .games
            .read()
            .map_err(|_| RegistryError::StoragePoisoned)?;
        guard
            .get(player)
            .cloned()
            .ok_or_else(|| RegistryError::NoActiveGame(player.to_string()))
    }

    fn read_state(&self, player: &str) -> Option<UserGameState> {
        let record = {
            let guard = self.games.read().ok()?;
            guard.get(player)?.clone()
        };
        let state = record.state.lock().ok()?;
        Some(state.clone())
    }
}

fn snapshot(player: &str, state: &UserGameState) -> GameView {
    GameView {
        player: player.to_string(),
        last_roll: state.last_roll,
        turn_score: state.turn_score,
        total_score: state.total_score,
        round: state.round,
        turn: state.turn,
        game_over: state.game_over,
    }
}

/// Public snapshot of one player's game, returned by mutating operations and
/// the whole-record view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameView {
    pub player: PlayerId,
    pub last_roll: u8,
    pub turn_score: u32,
    pub total_score: u32,
    pub round: u32,
    pub turn: u32,
    pub game_over: bool,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("No active game for player: {0}")]
    NoActiveGame(PlayerId),
    #[error("Game-over status does not allow this action")]
    GameOver,
    #[error("Die value out of range: {value}, expected 1-6")]
    InvalidDieValue { value: u8 },
    #[error("Completion report rejected: {0}")]
    ExternalReport(String),
    #[error("Registry storage poisoned")]
    StoragePoisoned,
}

impl From<GameError> for RegistryError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::GameOver => RegistryError::GameOver,
            GameError::InvalidDieValue { value } => RegistryError::InvalidDieValue { value },
        }
    }
}
