use pigdice_engine::rules::CompletionReport;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Win threshold used by the in-memory scoreboard unless configured otherwise.
pub const DEFAULT_WIN_THRESHOLD: u32 = 100;

/// External scoreboard collaborator. Owns the win threshold, receives
/// completion reports, and keeps per-player completed-game counts.
///
/// Implementations may reject reports on their own validation; the registry
/// propagates the rejection and leaves its counters untouched.
pub trait Scoreboard: Send + Sync {
    /// Score a player must reach or exceed to win. Queried once per hold.
    fn win_threshold(&self) -> u32;

    /// Record a finished game for the given player.
    fn report_completion(
        &self,
        player: &str,
        report: &CompletionReport,
    ) -> Result<(), ScoreboardError>;

    /// Completed games recorded for the player, `None` when there is no data.
    fn completed_games_for(&self, player: &str) -> Option<u64>;
}

/// One accepted completion report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEntry {
    pub player: String,
    pub total_score: u32,
    pub round: u32,
    pub turn: u32,
    pub ts: String,
}

/// Reference scoreboard for tests and embedding: validated threshold,
/// per-player counts, and an append-only completion log.
#[derive(Debug)]
pub struct InMemoryScoreboard {
    win_threshold: u32,
    completions: RwLock<Vec<CompletionEntry>>,
    counts: RwLock<HashMap<String, u64>>,
}

impl InMemoryScoreboard {
    pub fn new() -> Self {
        Self {
            win_threshold: DEFAULT_WIN_THRESHOLD,
            completions: RwLock::new(Vec::new()),
            counts: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_threshold(win_threshold: u32) -> Result<Self, ScoreboardError> {
        if win_threshold == 0 {
            return Err(ScoreboardError::InvalidThreshold(
                "win threshold must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            win_threshold,
            completions: RwLock::new(Vec::new()),
            counts: RwLock::new(HashMap::new()),
        })
    }

    /// Most recent accepted completions, newest first.
    pub fn recent_completions(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<CompletionEntry>, ScoreboardError> {
        let completions = self
            .completions
            .read()
            .map_err(|_| ScoreboardError::StoragePoisoned)?;
        let limit = limit.unwrap_or(100);
        Ok(completions.iter().rev().take(limit).cloned().collect())
    }

    pub fn total_completions(&self) -> Result<usize, ScoreboardError> {
        let completions = self
            .completions
            .read()
            .map_err(|_| ScoreboardError::StoragePoisoned)?;
        Ok(completions.len())
    }
}

impl Default for InMemoryScoreboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Scoreboard for InMemoryScoreboard {
    fn win_threshold(&self) -> u32 {
        self.win_threshold
    }

    fn report_completion(
        &self,
        player: &str,
        report: &CompletionReport,
    ) -> Result<(), ScoreboardError> {
        if report.total_score < self.win_threshold {
            return Err(ScoreboardError::ScoreBelowThreshold {
                score: report.total_score,
                threshold: self.win_threshold,
            });
        }

        let entry = CompletionEntry {
            player: player.to_string(),
            total_score: report.total_score,
            round: report.round,
            turn: report.turn,
            ts: chrono::Utc::now().to_rfc3339(),
        };

        {
            let mut completions = self
                .completions
                .write()
                .map_err(|_| ScoreboardError::StoragePoisoned)?;
            completions.push(entry);
        }
        {
            let mut counts = self
                .counts
                .write()
                .map_err(|_| ScoreboardError::StoragePoisoned)?;
            *counts.entry(player.to_string()).or_insert(0) += 1;
        }
        Ok(())
    }

    fn completed_games_for(&self, player: &str) -> Option<u64> {
        let counts = self.counts.read().ok()?;
        counts.get(player).copied()
    }
}

#[derive(Debug, Error)]
pub enum ScoreboardError {
    #[error("Reported score {score} is below win threshold {threshold}")]
    ScoreBelowThreshold { score: u32, threshold: u32 },
    #[error("Invalid win threshold: {0}")]
    InvalidThreshold(String),
    #[error("Scoreboard storage poisoned")]
    StoragePoisoned,
}
