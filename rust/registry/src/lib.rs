//! # pigdice-registry: Per-Player Game Registry
//!
//! Maps opaque player identities to independent Pig game records and runs
//! the rules from [`pigdice_engine`] over them. Collaborator seams: a
//! [`DieSource`](pigdice_engine::dice::DieSource) for randomness and a
//! [`Scoreboard`] for the win threshold and completion reporting.
//!
//! Each record is guarded by its own lock; operations on different players
//! never contend. The registry owns the global completed-games counter,
//! which only advances once the scoreboard has accepted a report.

pub mod events;
pub mod logging;
pub mod registry;
pub mod scoreboard;

pub use events::{EventBus, EventSubscription, GameEvent};
pub use logging::init_logging;
pub use registry::{GameRegistry, GameView, PlayerId, RegistryError};
pub use scoreboard::{
    CompletionEntry, InMemoryScoreboard, Scoreboard, ScoreboardError, DEFAULT_WIN_THRESHOLD,
};
