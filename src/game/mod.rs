//! Round logic for the matching game. Nothing in here knows about widgets or
//! the main loop: delayed work comes back to the caller as [`ScheduledTask`]s.

mod card;
mod controller;
mod difficulty;
mod schedule;

pub use card::{Card, CardId, SYMBOL_POOL, Symbol};
pub use controller::{
    GameController, Ignored, MATCH_POINTS, RoundStatus, Selection, TaskOutcome, Tick,
    TimeoutPolicy, TurnPhase,
};
pub use difficulty::{Difficulty, Preset};
pub use schedule::{
    MISMATCH_DELAY, RoundId, ScheduledTask, TICK_INTERVAL, TaskKind, VICTORY_RESTART_DELAY,
};
