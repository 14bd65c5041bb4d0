use std::time::Duration;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
pub const MISMATCH_DELAY: Duration = Duration::from_secs(1);
pub const VICTORY_RESTART_DELAY: Duration = Duration::from_secs(3);

/// Identity of one shuffled board. Every `start` issues a new one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct RoundId(pub u64);

impl RoundId {
    pub(crate) fn next(self) -> Self {
        RoundId(self.0.wrapping_add(1))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
    /// Hide a mismatched pair and finish the turn.
    ClearChoices,
    /// Reshuffle after a win.
    AutoRestart,
}

/// A delayed action the host must hand back to
/// [`GameController::run_task`](super::GameController::run_task) once `delay` has elapsed.
/// It only takes effect if its round is still the current one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledTask {
    pub round: RoundId,
    pub kind: TaskKind,
    pub delay: Duration,
}

impl ScheduledTask {
    pub(crate) fn clear_choices(round: RoundId) -> Self {
        ScheduledTask {
            round,
            kind: TaskKind::ClearChoices,
            delay: MISMATCH_DELAY,
        }
    }

    pub(crate) fn auto_restart(round: RoundId) -> Self {
        ScheduledTask {
            round,
            kind: TaskKind::AutoRestart,
            delay: VICTORY_RESTART_DELAY,
        }
    }
}
