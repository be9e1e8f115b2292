use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every state change in the system produces an Event.
/// Commands return the events they emit; the host renders or forwards them.
///
/// On the final tick of a countdown the engine returns `Tick` followed by
/// `TimerCompleted`, in that order, so a display refreshes to 00:00 before
/// any completion side effect fires.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Periodic re-evaluation of remaining time. Also returned by commands
    /// that change the displayed state without starting the timer.
    Tick {
        remaining_ms: u64,
        duration_ms: u64,
        progress: f64,
        running: bool,
        at: DateTime<Utc>,
    },
    TimerStarted {
        remaining_ms: u64,
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    /// The countdown reached zero. Fires exactly once per cycle.
    TimerCompleted {
        at: DateTime<Utc>,
    },
    /// The flip animation was accepted and is now in flight.
    /// The host should disable its controls until `FlipFinished`.
    FlipStarted {
        at: DateTime<Utc>,
    },
    /// The flip animation finished and the engine was restarted.
    FlipFinished {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    /// Full state snapshot for hosts that attach mid-session.
    StateSnapshot {
        running: bool,
        remaining_ms: u64,
        duration_ms: u64,
        progress: f64,
        at: DateTime<Utc>,
    },
}
