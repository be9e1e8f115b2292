//! Reset/flip coordination.
//!
//! A flip is the animated 180 degree rotation that restarts the countdown.
//! The animation itself belongs to the host (the coordinator only sequences
//! around it), and two rules hold at all times:
//!
//! - at most one flip animation is in flight, and
//! - a flip is only accepted after the sand has fully run out, once per
//!   completion.
//!
//! While [`FlipPhase::Animating`] the host must disable its start/pause/
//! reset/flip controls; the coordinator exposes `is_animating()` /
//! `is_completed()` for exactly that.

use std::future::Future;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::engine::TimerEngine;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipPhase {
    /// Counting down, paused, or freshly reset.
    Idle,
    /// The countdown reached zero and no reset/flip has happened since.
    Completed,
    /// The flip animation is in flight; every command is ignored until the
    /// animation's own completion signal.
    Animating,
}

/// Gates the "reset with animated flip" user action.
///
/// ```text
/// Idle -> Completed -> Animating -> Idle
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipCoordinator {
    phase: FlipPhase,
}

impl Default for FlipCoordinator {
    fn default() -> Self {
        Self {
            phase: FlipPhase::Idle,
        }
    }
}

impl FlipCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> FlipPhase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        self.phase == FlipPhase::Animating
    }

    pub fn is_completed(&self) -> bool {
        self.phase == FlipPhase::Completed
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Feed the engine's completion notification into the coordinator.
    /// `Idle -> Completed`; ignored in any other phase. Returns whether the
    /// transition happened.
    pub fn on_timer_completed(&mut self) -> bool {
        if self.phase != FlipPhase::Idle {
            return false;
        }
        self.phase = FlipPhase::Completed;
        true
    }

    /// Accept the flip command. `Completed -> Animating`; rejected (no-op,
    /// `None`) from `Idle` and while a flip is already in flight.
    pub fn begin_flip(&mut self) -> Option<Event> {
        if self.phase != FlipPhase::Completed {
            return None;
        }
        self.phase = FlipPhase::Animating;
        Some(Event::FlipStarted { at: Utc::now() })
    }

    /// The animation's completion signal. `Animating -> Idle`; restarts the
    /// engine for the next cycle and clears the completed flag.
    pub fn finish_flip(&mut self, engine: &mut TimerEngine) -> Vec<Event> {
        if self.phase != FlipPhase::Animating {
            return Vec::new();
        }
        self.phase = FlipPhase::Idle;
        let mut events = Vec::new();
        events.extend(engine.reset());
        events.extend(engine.start());
        events.push(Event::FlipFinished {
            remaining_ms: engine.remaining_ms(),
            at: Utc::now(),
        });
        events
    }

    /// Plain reset, no flip: pause the engine, refill it, return to `Idle`.
    /// Accepted from `Idle` and `Completed`; ignored while animating.
    pub fn reset(&mut self, engine: &mut TimerEngine) -> Vec<Event> {
        if self.phase == FlipPhase::Animating {
            return Vec::new();
        }
        self.phase = FlipPhase::Idle;
        let mut events = Vec::new();
        events.extend(engine.pause());
        events.extend(engine.reset());
        events
    }

    /// Run the full flip sequence around an awaitable animation: accept the
    /// command, await the host's rotation, then reset+start the engine.
    ///
    /// Returns every event emitted along the way, or nothing when the flip
    /// was rejected. The `Animating` guard means a second call cannot start
    /// while one is suspended here.
    pub async fn flip<F, Fut>(&mut self, engine: &mut TimerEngine, animation: F) -> Vec<Event>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        let Some(started) = self.begin_flip() else {
            return Vec::new();
        };
        let mut events = vec![started];
        animation().await;
        events.extend(self.finish_flip(engine));
        events
    }
}
