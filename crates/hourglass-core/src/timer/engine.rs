//! Countdown engine implementation.
//!
//! The engine is a wall-clock-based state machine. It does not use internal
//! threads - the caller is responsible for calling `tick()` periodically
//! while the timer is running (the original host fires every 100 ms).
//!
//! Each tick measures the real elapsed time since the previous evaluation
//! rather than subtracting a fixed step. Periodic schedulers are not
//! guaranteed to fire on time (event-loop contention, sleep/resume), and the
//! wall-clock delta keeps the countdown accurate under that jitter.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new();
//! engine.set_duration(5 * 60 * 1000);
//! engine.start();
//! // In a loop:
//! for event in engine.tick() { /* render */ }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;

/// Default countdown length: 25 minutes.
pub const DEFAULT_DURATION_MS: u64 = 25 * 60 * 1000;

/// Zero durations are silently clamped to one second.
pub const MIN_DURATION_MS: u64 = 1_000;

/// Core countdown engine.
///
/// Operates on wall-clock deltas -- no internal thread.
/// No operation is fallible: invalid inputs are normalized and commands that
/// do not apply in the current state are no-ops returning `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    /// Configured countdown length in milliseconds, never below [`MIN_DURATION_MS`].
    duration_ms: u64,
    /// Remaining time in milliseconds, `0 ..= duration_ms` outside of the
    /// window where `set_duration` shrinks the duration mid-run.
    remaining_ms: u64,
    running: bool,
    /// Timestamp (ms since epoch) of the last tick evaluation.
    /// `Some` exactly while running.
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerEngine {
    /// Create a stopped engine with the default 25 minute duration.
    pub fn new() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            remaining_ms: DEFAULT_DURATION_MS,
            running: false,
            last_tick_epoch_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// 0.0 .. 1.0 fraction of the duration elapsed.
    ///
    /// Clamped, so it stays in range even while `remaining > duration`
    /// after a mid-run duration change.
    pub fn progress(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        let remaining = self.remaining_ms.min(self.duration_ms) as f64;
        1.0 - remaining / self.duration_ms as f64
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            running: self.running,
            remaining_ms: self.remaining_ms,
            duration_ms: self.duration_ms,
            progress: self.progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Change the configured duration. A zero duration is clamped to one
    /// second, never rejected.
    ///
    /// When stopped this also refills `remaining` and returns a `Tick` so
    /// observers refresh without waiting for the next scheduled tick. While
    /// running only the configured duration changes; `remaining` is left
    /// untouched until a later `reset`.
    pub fn set_duration(&mut self, duration_ms: u64) -> Option<Event> {
        let duration_ms = if duration_ms == 0 {
            MIN_DURATION_MS
        } else {
            duration_ms
        };
        self.duration_ms = duration_ms;
        if self.running {
            return None;
        }
        self.remaining_ms = duration_ms;
        Some(self.tick_event())
    }

    /// Start the countdown, reading the clock from `SystemTime`.
    pub fn start(&mut self) -> Option<Event> {
        self.start_at(now_ms())
    }

    /// Start the countdown with an explicit clock reading.
    ///
    /// No-op while already running. A depleted timer refills from the
    /// configured duration first, so starting after completion begins a
    /// fresh cycle instead of doing nothing forever.
    pub fn start_at(&mut self, now_ms: u64) -> Option<Event> {
        if self.running {
            return None;
        }
        if self.remaining_ms == 0 {
            self.remaining_ms = self.duration_ms;
        }
        self.running = true;
        self.last_tick_epoch_ms = Some(now_ms);
        Some(Event::TimerStarted {
            remaining_ms: self.remaining_ms,
            duration_ms: self.duration_ms,
            at: Utc::now(),
        })
    }

    /// Stop the countdown. No-op when not running.
    ///
    /// `remaining` stays exactly as last computed - no additional time is
    /// deducted at pause time; stopping the tick source is what stops decay.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        self.last_tick_epoch_ms = None;
        Some(Event::TimerPaused {
            remaining_ms: self.remaining_ms,
            at: Utc::now(),
        })
    }

    /// Stop (idempotent, even when already paused) and refill `remaining`
    /// from the configured duration.
    pub fn reset(&mut self) -> Option<Event> {
        self.running = false;
        self.last_tick_epoch_ms = None;
        self.remaining_ms = self.duration_ms;
        Some(Event::TimerReset {
            remaining_ms: self.remaining_ms,
            at: Utc::now(),
        })
    }

    /// Periodic evaluation, reading the clock from `SystemTime`.
    pub fn tick(&mut self) -> Vec<Event> {
        self.tick_at(now_ms())
    }

    /// Periodic evaluation with an explicit clock reading.
    ///
    /// Returns nothing when not running. Otherwise deducts the wall-clock
    /// time elapsed since the previous evaluation and returns `[Tick]`, or
    /// `[Tick, TimerCompleted]` when the countdown reaches zero. Depletion
    /// stops the engine, so completion fires exactly once per cycle.
    pub fn tick_at(&mut self, now_ms: u64) -> Vec<Event> {
        if !self.running {
            return Vec::new();
        }
        let elapsed = self
            .last_tick_epoch_ms
            .map(|last| now_ms.saturating_sub(last))
            .unwrap_or(0);
        self.last_tick_epoch_ms = Some(now_ms);
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);

        if self.remaining_ms == 0 {
            self.running = false;
            self.last_tick_epoch_ms = None;
            vec![self.tick_event(), Event::TimerCompleted { at: Utc::now() }]
        } else {
            vec![self.tick_event()]
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn tick_event(&self) -> Event {
        Event::Tick {
            remaining_ms: self.remaining_ms,
            duration_ms: self.duration_ms,
            progress: self.progress(),
            running: self.running,
            at: Utc::now(),
        }
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_engine_is_stopped_at_default_duration() {
        let engine = TimerEngine::new();
        assert!(!engine.is_running());
        assert_eq!(engine.duration_ms(), DEFAULT_DURATION_MS);
        assert_eq!(engine.remaining_ms(), DEFAULT_DURATION_MS);
        assert_eq!(engine.progress(), 0.0);
    }

    #[test]
    fn set_duration_when_stopped_refills_remaining() {
        let mut engine = TimerEngine::new();
        let event = engine.set_duration(90_000);
        assert!(matches!(event, Some(Event::Tick { .. })));
        assert_eq!(engine.duration_ms(), 90_000);
        assert_eq!(engine.remaining_ms(), 90_000);
    }

    #[test]
    fn zero_duration_clamps_to_one_second() {
        let mut engine = TimerEngine::new();
        engine.set_duration(0);
        assert_eq!(engine.duration_ms(), MIN_DURATION_MS);
        assert_eq!(engine.remaining_ms(), MIN_DURATION_MS);
    }

    #[test]
    fn sub_second_duration_is_not_clamped() {
        let mut engine = TimerEngine::new();
        engine.set_duration(500);
        assert_eq!(engine.duration_ms(), 500);
    }

    #[test]
    fn set_duration_while_running_keeps_remaining() {
        let mut engine = TimerEngine::new();
        engine.set_duration(60_000);
        engine.start_at(1_000);
        let event = engine.set_duration(120_000);
        assert!(event.is_none());
        assert_eq!(engine.duration_ms(), 120_000);
        assert_eq!(engine.remaining_ms(), 60_000);
    }

    #[test]
    fn start_twice_is_a_noop() {
        let mut engine = TimerEngine::new();
        assert!(engine.start_at(1_000).is_some());
        assert!(engine.start_at(2_000).is_none());
        assert!(engine.is_running());
        // The second call must not reset the tick baseline: a tick after the
        // ignored start still measures from the first start.
        let events = engine.tick_at(3_000);
        assert!(matches!(
            events.as_slice(),
            [Event::Tick { remaining_ms, .. }]
                if *remaining_ms == DEFAULT_DURATION_MS - 2_000
        ));
    }

    #[test]
    fn start_refills_a_depleted_timer() {
        let mut engine = TimerEngine::new();
        engine.set_duration(1_000);
        engine.start_at(0);
        engine.tick_at(1_500);
        assert_eq!(engine.remaining_ms(), 0);
        engine.start_at(2_000);
        assert_eq!(engine.remaining_ms(), 1_000);
        assert!(engine.is_running());
    }

    #[test]
    fn tick_deducts_wall_clock_elapsed_not_fixed_steps() {
        let mut engine = TimerEngine::new();
        engine.set_duration(10_000);
        engine.start_at(1_000);
        // Late tick: 250 ms scheduled, 700 ms actually elapsed.
        engine.tick_at(1_700);
        assert_eq!(engine.remaining_ms(), 9_300);
        engine.tick_at(1_800);
        assert_eq!(engine.remaining_ms(), 9_200);
    }

    #[test]
    fn pause_preserves_remaining_across_the_gap() {
        let mut engine = TimerEngine::new();
        engine.set_duration(10_000);
        engine.start_at(0);
        engine.tick_at(400);
        assert_eq!(engine.remaining_ms(), 9_600);

        assert!(engine.pause().is_some());
        assert_eq!(engine.remaining_ms(), 9_600);
        assert!(engine.pause().is_none());

        // Resume much later: the paused interval is never deducted.
        engine.start_at(1_000_000);
        assert_eq!(engine.remaining_ms(), 9_600);
        engine.tick_at(1_000_100);
        assert_eq!(engine.remaining_ms(), 9_500);
    }

    #[test]
    fn ticks_while_stopped_return_nothing() {
        let mut engine = TimerEngine::new();
        assert!(engine.tick_at(5_000).is_empty());
        engine.start_at(5_000);
        engine.pause();
        assert!(engine.tick_at(6_000).is_empty());
    }

    #[test]
    fn completion_emits_tick_then_completed_and_stops() {
        let mut engine = TimerEngine::new();
        engine.set_duration(1_000);
        engine.start_at(0);
        let events = engine.tick_at(1_100);
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            Event::Tick { remaining_ms: 0, running: false, .. }
        ));
        assert!(matches!(events[1], Event::TimerCompleted { .. }));
        assert!(!engine.is_running());
        assert_eq!(engine.progress(), 1.0);
        // No second completion for the same cycle.
        assert!(engine.tick_at(2_000).is_empty());
    }

    #[test]
    fn overshoot_clamps_remaining_to_zero() {
        let mut engine = TimerEngine::new();
        engine.set_duration(1_000);
        engine.start_at(0);
        // Host slept through several intervals.
        engine.tick_at(60_000);
        assert_eq!(engine.remaining_ms(), 0);
        assert_eq!(engine.progress(), 1.0);
    }

    #[test]
    fn reset_is_idempotent_and_refills() {
        let mut engine = TimerEngine::new();
        engine.set_duration(5_000);
        engine.start_at(0);
        engine.tick_at(2_000);
        let event = engine.reset();
        assert!(matches!(event, Some(Event::TimerReset { .. })));
        assert_eq!(engine.remaining_ms(), 5_000);
        assert!(!engine.is_running());
        // Reset when already stopped still refills and notifies.
        assert!(engine.reset().is_some());
        assert_eq!(engine.remaining_ms(), 5_000);
    }

    #[test]
    fn snapshot_reflects_current_state() {
        let mut engine = TimerEngine::new();
        engine.set_duration(4_000);
        engine.start_at(0);
        engine.tick_at(1_000);
        match engine.snapshot() {
            Event::StateSnapshot {
                running,
                remaining_ms,
                duration_ms,
                progress,
                ..
            } => {
                assert!(running);
                assert_eq!(remaining_ms, 3_000);
                assert_eq!(duration_ms, 4_000);
                assert!((progress - 0.25).abs() < 1e-9);
            }
            other => panic!("expected StateSnapshot, got {other:?}"),
        }
    }

    proptest! {
        /// `progress` never leaves [0, 1], whatever the caller does -
        /// including shrinking the duration mid-run.
        #[test]
        fn progress_stays_in_unit_interval(
            ops in proptest::collection::vec((0u8..5, 0u64..120_000), 1..40)
        ) {
            let mut engine = TimerEngine::new();
            let mut clock: u64 = 0;
            for (op, value) in ops {
                clock += value;
                match op {
                    0 => { engine.set_duration(value); }
                    1 => { engine.start_at(clock); }
                    2 => { engine.pause(); }
                    3 => { engine.reset(); }
                    _ => { engine.tick_at(clock); }
                }
                let p = engine.progress();
                prop_assert!((0.0..=1.0).contains(&p), "progress out of range: {p}");
            }
        }

        /// Remaining time never exceeds the configured duration while the
        /// duration is only ever set when the engine is stopped.
        #[test]
        fn remaining_bounded_by_duration_when_set_while_stopped(
            duration in 1u64..7_200_000,
            steps in proptest::collection::vec(0u64..10_000, 0..50)
        ) {
            let mut engine = TimerEngine::new();
            engine.set_duration(duration);
            let mut clock = 0;
            engine.start_at(clock);
            for step in steps {
                clock += step;
                engine.tick_at(clock);
                prop_assert!(engine.remaining_ms() <= engine.duration_ms());
            }
        }
    }
}
