//! # Hourglass Core Library
//!
//! This library provides the core logic for the Hourglass countdown timer:
//! a wall-clock-based countdown engine and the state machine that sequences
//! the "reset with animated flip" interaction. The GUI/terminal host is a
//! thin layer over this crate -- it forwards user commands to the engine and
//! renders the events the engine returns.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A wall-clock-based state machine that requires the
//!   caller to periodically invoke `tick()` for progress updates
//! - **Flip Coordinator**: Gates the animated flip so at most one animation
//!   is in flight and a flip is only accepted after natural completion
//! - **Duration parsing**: `MM` / `MM:SS` text normalization for input hosts
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core countdown state machine
//! - [`FlipCoordinator`]: Reset/flip sequencing
//! - [`Event`]: Notifications returned by engine and coordinator commands

pub mod duration;
pub mod events;
pub mod timer;

pub use duration::{format_duration, parse_duration, ParseDurationError};
pub use events::Event;
pub use timer::{FlipCoordinator, FlipPhase, TimerEngine};
