mod engine;
mod flip;

pub use engine::{TimerEngine, DEFAULT_DURATION_MS, MIN_DURATION_MS};
pub use flip::{FlipCoordinator, FlipPhase};
