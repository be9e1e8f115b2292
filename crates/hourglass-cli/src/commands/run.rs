//! The `run` command: drives the engine with a periodic tokio interval and
//! plays the part of the rendering/audio host in the terminal.

use std::io::Write;
use std::time::Duration;

use clap::Args;
use hourglass_core::{format_duration, parse_duration, Event, FlipCoordinator, TimerEngine};

const BAR_WIDTH: usize = 24;
/// Length of the eased 180 degree rotation in the desktop hourglass.
const FLIP_MS: u64 = 800;

#[derive(Args)]
pub struct RunArgs {
    /// Countdown length as MM or MM:SS (default 25:00)
    #[arg(long)]
    pub duration: Option<String>,
    /// Tick interval in milliseconds
    #[arg(long, default_value = "100")]
    pub interval_ms: u64,
    /// After completion, flip the hourglass and start the next cycle
    #[arg(long)]
    pub flip: bool,
    /// Print events as JSON lines instead of a live display
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(run_loop(args))
}

async fn run_loop(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = TimerEngine::new();
    if let Some(text) = &args.duration {
        if let Some(event) = engine.set_duration(parse_duration(text)?) {
            emit(&[event], args.json)?;
        }
    }
    let mut coordinator = FlipCoordinator::new();

    if let Some(event) = engine.start() {
        emit(&[event], args.json)?;
    }

    let mut interval = tokio::time::interval(Duration::from_millis(args.interval_ms.max(1)));
    loop {
        interval.tick().await;
        let events = engine.tick();
        let completed = events
            .iter()
            .any(|e| matches!(e, Event::TimerCompleted { .. }));
        emit(&events, args.json)?;

        if completed {
            ding();
            coordinator.on_timer_completed();
            if !args.flip {
                return Ok(());
            }
            let events = coordinator
                .flip(&mut engine, || {
                    tokio::time::sleep(Duration::from_millis(FLIP_MS))
                })
                .await;
            emit(&events, args.json)?;
        }
    }
}

/// Audio collaborator: the terminal bell. Cannot fail, so the desktop app's
/// fallback-sound path collapses to nothing here.
fn ding() {
    print!("\x07");
    let _ = std::io::stdout().flush();
}

fn emit(events: &[Event], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        if json {
            println!("{}", serde_json::to_string(event)?);
        } else {
            render(event);
        }
    }
    Ok(())
}

fn render(event: &Event) {
    match event {
        Event::Tick {
            remaining_ms,
            progress,
            running,
            ..
        } => draw_line(*remaining_ms, *progress, *running),
        Event::TimerStarted {
            remaining_ms,
            duration_ms,
            ..
        } => {
            let progress = 1.0 - *remaining_ms as f64 / *duration_ms as f64;
            draw_line(*remaining_ms, progress, true);
        }
        Event::TimerPaused { remaining_ms, .. } => {
            println!("\npaused at {}", format_duration(*remaining_ms));
        }
        // After a reset remaining equals the duration, so progress is zero.
        Event::TimerReset { remaining_ms, .. } => draw_line(*remaining_ms, 0.0, false),
        Event::TimerCompleted { .. } => println!("\ntime's up"),
        Event::FlipStarted { .. } => println!("flipping the hourglass..."),
        Event::FlipFinished { .. } | Event::StateSnapshot { .. } => {}
    }
}

fn draw_line(remaining_ms: u64, progress: f64, running: bool) {
    let filled = ((progress * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    print!(
        "\r{} [{}{}] {}",
        format_duration(remaining_ms),
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        if running { "running" } else { "stopped" },
    );
    let _ = std::io::stdout().flush();
}
