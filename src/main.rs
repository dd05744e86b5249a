//! Mousewake - anti-idle cursor nudging daemon
//!
//! Keeps a desktop machine from auto-locking or sleeping by nudging the mouse
//! cursor whenever the system has been idle beyond a configurable threshold
//! (or unconditionally on a fixed timer), alternating direction on each nudge
//! so the cursor oscillates instead of drifting. Runs until terminated.

mod config;
mod engine;
mod idle;
mod pointer;
mod status;

use anyhow::{Context, Result};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::config::{Config, Mode};
use crate::engine::{Engine, Outcome};
use crate::idle::{IdleSource, SystemIdle};
use crate::pointer::{PointerDevice, SystemPointer};
use crate::status::StatusLine;

/// Application version.
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let (config, warnings) = Config::from_args(std::env::args().skip(1));

    init_tracing(if config.quiet { "error" } else { "info" })?;

    info!("Starting mousewake v{}", VERSION);
    for warning in &warnings {
        warn!("{}", warning);
    }

    info!(
        "Mouse move offset: {} pixels{}",
        config.offset_px,
        if config.randomize { " (randomized)" } else { "" }
    );
    match config.mode {
        Mode::Reactive => info!("Max idle time: {} seconds", config.interval_seconds),
        Mode::Proactive => info!("Move interval: {} seconds", config.interval_seconds),
    }

    let idle = SystemIdle::new().context("Failed to initialize idle detection")?;
    let pointer = SystemPointer::new().context("Failed to initialize pointer control")?;

    run_mover_loop(config, idle, pointer).await
}

/// Run the mover loop until the process is terminated.
async fn run_mover_loop<I, P>(config: Config, idle: I, pointer: P) -> Result<()>
where
    I: IdleSource,
    P: PointerDevice,
{
    let mut engine = Engine::new(config.clone(), idle, pointer);
    let mut status = StatusLine::new(config.quiet);

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    info!("Entering mover loop");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                // Clear the status line first so any log record emitted during
                // the tick lands on a clean line.
                status.make_room();

                let report = engine.tick();

                match &report.outcome {
                    Outcome::Moved { from, to } => match config.mode {
                        Mode::Reactive => info!(
                            "System idle for {}s, nudged cursor {} -> {}",
                            report.idle_seconds, from, to
                        ),
                        Mode::Proactive => info!("Nudged cursor {} -> {}", from, to),
                    },
                    Outcome::Resumed => info!("User activity resumed"),
                    _ => {}
                }

                status.render(&report, &config);
            }
            _ = &mut ctrl_c => {
                break;
            }
        }
    }

    status.finish();
    info!("Nudged the cursor {} times. Goodbye!", engine.moves());

    Ok(())
}

/// Initialize tracing subscriber with the given log level.
fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();

    Ok(())
}
