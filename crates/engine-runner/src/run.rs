//! Console loop: pulses, line input and screen redraws.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wolfcurses_engine::{Engine, EngineConfig, InputOutcome};

use crate::composition::new_engine;
use crate::trail::Trail;

/// How often the host pulses the engine.
const PULSE_INTERVAL: Duration = Duration::from_millis(50);

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

pub fn run() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never interleave with the screen
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wolfcurses_engine=info,wolfcurses_trail=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = EngineConfig::from_env();
    tracing::info!(
        tick_interval_ms = config.tick_interval_ms,
        seed = ?config.seed,
        "Starting WolfCurses trail"
    );

    let mut engine = new_engine(Trail::new(), config)?;
    let input = spawn_input_reader();
    let mut screen = String::new();

    loop {
        engine.pulse();

        match input.try_recv() {
            Ok(line) => handle_line(&mut engine, &line),
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                tracing::info!("Input closed");
                break;
            }
        }

        if engine.state().quit {
            break;
        }

        let next = engine.render();
        if next != screen {
            redraw(&next)?;
            screen = next;
        }

        thread::sleep(PULSE_INTERVAL);
    }

    tracing::info!(ticks = engine.total_ticks(), "Shutting down");
    Ok(())
}

fn handle_line(engine: &mut Engine<Trail>, line: &str) {
    match engine.send_command(line.trim()) {
        Ok(InputOutcome::Ignored(reason)) => {
            tracing::debug!(?reason, input = line, "Input ignored");
        }
        Ok(_) => {}
        Err(err) => tracing::warn!(error = %err, "Input rejected"),
    }
}

/// Lines typed on stdin, read on a separate thread so pulses keep flowing.
fn spawn_input_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn redraw(screen: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "{CLEAR_SCREEN}{screen}")?;
    if !screen.ends_with('\n') {
        writeln!(out)?;
    }
    out.flush()
}
