//! WolfCurses Trail - console host for the WolfCurses engine
//!
//! This crate is the *composition root*: it builds the demonstration trail
//! simulation, registers its windows and events with the engine, and drives
//! the engine from the terminal.

mod composition;
mod run;
mod trail;

fn main() -> anyhow::Result<()> {
    run::run()
}
