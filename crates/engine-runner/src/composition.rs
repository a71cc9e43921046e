//! Engine assembly for the trail simulation.

use anyhow::{Context as _, Result};
use wolfcurses_engine::{Engine, EngineConfig};

use crate::trail::events::{
    Blizzard, BrokenWheel, FindBerries, HeavyFog, SnakeBite, Starvation, Thief,
};
use crate::trail::windows::{MainMenu, Store, Travel};
use crate::trail::Trail;

/// Build an engine with every trail window and event registered.
pub fn new_engine(state: Trail, config: EngineConfig) -> Result<Engine<Trail>> {
    let mut engine = Engine::new(state, config).context("creating engine")?;
    register_all(&mut engine)?;
    Ok(engine)
}

pub fn register_all(engine: &mut Engine<Trail>) -> Result<()> {
    engine.register_window::<MainMenu>()?;
    engine.register_window::<Store>()?;
    engine.register_window::<Travel>()?;

    engine.register_event::<Blizzard>()?;
    engine.register_event::<HeavyFog>()?;
    engine.register_event::<SnakeBite>()?;
    engine.register_event::<FindBerries>()?;
    engine.register_event::<BrokenWheel>()?;
    engine.register_event::<Thief>()?;
    engine.register_event::<Starvation>()?;

    tracing::info!(
        events = engine.director().factory().len(),
        windows = engine.stack().factory().len(),
        "Trail content registered"
    );
    Ok(())
}
