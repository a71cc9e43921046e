//! Engine facade
//!
//! Owns the simulation state and every engine part, and is the only thing a
//! host talks to: feed it pulses and lines of input, and draw whatever
//! [`Engine::render`] returns.

use crate::config::EngineConfig;
use crate::director::Director;
use crate::event::RegisteredEvent;
use crate::event_window::EventWindow;
use crate::factory::EventFactory;
use crate::ports::{random_from_seed, ClockPort, RandomPort, SystemClock};
use crate::scheduler::{Tick, TickScheduler};
use crate::simulation::{Context, Simulation, WindowRequests};
use crate::stack::{WindowFactory, WindowStack};
use crate::window::{InputOutcome, WindowKind};
use crate::{EngineError, WindowId};

pub struct Engine<S: Simulation> {
    state: S,
    stack: WindowStack<S>,
    director: Director<S>,
    scheduler: TickScheduler,
    requests: WindowRequests,
    config: EngineConfig,
}

impl<S: Simulation> Engine<S> {
    /// Engine on the system clock, seeded from the configuration if a seed
    /// is set.
    pub fn new(state: S, config: EngineConfig) -> Result<Self, EngineError> {
        let rng = random_from_seed(config.seed);
        Self::with_ports(state, config, Box::new(SystemClock::new()), rng)
    }

    pub fn with_ports(
        state: S,
        config: EngineConfig,
        clock: Box<dyn ClockPort>,
        rng: Box<dyn RandomPort>,
    ) -> Result<Self, EngineError> {
        let mut windows = WindowFactory::<S>::new();
        windows.register::<EventWindow>()?;

        let mut stack = WindowStack::new(windows);
        stack.set_show_command_names(config.show_command_names);

        tracing::debug!(
            tick_interval_ms = config.tick_interval_ms,
            event_roll_sides = config.event_roll_sides,
            seeded = config.seed.is_some(),
            "Engine created"
        );

        Ok(Self {
            state,
            stack,
            director: Director::new(EventFactory::new(), rng, config.event_roll_sides),
            scheduler: TickScheduler::new(clock, config.tick_interval_ms),
            requests: WindowRequests::new(),
            config,
        })
    }

    // =========================================================================
    // Registration
    // =========================================================================

    pub fn register_window<K: WindowKind<S>>(&mut self) -> Result<(), EngineError> {
        self.stack.factory_mut().register::<K>()
    }

    pub fn register_event<E: RegisteredEvent<S>>(&mut self) -> Result<(), EngineError> {
        self.director.factory_mut().register::<E>()
    }

    // =========================================================================
    // Host loop
    // =========================================================================

    /// Feed one host pulse. Returns the logical tick if one ran.
    pub fn pulse(&mut self) -> Option<Tick> {
        let tick = self.scheduler.pulse()?;

        if tick.is_first() {
            tracing::info!("Simulation started");
            self.state.on_first_tick(&mut self.requests);
            self.apply_requests();
        }

        self.state.on_tick(&tick);
        let mut cx = Context::new(&mut self.state, &mut self.director, &mut self.requests);
        self.stack.tick_active(&tick, &mut cx);
        self.apply_requests();

        Some(tick)
    }

    /// Hand a line of input to the active window.
    pub fn send_command(&mut self, input: &str) -> Result<InputOutcome, EngineError> {
        let mut cx = Context::new(&mut self.state, &mut self.director, &mut self.requests);
        let outcome = self.stack.send_command(input, &mut cx);
        self.apply_requests();
        outcome
    }

    /// Current screen: the status line, then the active window's text.
    pub fn render(&mut self) -> String {
        let body = self.stack.render(&self.state);
        if !self.config.show_status_line {
            return body;
        }

        let status = format!(
            "{} tick {}",
            self.scheduler.status_glyph(),
            self.scheduler.total_ticks()
        );
        if body.is_empty() {
            status
        } else {
            format!("{status}\n{body}")
        }
    }

    pub fn accepts_input(&self) -> bool {
        self.stack.accepts_input()
    }

    // =========================================================================
    // Stack control
    // =========================================================================

    pub fn add_window(&mut self, id: WindowId) -> Result<bool, EngineError> {
        let mut cx = Context::new(&mut self.state, &mut self.director, &mut self.requests);
        let added = self.stack.add_window(id, &mut cx);
        self.apply_requests();
        added
    }

    pub fn remove_window(&mut self, id: WindowId) -> Result<(), EngineError> {
        let mut cx = Context::new(&mut self.state, &mut self.director, &mut self.requests);
        let removed = self.stack.remove_window(id, &mut cx);
        self.apply_requests();
        removed
    }

    /// Fire an event from outside any window, skipping the dice.
    pub fn trigger_event<E: RegisteredEvent<S>>(&mut self, target: S::Entity) -> Result<(), EngineError> {
        self.director.trigger_event::<E>(&mut self.requests, target)?;
        self.apply_requests();
        Ok(())
    }

    /// Drop every window and pending event and start the clock over, so the
    /// next logical tick counts as the first one again. The simulation state
    /// is kept.
    pub fn restart(&mut self) {
        tracing::info!(ticks = self.scheduler.total_ticks(), "Restarting simulation");
        self.stack.clear();
        self.requests.clear();
        self.director.clear_pending();
        self.scheduler.reset();
    }

    /// Push every requested window. Adding a window runs its hooks, which
    /// may request more.
    fn apply_requests(&mut self) {
        loop {
            let pending = self.requests.drain();
            if pending.is_empty() {
                return;
            }
            for id in pending {
                let mut cx = Context::new(&mut self.state, &mut self.director, &mut self.requests);
                if let Err(err) = self.stack.add_window(id, &mut cx) {
                    tracing::warn!(window = %id, error = %err, "Dropping window request");
                }
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    pub fn stack(&self) -> &WindowStack<S> {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut WindowStack<S> {
        &mut self.stack
    }

    pub fn director(&self) -> &Director<S> {
        &self.director
    }

    pub fn director_mut(&mut self) -> &mut Director<S> {
        &mut self.director
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn total_ticks(&self) -> u64 {
        self.scheduler.total_ticks()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::ports::{FixedRandom, ManualClock};
    use crate::window::{Window, WindowKind};

    #[derive(Default)]
    struct Fort {
        first_ticks: u32,
        ticks: u32,
    }

    impl Simulation for Fort {
        type Entity = ();
        type Category = ();

        fn on_first_tick(&mut self, windows: &mut WindowRequests) {
            self.first_ticks += 1;
            windows.add(Gate::ID);
        }

        fn on_tick(&mut self, _tick: &Tick) {
            self.ticks += 1;
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum GateCommand {
        Enter,
    }

    struct Gate;

    impl WindowKind<Fort> for Gate {
        type Command = GateCommand;
        type Data = ();

        const ID: WindowId = WindowId::new("gate");

        fn create_data(_state: &Fort) {}

        fn on_window_post_create(window: &mut Window<Self, Fort>, _cx: &mut Context<'_, Fort>) {
            window.set_menu_header("Fort Kearney");
            window.add_command(GateCommand::Enter, enter, "Enter the fort");
        }
    }

    fn enter(_window: &mut Window<Gate, Fort>, _cx: &mut Context<'_, Fort>) {}

    fn engine(config: EngineConfig) -> (Engine<Fort>, ManualClock) {
        let clock = ManualClock::new(Utc::now());
        let mut engine = Engine::with_ports(
            Fort::default(),
            config,
            Box::new(clock.clone()),
            Box::new(FixedRandom(1)),
        )
        .unwrap();
        engine.register_window::<Gate>().unwrap();
        (engine, clock)
    }

    fn start(engine: &mut Engine<Fort>, clock: &ManualClock) {
        assert!(engine.pulse().is_none());
        clock.advance_millis(1000);
        assert!(engine.pulse().is_some());
    }

    #[test]
    fn first_tick_opens_requested_windows() {
        let (mut engine, clock) = engine(EngineConfig::default());

        start(&mut engine, &clock);

        assert_eq!(engine.state().first_ticks, 1);
        assert_eq!(engine.state().ticks, 1);
        assert_eq!(engine.stack().active_id(), Some(Gate::ID));
        assert_eq!(engine.render(), "/ tick 1\nFort Kearney\n1. Enter the fort\n");
    }

    #[test]
    fn empty_stack_renders_status_only() {
        let (mut engine, _clock) = engine(EngineConfig::default());
        assert_eq!(engine.render(), "| tick 0");
    }

    #[test]
    fn status_line_can_be_turned_off() {
        let (mut engine, clock) = engine(EngineConfig::default().with_status_line(false));
        start(&mut engine, &clock);

        assert_eq!(engine.render(), "Fort Kearney\n1. Enter the fort\n");
    }

    #[test]
    fn when_event_window_registered_again_then_duplicate() {
        let (mut engine, _clock) = engine(EngineConfig::default());

        let err = engine.register_window::<EventWindow>().unwrap_err();

        assert_eq!(err, EngineError::DuplicateWindow(WindowId::new("event")));
    }

    #[test]
    fn when_unknown_window_added_then_error() {
        let (mut engine, _clock) = engine(EngineConfig::default());

        let err = engine.add_window(WindowId::new("river")).unwrap_err();

        assert_eq!(err, EngineError::UnknownWindow(WindowId::new("river")));
        assert!(engine.stack().is_empty());
    }

    #[test]
    fn restart_runs_first_tick_hook_again() {
        let (mut engine, clock) = engine(EngineConfig::default());
        start(&mut engine, &clock);

        engine.restart();
        assert!(engine.stack().is_empty());
        assert_eq!(engine.total_ticks(), 0);

        start(&mut engine, &clock);
        assert_eq!(engine.state().first_ticks, 2);
        assert_eq!(engine.stack().len(), 1);
    }

    #[test]
    fn when_no_window_then_input_errors() {
        let (mut engine, _clock) = engine(EngineConfig::default());
        assert_eq!(
            engine.send_command("1").unwrap_err(),
            EngineError::NoActiveWindow
        );
    }
}
