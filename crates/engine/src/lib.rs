//! WolfCurses engine library.
//!
//! A stacked, text-driven window/form engine for turn-based simulations.
//!
//! ## Structure
//!
//! - `scheduler` - Turns host pulses into logical ticks
//! - `stack` - Window stack and window factory
//! - `window/` - Window/form state machine and menus
//! - `event`, `factory` - Event contract and the startup event registry
//! - `director` - Dice-gated event triggering
//! - `event_window`, `dialog` - Built-in interrupt window and dialog form
//! - `engine` - Facade the host drives
//! - `config`, `ports`, `error` - Configuration, clock/random ports, errors

pub mod config;
pub mod dialog;
pub mod director;
pub mod engine;
pub mod error;
pub mod event;
pub mod event_window;
pub mod factory;
pub mod ids;
pub mod ports;
pub mod scheduler;
pub mod simulation;
pub mod stack;
pub mod window;

pub use config::EngineConfig;
pub use dialog::{DialogForm, DialogKind, DialogResponse};
pub use director::{Director, TriggerOutcome, TriggeredEvent, EVENT_WINDOW};
pub use engine::Engine;
pub use error::EngineError;
pub use event::{Eligibility, Event, EventInstance, RegisteredEvent};
pub use event_window::EventWindow;
pub use factory::EventFactory;
pub use ids::{SubscriptionId, WindowId};
pub use ports::{ClockPort, ManualClock, RandomPort, SeededRandom, SystemClock, SystemRandom};
pub use scheduler::{Tick, TickScheduler};
pub use simulation::{Context, Simulation, WindowRequests};
pub use stack::{WindowFactory, WindowStack};
pub use window::{
    Form, IgnoreReason, InputOutcome, Transition, Window, WindowHandle, WindowKind, WindowState,
};
