//! Unified error type for the engine
//!
//! Configuration errors (duplicate registrations, unknown window ids, events
//! that were never registered) and usage errors (removing a window that is not
//! active, sending input nowhere) are both reported through [`EngineError`].
//!
//! "Nothing happened" outcomes are not errors and never show up here: a blank
//! line, a stale menu index or a category without eligible events are modelled
//! by `InputOutcome`, `TriggerOutcome` and `Option` return types instead.

use thiserror::Error;

use crate::WindowId;

/// Error type for engine operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A window kind with this id was already registered with the factory
    #[error("Window already registered: {0}")]
    DuplicateWindow(WindowId),

    /// No window kind with this id was registered with the factory
    #[error("Unknown window: {0}")]
    UnknownWindow(WindowId),

    /// An event type with this name was already registered
    #[error("Event already registered: {name}")]
    DuplicateEvent { name: &'static str },

    /// An event type was requested that is not in the registry
    #[error("Event not registered: {0}")]
    UnregisteredEvent(String),

    /// A stack operation needed an active window but the stack is empty
    #[error("Window stack is empty")]
    EmptyStack,

    /// A removal targeted a window that is not the active one
    #[error("Window {requested} is not active (active window is {active})")]
    WindowNotActive {
        requested: WindowId,
        active: WindowId,
    },

    /// Input arrived while no window was on the stack
    #[error("No active window to receive input")]
    NoActiveWindow,

    /// Input arrived for a window that has neither a form nor menu choices
    #[error("Window {0} has no form and no menu to receive input")]
    NoInputTarget(WindowId),
}

impl EngineError {
    /// Whether this error comes from startup registration rather than a
    /// runtime call.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::DuplicateWindow(_)
                | Self::UnknownWindow(_)
                | Self::DuplicateEvent { .. }
                | Self::UnregisteredEvent(_)
        )
    }
}
