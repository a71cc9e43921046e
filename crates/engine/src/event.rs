//! Simulation events
//!
//! An event is a categorized unit of simulation-altering behaviour. Concrete
//! event types implement [`Event`] for their effect and text, and
//! [`RegisteredEvent`] to declare how they take part in selection:
//!
//! - `CATEGORY` groups events for random selection by category.
//! - `ELIGIBILITY` says whether the director may pick the event at random or
//!   only when it is named explicitly.
//! - `create()` builds a fully initialized instance. There is no separate
//!   post-construction hook.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Simulation;

/// Whether an event takes part in random selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    /// Picked by category rolls and by explicit request
    RandomOrManual,
    /// Only fired when requested by type or name
    ManualOnly,
}

impl Eligibility {
    pub fn is_random(&self) -> bool {
        matches!(self, Self::RandomOrManual)
    }
}

impl fmt::Display for Eligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RandomOrManual => write!(f, "random_or_manual"),
            Self::ManualOnly => write!(f, "manual_only"),
        }
    }
}

/// Effect and presentation of an event.
pub trait Event<S: Simulation>: 'static {
    /// Display name. Defaults to the concrete type's name.
    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }

    /// Apply the event to the simulation.
    fn execute(&mut self, target: &S::Entity, state: &mut S);

    /// Text shown to the player once the event has run.
    fn render(&self, target: &S::Entity, state: &S) -> String;
}

/// Startup declaration of an event type.
pub trait RegisteredEvent<S: Simulation>: Event<S> + Sized {
    const CATEGORY: S::Category;
    const ELIGIBILITY: Eligibility;

    fn create() -> Self;
}

/// A created event together with its registry metadata.
pub struct EventInstance<S: Simulation> {
    category: S::Category,
    eligibility: Eligibility,
    name: &'static str,
    event: Box<dyn Event<S>>,
    executed: bool,
}

impl<S: Simulation> EventInstance<S> {
    pub(crate) fn new(
        category: S::Category,
        eligibility: Eligibility,
        name: &'static str,
        event: Box<dyn Event<S>>,
    ) -> Self {
        Self {
            category,
            eligibility,
            name,
            event,
            executed: false,
        }
    }

    pub fn category(&self) -> S::Category {
        self.category
    }

    pub fn eligibility(&self) -> Eligibility {
        self.eligibility
    }

    /// Registered name of the concrete event type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name the event gives itself for display.
    pub fn display_name(&self) -> &'static str {
        self.event.name()
    }

    pub fn has_executed(&self) -> bool {
        self.executed
    }

    pub fn execute(&mut self, target: &S::Entity, state: &mut S) {
        tracing::debug!(event = self.name, target = ?target, "Executing event");
        self.event.execute(target, state);
        self.executed = true;
    }

    pub fn render(&self, target: &S::Entity, state: &S) -> String {
        self.event.render(target, state)
    }
}

impl<S: Simulation> fmt::Debug for EventInstance<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventInstance")
            .field("category", &self.category)
            .field("eligibility", &self.eligibility)
            .field("name", &self.name)
            .field("executed", &self.executed)
            .finish()
    }
}

/// Last path segment of a type name, without generic arguments.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
