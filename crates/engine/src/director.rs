//! Event director
//!
//! The director decides *whether* and *which* event fires; it never runs an
//! event. On a hit it asks the stack (through [`WindowRequests`]) for the
//! interrupt window, tells its observers, and parks the instance in an inbox
//! until the interrupt window takes it. Executing and rendering the event is
//! up to that window's form, which is how the window controls pacing.
//!
//! A category roll that hits but finds no eligible event in the category is
//! discarded without error: nothing is queued and no observer is called.

use std::collections::VecDeque;

use crate::event::{EventInstance, RegisteredEvent};
use crate::factory::EventFactory;
use crate::ports::RandomPort;
use crate::simulation::{Simulation, WindowRequests};
use crate::{EngineError, SubscriptionId, WindowId};

/// Id of the built-in interrupt window.
pub const EVENT_WINDOW: WindowId = WindowId::new("event");

/// Observer called with every published event.
pub type EventObserver<S> =
    Box<dyn FnMut(&<S as Simulation>::Entity, &EventInstance<S>)>;

/// Outcome of a category roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The dice did not come up
    Missed,
    /// The dice came up but the category has no random-eligible events
    NoEligibleEvent,
    /// An event was selected and published
    Triggered { name: &'static str },
}

impl TriggerOutcome {
    pub fn is_triggered(&self) -> bool {
        matches!(self, Self::Triggered { .. })
    }
}

/// An event waiting for the interrupt window.
pub struct TriggeredEvent<S: Simulation> {
    pub target: S::Entity,
    pub event: EventInstance<S>,
}

pub struct Director<S: Simulation> {
    factory: EventFactory<S>,
    rng: Box<dyn RandomPort>,
    roll_sides: u32,
    interrupt_window: WindowId,
    observers: Vec<(SubscriptionId, EventObserver<S>)>,
    next_subscription: u64,
    inbox: VecDeque<TriggeredEvent<S>>,
}

impl<S: Simulation> Director<S> {
    pub fn new(factory: EventFactory<S>, rng: Box<dyn RandomPort>, roll_sides: u32) -> Self {
        Self {
            factory,
            rng,
            roll_sides: roll_sides.max(1),
            interrupt_window: EVENT_WINDOW,
            observers: Vec::new(),
            next_subscription: 0,
            inbox: VecDeque::new(),
        }
    }

    /// Use a different window as the interrupt window.
    pub fn with_interrupt_window(mut self, id: WindowId) -> Self {
        self.interrupt_window = id;
        self
    }

    pub fn interrupt_window(&self) -> WindowId {
        self.interrupt_window
    }

    pub fn factory(&self) -> &EventFactory<S> {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut EventFactory<S> {
        &mut self.factory
    }

    pub fn roll_sides(&self) -> u32 {
        self.roll_sides
    }

    // -------------------------------------------------------------------------
    // Triggering
    // -------------------------------------------------------------------------

    /// Roll for a random event of `category` against `target`.
    pub fn trigger_event_by_type(
        &mut self,
        windows: &mut WindowRequests,
        target: S::Entity,
        category: S::Category,
    ) -> TriggerOutcome {
        let roll = self.rng.gen_range(0, self.roll_sides - 1);
        if roll != 0 {
            return TriggerOutcome::Missed;
        }

        let Some(event) = self.factory.create_random_by_type(category, self.rng.as_mut()) else {
            tracing::debug!(category = ?category, "Event roll hit an empty category");
            return TriggerOutcome::NoEligibleEvent;
        };

        let name = event.name();
        self.execute_event(windows, target, event);
        TriggerOutcome::Triggered { name }
    }

    /// Fire a specific event type, skipping the dice.
    pub fn trigger_event<E: RegisteredEvent<S>>(
        &mut self,
        windows: &mut WindowRequests,
        target: S::Entity,
    ) -> Result<(), EngineError> {
        let event = self.factory.create_instance::<E>()?;
        self.execute_event(windows, target, event);
        Ok(())
    }

    /// Fire an event by registered name, skipping the dice.
    pub fn trigger_event_named(
        &mut self,
        windows: &mut WindowRequests,
        target: S::Entity,
        name: &str,
    ) -> Result<(), EngineError> {
        let event = self.factory.create_by_name(name)?;
        self.execute_event(windows, target, event);
        Ok(())
    }

    /// Request the interrupt window and publish the event.
    pub fn execute_event(
        &mut self,
        windows: &mut WindowRequests,
        target: S::Entity,
        event: EventInstance<S>,
    ) {
        tracing::info!(
            event = event.name(),
            category = ?event.category(),
            target = ?target,
            "Event triggered"
        );

        windows.add(self.interrupt_window);
        for (_, observer) in self.observers.iter_mut() {
            observer(&target, &event);
        }
        self.inbox.push_back(TriggeredEvent { target, event });
    }

    // -------------------------------------------------------------------------
    // Delivery
    // -------------------------------------------------------------------------

    /// Hand the oldest published event to the caller.
    pub fn take_triggered(&mut self) -> Option<TriggeredEvent<S>> {
        self.inbox.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.inbox.len()
    }

    pub fn clear_pending(&mut self) {
        self.inbox.clear();
    }

    pub fn subscribe(&mut self, observer: EventObserver<S>) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }
}
