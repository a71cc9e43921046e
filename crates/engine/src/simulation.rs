//! Host contract and the per-call context handed to windows and forms.
//!
//! Windows and forms never hold references to the simulation, the director or
//! the stack. Every mutating call receives a [`Context`] instead, borrowed
//! from the engine for the duration of that call only.

use std::collections::VecDeque;
use std::fmt;
use std::hash::Hash;

use crate::director::Director;
use crate::scheduler::Tick;
use crate::WindowId;

/// The simulation the engine drives.
pub trait Simulation: 'static {
    /// Key of an entity an event can act on (a party member, the vehicle).
    type Entity: Clone + fmt::Debug + 'static;

    /// Event category used for random selection.
    type Category: Copy + Eq + Hash + fmt::Debug + 'static;

    /// Called once on the first logical tick, before any window is ticked.
    /// This is where the opening windows are requested.
    fn on_first_tick(&mut self, _windows: &mut WindowRequests) {}

    /// Called on every logical tick before the active window is ticked.
    fn on_tick(&mut self, _tick: &Tick) {}
}

/// Window additions requested from inside a tick or input callback.
///
/// The engine applies them once the callback has returned, so the stack is
/// never mutated while it is being walked.
#[derive(Debug, Default)]
pub struct WindowRequests {
    pending: VecDeque<WindowId>,
}

impl WindowRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a window to be pushed. Duplicates collapse when applied.
    pub fn add(&mut self, id: WindowId) {
        tracing::debug!(window = %id, "Window requested");
        self.pending.push_back(id);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.pending.contains(&id)
    }

    /// Take every pending request in order.
    pub fn drain(&mut self) -> Vec<WindowId> {
        self.pending.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Everything a window or form may touch while handling a tick or input.
pub struct Context<'a, S: Simulation> {
    pub state: &'a mut S,
    pub director: &'a mut Director<S>,
    pub windows: &'a mut WindowRequests,
}

impl<'a, S: Simulation> Context<'a, S> {
    pub fn new(
        state: &'a mut S,
        director: &'a mut Director<S>,
        windows: &'a mut WindowRequests,
    ) -> Self {
        Self {
            state,
            director,
            windows,
        }
    }
}
