//! Built-in interrupt window.
//!
//! The director pushes this window whenever it publishes an event. The
//! window's single form takes the event out of the director's inbox, runs it
//! on the next logical tick and shows its text until the player presses
//! ENTER. Further events queued in the meantime are shown one after another
//! before the window closes itself.

use crate::director::{TriggeredEvent, EVENT_WINDOW};
use crate::scheduler::Tick;
use crate::simulation::{Context, Simulation};
use crate::window::{Form, Transition, Window, WindowKind};
use crate::WindowId;

pub const CONTINUE_PROMPT: &str = "Press ENTER to continue.";

/// Marker for the interrupt window.
pub struct EventWindow;

/// The event currently on screen.
pub struct EventData<S: Simulation> {
    current: Option<TriggeredEvent<S>>,
    shown: u32,
}

impl<S: Simulation> EventData<S> {
    pub fn current_name(&self) -> Option<&'static str> {
        self.current.as_ref().map(|triggered| triggered.event.name())
    }

    pub fn target(&self) -> Option<&S::Entity> {
        self.current.as_ref().map(|triggered| &triggered.target)
    }

    /// How many events this window has taken from the director.
    pub fn shown(&self) -> u32 {
        self.shown
    }

    fn load_next(&mut self, cx: &mut Context<'_, S>) -> bool {
        self.current = cx.director.take_triggered();
        if self.current.is_some() {
            self.shown += 1;
        }
        self.current.is_some()
    }
}

impl<S: Simulation> WindowKind<S> for EventWindow {
    type Command = ();
    type Data = EventData<S>;

    const ID: WindowId = EVENT_WINDOW;

    fn create_data(_state: &S) -> EventData<S> {
        EventData {
            current: None,
            shown: 0,
        }
    }

    fn on_window_post_create(window: &mut Window<Self, S>, cx: &mut Context<'_, S>) {
        window.set_form(EventExecutor::default(), cx);
    }
}

/// Runs the current event on a tick, then waits for ENTER.
#[derive(Debug, Default)]
pub struct EventExecutor {
    ready: bool,
}

impl<S: Simulation> Form<EventData<S>, S> for EventExecutor {
    fn on_form_post_create(&mut self, data: &mut EventData<S>, cx: &mut Context<'_, S>) -> Transition<EventData<S>, S> {
        if data.load_next(cx) {
            Transition::Stay
        } else {
            tracing::debug!("Interrupt window opened with no pending event");
            Transition::CloseWindow
        }
    }

    fn accepts_input(&self) -> bool {
        self.ready
    }

    fn render(&self, data: &EventData<S>, state: &S) -> String {
        match &data.current {
            Some(triggered) if self.ready => format!(
                "{}\n\n{CONTINUE_PROMPT}",
                triggered.event.render(&triggered.target, state)
            ),
            _ => String::new(),
        }
    }

    fn on_input(&mut self, _input: &str, data: &mut EventData<S>, cx: &mut Context<'_, S>) -> Transition<EventData<S>, S> {
        self.ready = false;
        if data.load_next(cx) {
            Transition::Stay
        } else {
            Transition::CloseWindow
        }
    }

    fn on_tick(&mut self, _tick: &Tick, data: &mut EventData<S>, cx: &mut Context<'_, S>) -> Transition<EventData<S>, S> {
        if let Some(triggered) = data.current.as_mut() {
            if !triggered.event.has_executed() {
                triggered.event.execute(&triggered.target, cx.state);
                self.ready = true;
            }
        }
        Transition::Stay
    }
}
