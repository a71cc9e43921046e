//! Window stack
//!
//! An ordered collection of windows with at most one entry per [`WindowId`].
//! The last entry is the active window: the only one ticked, rendered or
//! given input. Windows leave the stack in two phases. They flag themselves
//! with `remove_window_next_tick`, and [`WindowStack::sweep`] later removes
//! every flagged entry, working from a snapshot of the flagged ids so the
//! stack is never mutated while it is being walked.

use std::collections::HashMap;

use crate::scheduler::Tick;
use crate::simulation::{Context, Simulation};
use crate::window::{InputOutcome, Window, WindowHandle, WindowKind};
use crate::{EngineError, WindowId};

type WindowConstructor<S> = fn(&S) -> Box<dyn WindowHandle<S>>;

/// Observer called with the id of the window that just became active.
pub type ChangeObserver = Box<dyn FnMut(WindowId)>;

fn construct<K: WindowKind<S>, S: Simulation>(state: &S) -> Box<dyn WindowHandle<S>> {
    Box::new(Window::<K, S>::new(state))
}

// =============================================================================
// Window factory
// =============================================================================

/// Startup table of window kinds, keyed by id.
pub struct WindowFactory<S: Simulation> {
    constructors: HashMap<WindowId, WindowConstructor<S>>,
}

impl<S: Simulation> Default for WindowFactory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Simulation> WindowFactory<S> {
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    pub fn register<K: WindowKind<S>>(&mut self) -> Result<(), EngineError> {
        if self.constructors.contains_key(&K::ID) {
            return Err(EngineError::DuplicateWindow(K::ID));
        }
        tracing::debug!(window = %K::ID, "Registered window");
        self.constructors.insert(K::ID, construct::<K, S>);
        Ok(())
    }

    pub fn is_registered(&self, id: WindowId) -> bool {
        self.constructors.contains_key(&id)
    }

    pub fn create(&self, id: WindowId, state: &S) -> Result<Box<dyn WindowHandle<S>>, EngineError> {
        let constructor = self
            .constructors
            .get(&id)
            .ok_or(EngineError::UnknownWindow(id))?;
        Ok(constructor(state))
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

// =============================================================================
// Window stack
// =============================================================================

pub struct WindowStack<S: Simulation> {
    factory: WindowFactory<S>,
    windows: Vec<Box<dyn WindowHandle<S>>>,
    observers: Vec<ChangeObserver>,
    show_command_names: bool,
}

impl<S: Simulation> WindowStack<S> {
    pub fn new(factory: WindowFactory<S>) -> Self {
        Self {
            factory,
            windows: Vec::new(),
            observers: Vec::new(),
            show_command_names: false,
        }
    }

    pub fn factory(&self) -> &WindowFactory<S> {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut WindowFactory<S> {
        &mut self.factory
    }

    /// Applied to every window created from now on.
    pub fn set_show_command_names(&mut self, show: bool) {
        self.show_command_names = show;
    }

    pub fn on_changed(&mut self, observer: ChangeObserver) {
        self.observers.push(observer);
    }

    /// Push a new window. Returns `Ok(false)` without doing anything if a
    /// live window with this id is already on the stack. A window flagged
    /// for removal does not count: it is dropped and a fresh one is pushed.
    pub fn add_window(&mut self, id: WindowId, cx: &mut Context<'_, S>) -> Result<bool, EngineError> {
        let existing = self.windows.iter().position(|window| window.id() == id);
        if let Some(index) = existing {
            if !self.windows[index].should_remove() {
                tracing::debug!(window = %id, "Window already on stack");
                return Ok(false);
            }
        }

        let mut window = self.factory.create(id, cx.state).inspect_err(|_| {
            tracing::warn!(window = %id, "Requested window is not registered");
        })?;
        if let Some(index) = existing {
            self.windows.remove(index);
            tracing::debug!(window = %id, "Replacing window flagged for removal");
        }
        window.set_show_command_names(self.show_command_names);
        self.windows.push(window);
        tracing::debug!(window = %id, depth = self.windows.len(), "Window added");

        self.notify(id);
        if let Some(window) = self.windows.last_mut() {
            window.post_create(cx);
        }
        Ok(true)
    }

    pub fn active(&self) -> Option<&dyn WindowHandle<S>> {
        self.windows.last().map(|window| &**window)
    }

    pub fn active_mut(&mut self) -> Option<&mut (dyn WindowHandle<S> + 'static)> {
        self.windows.last_mut().map(|window| &mut **window)
    }

    pub fn active_id(&self) -> Option<WindowId> {
        self.windows.last().map(|window| window.id())
    }

    pub fn accepts_input(&self) -> bool {
        self.active().is_some_and(|window| window.accepts_input())
    }

    /// Remove every flagged window. Returns how many were removed.
    pub fn sweep(&mut self, cx: &mut Context<'_, S>) -> usize {
        let flagged: Vec<WindowId> = self
            .windows
            .iter()
            .filter(|window| window.should_remove())
            .map(|window| window.id())
            .collect();

        for &id in &flagged {
            let previous = self.active_id();
            self.windows.retain(|window| window.id() != id);
            tracing::debug!(window = %id, depth = self.windows.len(), "Window removed");

            let current = self.active_id();
            if current == previous {
                continue;
            }
            if let Some(active) = current {
                self.notify(active);
                if let Some(window) = self.windows.last_mut() {
                    window.activate(cx);
                }
            }
        }
        flagged.len()
    }

    /// Tick the active window, or sweep instead when it is flagged.
    pub fn tick_active(&mut self, tick: &Tick, cx: &mut Context<'_, S>) {
        let Some(window) = self.windows.last_mut() else {
            return;
        };
        if window.should_remove() {
            self.sweep(cx);
        } else {
            window.tick(tick, cx);
        }
    }

    /// Flag the active window and sweep it off the stack right away.
    pub fn remove_window(&mut self, id: WindowId, cx: &mut Context<'_, S>) -> Result<(), EngineError> {
        let Some(window) = self.windows.last_mut() else {
            tracing::warn!(window = %id, "Remove requested on an empty stack");
            return Err(EngineError::EmptyStack);
        };
        let active = window.id();
        if active != id {
            tracing::warn!(window = %id, active = %active, "Remove requested for inactive window");
            return Err(EngineError::WindowNotActive {
                requested: id,
                active,
            });
        }

        window.remove_window_next_tick(cx);
        self.sweep(cx);
        Ok(())
    }

    pub fn send_command(&mut self, input: &str, cx: &mut Context<'_, S>) -> Result<InputOutcome, EngineError> {
        let window = self.windows.last_mut().ok_or(EngineError::NoActiveWindow)?;
        window.send_command(input, cx)
    }

    /// Text of the active window, or nothing for an empty stack.
    pub fn render(&mut self, state: &S) -> String {
        self.windows
            .last_mut()
            .map(|window| window.render(state))
            .unwrap_or_default()
    }

    /// Drop every window without running any hooks.
    pub fn clear(&mut self) {
        tracing::debug!(depth = self.windows.len(), "Window stack cleared");
        self.windows.clear();
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.iter().any(|window| window.id() == id)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Ids from bottom to top.
    pub fn ids(&self) -> Vec<WindowId> {
        self.windows.iter().map(|window| window.id()).collect()
    }

    /// Typed access to a window on the stack.
    pub fn window<K: WindowKind<S>>(&self) -> Option<&Window<K, S>> {
        self.windows
            .iter()
            .find(|window| window.id() == K::ID)
            .and_then(|window| window.as_any().downcast_ref())
    }

    pub fn window_mut<K: WindowKind<S>>(&mut self) -> Option<&mut Window<K, S>> {
        self.windows
            .iter_mut()
            .find(|window| window.id() == K::ID)
            .and_then(|window| window.as_any_mut().downcast_mut())
    }

    fn notify(&mut self, active: WindowId) {
        for observer in self.observers.iter_mut() {
            observer(active);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::director::Director;
    use crate::factory::EventFactory;
    use crate::ports::FixedRandom;
    use crate::simulation::WindowRequests;
    use crate::window::{Form, Transition};

    #[derive(Default)]
    struct Camp {
        log: Vec<String>,
    }

    impl Simulation for Camp {
        type Entity = u8;
        type Category = ();
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum CampCommand {
        Rest,
    }

    fn rest(_window: &mut Window<MainMenu, Camp>, cx: &mut Context<'_, Camp>) {
        cx.state.log.push("rest".to_string());
    }

    macro_rules! test_window {
        ($kind:ident, $id:literal) => {
            struct $kind;

            impl WindowKind<Camp> for $kind {
                type Command = CampCommand;
                type Data = ();

                const ID: WindowId = WindowId::new($id);

                fn create_data(_state: &Camp) {}

                fn on_window_post_create(_window: &mut Window<Self, Camp>, cx: &mut Context<'_, Camp>) {
                    cx.state.log.push(format!("create {}", $id));
                }

                fn on_window_activate(_window: &mut Window<Self, Camp>, cx: &mut Context<'_, Camp>) {
                    cx.state.log.push(format!("activate {}", $id));
                }

                fn on_tick(_window: &mut Window<Self, Camp>, tick: &Tick, cx: &mut Context<'_, Camp>) {
                    cx.state.log.push(format!("tick {} {}", $id, tick.number));
                }
            }
        };
    }

    test_window!(Journal, "journal");
    test_window!(Map, "map");

    struct MainMenu;

    impl WindowKind<Camp> for MainMenu {
        type Command = CampCommand;
        type Data = ();

        const ID: WindowId = WindowId::new("main");

        fn create_data(_state: &Camp) {}

        fn on_window_post_create(window: &mut Window<Self, Camp>, _cx: &mut Context<'_, Camp>) {
            window.add_command(CampCommand::Rest, rest, "Rest");
        }
    }

    struct Sleeping;

    impl Form<(), Camp> for Sleeping {
        fn accepts_input(&self) -> bool {
            false
        }

        fn render(&self, _data: &(), _state: &Camp) -> String {
            "Zzz".to_string()
        }

        fn on_input(&mut self, _input: &str, _data: &mut (), _cx: &mut Context<'_, Camp>) -> Transition<(), Camp> {
            Transition::Stay
        }
    }

    struct Harness {
        state: Camp,
        director: Director<Camp>,
        requests: WindowRequests,
        stack: WindowStack<Camp>,
    }

    impl Harness {
        fn new() -> Self {
            let mut factory = WindowFactory::new();
            factory.register::<MainMenu>().unwrap();
            factory.register::<Journal>().unwrap();
            factory.register::<Map>().unwrap();
            Self {
                state: Camp::default(),
                director: Director::new(EventFactory::new(), Box::new(FixedRandom(1)), 100),
                requests: WindowRequests::new(),
                stack: WindowStack::new(factory),
            }
        }

        fn add(&mut self, id: &'static str) -> Result<bool, EngineError> {
            let mut cx = Context::new(&mut self.state, &mut self.director, &mut self.requests);
            self.stack.add_window(WindowId::new(id), &mut cx)
        }

        fn sweep(&mut self) -> usize {
            let mut cx = Context::new(&mut self.state, &mut self.director, &mut self.requests);
            self.stack.sweep(&mut cx)
        }

        fn flag_active(&mut self) {
            let mut cx = Context::new(&mut self.state, &mut self.director, &mut self.requests);
            self.stack.active_mut().unwrap().remove_window_next_tick(&mut cx);
        }

        fn tick(&mut self, number: u64) {
            let mut cx = Context::new(&mut self.state, &mut self.director, &mut self.requests);
            self.stack.tick_active(&Tick { number }, &mut cx);
        }

        fn remove(&mut self, id: &'static str) -> Result<(), EngineError> {
            let mut cx = Context::new(&mut self.state, &mut self.director, &mut self.requests);
            self.stack.remove_window(WindowId::new(id), &mut cx)
        }

        fn send(&mut self, input: &str) -> Result<InputOutcome, EngineError> {
            let mut cx = Context::new(&mut self.state, &mut self.director, &mut self.requests);
            self.stack.send_command(input, &mut cx)
        }
    }

    #[test]
    fn when_registered_twice_then_duplicate_window() {
        let mut factory = WindowFactory::<Camp>::new();
        factory.register::<Map>().unwrap();

        let err = factory.register::<Map>().unwrap_err();

        assert_eq!(err, EngineError::DuplicateWindow(WindowId::new("map")));
        assert_eq!(factory.len(), 1);
    }

    #[test]
    fn when_id_unknown_then_add_fails_and_stack_unchanged() {
        let mut h = Harness::new();
        h.add("map").unwrap();

        let err = h.add("river").unwrap_err();

        assert_eq!(err, EngineError::UnknownWindow(WindowId::new("river")));
        assert_eq!(h.stack.ids(), vec![WindowId::new("map")]);
    }

    #[test]
    fn when_added_twice_then_single_entry_and_active_unchanged() {
        let mut h = Harness::new();
        assert!(h.add("map").unwrap());
        assert!(h.add("journal").unwrap());

        assert!(!h.add("map").unwrap());

        assert_eq!(h.stack.len(), 2);
        assert_eq!(h.stack.active_id(), Some(WindowId::new("journal")));
        assert_eq!(h.state.log, vec!["create map", "create journal"]);
    }

    #[test]
    fn add_notifies_observers_with_new_active_id() {
        let mut h = Harness::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        h.stack.on_changed(Box::new(move |id| sink.borrow_mut().push(id)));

        h.add("map").unwrap();
        h.add("map").unwrap();

        assert_eq!(*seen.borrow(), vec![WindowId::new("map")]);
    }

    #[test]
    fn when_active_flagged_then_sweep_removes_only_it_and_notifies_once() {
        let mut h = Harness::new();
        h.add("main").unwrap();
        h.add("map").unwrap();
        h.add("journal").unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        h.stack.on_changed(Box::new(move |id| sink.borrow_mut().push(id)));

        h.flag_active();
        assert_eq!(h.sweep(), 1);

        assert_eq!(h.stack.ids(), vec![WindowId::new("main"), WindowId::new("map")]);
        assert_eq!(*seen.borrow(), vec![WindowId::new("map")]);
        assert_eq!(h.state.log.last().map(String::as_str), Some("activate map"));
    }

    #[test]
    fn when_flagged_window_is_added_again_then_fresh_one_replaces_it() {
        let mut h = Harness::new();
        h.add("map").unwrap();
        h.add("journal").unwrap();
        h.flag_active();

        assert!(h.add("journal").unwrap());

        assert_eq!(h.stack.ids(), vec![WindowId::new("map"), WindowId::new("journal")]);
        assert!(h.stack.active().is_some_and(|window| !window.should_remove()));
        assert_eq!(h.sweep(), 0);
        assert_eq!(
            h.state.log,
            vec!["create map", "create journal", "create journal"]
        );
    }

    #[test]
    fn when_add_fails_then_flagged_window_is_still_swept() {
        let mut h = Harness::new();
        h.add("map").unwrap();
        h.flag_active();

        assert!(h.add("river").is_err());

        assert_eq!(h.stack.ids(), vec![WindowId::new("map")]);
        assert_eq!(h.sweep(), 1);
    }

    #[test]
    fn when_nothing_flagged_then_sweep_is_noop() {
        let mut h = Harness::new();
        h.add("map").unwrap();

        assert_eq!(h.sweep(), 0);
        assert_eq!(h.stack.len(), 1);
    }

    #[test]
    fn when_active_flagged_then_tick_sweeps_instead_of_ticking() {
        let mut h = Harness::new();
        h.add("map").unwrap();
        h.add("journal").unwrap();

        h.tick(1);
        h.flag_active();
        h.tick(2);
        h.tick(3);

        assert_eq!(h.stack.active_id(), Some(WindowId::new("map")));
        assert_eq!(
            h.state.log,
            vec![
                "create map",
                "create journal",
                "tick journal 1",
                "activate map",
                "tick map 3",
            ]
        );
    }

    #[test]
    fn when_removing_inactive_window_then_error_and_no_change() {
        let mut h = Harness::new();
        h.add("map").unwrap();
        h.add("journal").unwrap();

        let err = h.remove("map").unwrap_err();

        assert_eq!(
            err,
            EngineError::WindowNotActive {
                requested: WindowId::new("map"),
                active: WindowId::new("journal"),
            }
        );
        assert_eq!(h.stack.len(), 2);
    }

    #[test]
    fn when_removing_from_empty_stack_then_error() {
        let mut h = Harness::new();
        assert_eq!(h.remove("map").unwrap_err(), EngineError::EmptyStack);
    }

    #[test]
    fn remove_window_removes_active_immediately() {
        let mut h = Harness::new();
        h.add("map").unwrap();
        h.add("journal").unwrap();

        h.remove("journal").unwrap();

        assert_eq!(h.stack.ids(), vec![WindowId::new("map")]);
    }

    #[test]
    fn when_stack_empty_then_input_has_no_target() {
        let mut h = Harness::new();
        assert!(!h.stack.accepts_input());
        assert_eq!(h.send("1").unwrap_err(), EngineError::NoActiveWindow);
        assert_eq!(h.stack.render(&h.state), "");
    }

    #[test]
    fn input_goes_to_active_window() {
        let mut h = Harness::new();
        h.add("main").unwrap();
        assert_eq!(h.stack.render(&h.state), "1. Rest\n");

        let outcome = h.send("1").unwrap();

        assert_eq!(
            outcome,
            InputOutcome::Dispatched {
                command: "Rest".to_string()
            }
        );
        assert_eq!(h.state.log, vec!["rest"]);
    }

    #[test]
    fn accepts_input_follows_form_when_present() {
        let mut h = Harness::new();
        h.add("main").unwrap();
        assert!(h.stack.accepts_input());

        let mut cx = Context::new(&mut h.state, &mut h.director, &mut h.requests);
        h.stack
            .window_mut::<MainMenu>()
            .unwrap()
            .set_form(Sleeping, &mut cx);

        assert!(!h.stack.accepts_input());
        assert_eq!(h.stack.active().unwrap().form_name(), Some("Sleeping"));
    }

    #[test]
    fn typed_lookup_only_matches_its_kind() {
        let mut h = Harness::new();
        h.add("main").unwrap();

        assert!(h.stack.window::<MainMenu>().is_some());
        assert!(h.stack.window::<Map>().is_none());
        assert_eq!(h.stack.window::<MainMenu>().unwrap().commands(), vec![CampCommand::Rest]);
    }

    #[test]
    fn command_names_flag_reaches_new_windows() {
        let mut h = Harness::new();
        h.stack.set_show_command_names(true);
        h.add("main").unwrap();

        assert_eq!(h.stack.render(&h.state), "1. [Rest] Rest\n");
    }
}
