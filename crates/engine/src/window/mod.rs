//! Windows: stack-resident interactive units.
//!
//! A window is in one of two states:
//!
//! - `Menu`: renders its numbered command list and resolves input against it.
//! - `InForm`: a form owns rendering and input exclusively; the menu is
//!   neither rendered nor consulted.
//!
//! Concrete windows are declared by implementing [`WindowKind`] on a marker
//! type. The kind names the command enum, the user data threaded through the
//! window's forms, the window id, and the lifecycle hooks. [`Window`] is the
//! generic window built from a kind; [`WindowHandle`] is the object-safe face
//! the stack stores.

mod form;
mod menu;

use std::any::Any;

pub use form::{BoxedForm, Form, Transition};
pub use menu::{Menu, MenuChoice, MenuCommand};

use crate::scheduler::Tick;
use crate::simulation::{Context, Simulation};
use crate::{EngineError, WindowId};

/// Bound action of a menu choice.
pub type MenuAction<K, S> = fn(&mut Window<K, S>, &mut Context<'_, S>);

// =============================================================================
// Window definitions
// =============================================================================

pub trait WindowKind<S: Simulation>: Sized + 'static {
    type Command: MenuCommand;
    type Data: 'static;

    const ID: WindowId;

    /// Builds the user data from the owning simulation. This is the window's
    /// single-argument constructor as seen by the factory.
    fn create_data(state: &S) -> Self::Data;

    /// Runs once after the window is pushed. Menus are normally built here.
    fn on_window_post_create(window: &mut Window<Self, S>, cx: &mut Context<'_, S>);

    /// Runs when the window becomes active again after a window above it
    /// was removed.
    fn on_window_activate(_window: &mut Window<Self, S>, _cx: &mut Context<'_, S>) {}

    /// Runs after the form was cleared and the window is back on its menu.
    /// Replacing one form with another does not count.
    fn on_form_change(_window: &mut Window<Self, S>, _cx: &mut Context<'_, S>) {}

    /// Cleanup hook, runs once when the window is flagged for removal.
    /// Detach director subscriptions here.
    fn on_window_removed(_window: &mut Window<Self, S>, _cx: &mut Context<'_, S>) {}

    /// Runs on every logical tick while the window is active, before the
    /// form's own tick.
    fn on_tick(_window: &mut Window<Self, S>, _tick: &Tick, _cx: &mut Context<'_, S>) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Menu,
    InForm,
}

/// Result of handing a line of input to a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// A menu choice matched and its action ran
    Dispatched { command: String },
    /// The active form received the input
    ForwardedToForm,
    /// Nothing happened
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Empty or whitespace-only input in menu state
    Blank,
    /// Not an index shown by the last render
    NotInMenu,
    /// The menu changed after it was last rendered
    StaleMenu,
    /// The form is not taking input right now
    FormDeclined,
    /// The window is not taking input right now
    WindowDeclined,
    /// The window is flagged for removal and waits for the next sweep
    WindowClosing,
}

// =============================================================================
// Window
// =============================================================================

pub struct Window<K: WindowKind<S>, S: Simulation> {
    data: K::Data,
    menu: Menu<K::Command, MenuAction<K, S>>,
    form: Option<BoxedForm<K::Data, S>>,
    accepts_input: bool,
    should_remove: bool,
    show_command_names: bool,
}

impl<K: WindowKind<S>, S: Simulation> Window<K, S> {
    pub fn new(state: &S) -> Self {
        Self {
            data: K::create_data(state),
            menu: Menu::new(),
            form: None,
            accepts_input: true,
            should_remove: false,
            show_command_names: false,
        }
    }

    pub fn id(&self) -> WindowId {
        K::ID
    }

    pub fn data(&self) -> &K::Data {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut K::Data {
        &mut self.data
    }

    pub fn state(&self) -> WindowState {
        if self.form.is_some() {
            WindowState::InForm
        } else {
            WindowState::Menu
        }
    }

    pub fn should_remove(&self) -> bool {
        self.should_remove
    }

    pub fn accepts_input(&self) -> bool {
        self.accepts_input
    }

    pub fn set_accepts_input(&mut self, accepts: bool) {
        self.accepts_input = accepts;
    }

    pub fn show_command_names(&self) -> bool {
        self.show_command_names
    }

    pub fn set_show_command_names(&mut self, show: bool) {
        self.show_command_names = show;
    }

    // -------------------------------------------------------------------------
    // Menu
    // -------------------------------------------------------------------------

    /// Bind `command` to `action`. Returns false if the command is already bound.
    pub fn add_command(
        &mut self,
        command: K::Command,
        action: MenuAction<K, S>,
        description: impl Into<String>,
    ) -> bool {
        self.menu.add(command, action, description)
    }

    pub fn remove_command(&mut self, command: K::Command) -> bool {
        self.menu.remove(command)
    }

    pub fn clear_commands(&mut self) {
        self.menu.clear();
    }

    pub fn commands(&self) -> Vec<K::Command> {
        self.menu.commands()
    }

    pub fn set_menu_header(&mut self, header: impl Into<String>) {
        self.menu.set_header(header);
    }

    pub fn set_menu_footer(&mut self, footer: impl Into<String>) {
        self.menu.set_footer(footer);
    }

    pub fn menu_header(&self) -> Option<&str> {
        self.menu.header()
    }

    pub fn menu_footer(&self) -> Option<&str> {
        self.menu.footer()
    }

    // -------------------------------------------------------------------------
    // Forms
    // -------------------------------------------------------------------------

    pub fn form_name(&self) -> Option<&'static str> {
        self.form.as_ref().map(|active| active.name())
    }

    pub fn current_form_is<F: 'static>(&self) -> bool {
        self.form.as_ref().is_some_and(|active| active.is::<F>())
    }

    pub fn form_accepts_input(&self) -> Option<bool> {
        self.form.as_ref().map(|active| active.form.accepts_input())
    }

    /// Replace any current form with `form` and run its post-create hook.
    pub fn set_form<F: Form<K::Data, S>>(&mut self, form: F, cx: &mut Context<'_, S>) {
        self.apply(Transition::set_form(form), cx);
    }

    /// Drop the form and go back to the menu. No-op in menu state.
    pub fn clear_form(&mut self, cx: &mut Context<'_, S>) {
        let Some(previous) = self.form.take() else {
            return;
        };
        tracing::debug!(window = %K::ID, form = previous.name(), "Form cleared");
        K::on_form_change(self, cx);
    }

    /// Apply a transition requested by a form, following chained
    /// post-create transitions until one settles.
    pub fn apply(&mut self, transition: Transition<K::Data, S>, cx: &mut Context<'_, S>) {
        let mut next = transition;
        loop {
            next = match next {
                Transition::Stay => return,
                Transition::ClearForm => {
                    self.clear_form(cx);
                    return;
                }
                Transition::CloseWindow => {
                    self.remove_window_next_tick(cx);
                    return;
                }
                Transition::SetForm(form) => {
                    if let Some(previous) = self.form.take() {
                        tracing::debug!(window = %K::ID, form = previous.name(), "Form replaced");
                    }
                    tracing::debug!(window = %K::ID, form = form.name(), "Form set");
                    let active = self.form.insert(form);
                    active.form.on_form_post_create(&mut self.data, cx)
                }
            };
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Flag the window for removal, drop its form and run the cleanup hook.
    pub fn remove_window_next_tick(&mut self, cx: &mut Context<'_, S>) {
        if self.should_remove {
            return;
        }
        self.should_remove = true;
        self.clear_form(cx);
        tracing::debug!(window = %K::ID, "Window flagged for removal");
        K::on_window_removed(self, cx);
    }

    pub fn tick(&mut self, tick: &Tick, cx: &mut Context<'_, S>) {
        if self.should_remove {
            return;
        }
        K::on_tick(self, tick, cx);

        let transition = match self.form.as_mut() {
            Some(active) => active.form.on_tick(tick, &mut self.data, cx),
            None => return,
        };
        self.apply(transition, cx);
    }

    /// Render the window and refresh the menu index snapshot. A form render
    /// shows no indices, so it leaves an empty snapshot behind.
    pub fn render(&mut self, state: &S) -> String {
        match &self.form {
            Some(active) => {
                self.menu.forget_render();
                active.form.render(&self.data, state)
            }
            None => self.menu.render(self.show_command_names),
        }
    }

    pub fn send_command(
        &mut self,
        input: &str,
        cx: &mut Context<'_, S>,
    ) -> Result<InputOutcome, EngineError> {
        if self.should_remove {
            return Ok(InputOutcome::Ignored(IgnoreReason::WindowClosing));
        }
        if !self.accepts_input {
            return Ok(InputOutcome::Ignored(IgnoreReason::WindowDeclined));
        }

        if let Some(active) = self.form.as_mut() {
            if !active.form.accepts_input() {
                return Ok(InputOutcome::Ignored(IgnoreReason::FormDeclined));
            }
            let transition = active.form.on_input(input, &mut self.data, cx);
            self.apply(transition, cx);
            return Ok(InputOutcome::ForwardedToForm);
        }

        if self.menu.is_empty() {
            return Err(EngineError::NoInputTarget(K::ID));
        }
        if input.trim().is_empty() {
            return Ok(InputOutcome::Ignored(IgnoreReason::Blank));
        }

        match self.menu.resolve(input) {
            Ok((command, action)) => {
                tracing::debug!(window = %K::ID, command = ?command, "Menu command selected");
                action(self, cx);
                Ok(InputOutcome::Dispatched {
                    command: format!("{command:?}"),
                })
            }
            Err(reason) => Ok(InputOutcome::Ignored(reason)),
        }
    }
}

// =============================================================================
// Object-safe handle
// =============================================================================

/// What the stack needs from a window without knowing its kind.
pub trait WindowHandle<S: Simulation> {
    fn id(&self) -> WindowId;
    fn should_remove(&self) -> bool;
    fn has_form(&self) -> bool;
    fn form_name(&self) -> Option<&'static str>;

    /// Window-level accept flag combined with the form's, if any. Always
    /// false once the window is flagged for removal.
    fn accepts_input(&self) -> bool;

    fn set_show_command_names(&mut self, show: bool);
    fn post_create(&mut self, cx: &mut Context<'_, S>);
    fn activate(&mut self, cx: &mut Context<'_, S>);
    fn tick(&mut self, tick: &Tick, cx: &mut Context<'_, S>);
    fn render(&mut self, state: &S) -> String;
    fn send_command(&mut self, input: &str, cx: &mut Context<'_, S>) -> Result<InputOutcome, EngineError>;
    fn remove_window_next_tick(&mut self, cx: &mut Context<'_, S>);

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<K: WindowKind<S>, S: Simulation> WindowHandle<S> for Window<K, S> {
    fn id(&self) -> WindowId {
        K::ID
    }

    fn should_remove(&self) -> bool {
        self.should_remove
    }

    fn has_form(&self) -> bool {
        self.form.is_some()
    }

    fn form_name(&self) -> Option<&'static str> {
        Window::form_name(self)
    }

    fn accepts_input(&self) -> bool {
        if self.should_remove {
            return false;
        }
        match self.form_accepts_input() {
            None => self.accepts_input,
            Some(form_accepts) => self.accepts_input && form_accepts,
        }
    }

    fn set_show_command_names(&mut self, show: bool) {
        Window::set_show_command_names(self, show);
    }

    fn post_create(&mut self, cx: &mut Context<'_, S>) {
        K::on_window_post_create(self, cx);
    }

    fn activate(&mut self, cx: &mut Context<'_, S>) {
        K::on_window_activate(self, cx);
    }

    fn tick(&mut self, tick: &Tick, cx: &mut Context<'_, S>) {
        Window::tick(self, tick, cx);
    }

    fn render(&mut self, state: &S) -> String {
        Window::render(self, state)
    }

    fn send_command(&mut self, input: &str, cx: &mut Context<'_, S>) -> Result<InputOutcome, EngineError> {
        Window::send_command(self, input, cx)
    }

    fn remove_window_next_tick(&mut self, cx: &mut Context<'_, S>) {
        Window::remove_window_next_tick(self, cx);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
