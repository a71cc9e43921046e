//! Forms: single steps of a multi-step interaction inside one window.
//!
//! A form is owned by exactly one window and dies with it. It never holds a
//! reference back to that window; instead every hook returns a
//! [`Transition`] which the window applies once the hook has returned.

use std::any::TypeId;

use crate::event::short_type_name;
use crate::scheduler::Tick;
use crate::simulation::{Context, Simulation};

pub trait Form<D, S: Simulation>: 'static {
    /// Runs once, right after the window installs the form.
    fn on_form_post_create(&mut self, _data: &mut D, _cx: &mut Context<'_, S>) -> Transition<D, S> {
        Transition::Stay
    }

    fn accepts_input(&self) -> bool {
        true
    }

    fn render(&self, data: &D, state: &S) -> String;

    fn on_input(&mut self, input: &str, data: &mut D, cx: &mut Context<'_, S>) -> Transition<D, S>;

    fn on_tick(&mut self, _tick: &Tick, _data: &mut D, _cx: &mut Context<'_, S>) -> Transition<D, S> {
        Transition::Stay
    }
}

/// What the owning window should do after a form hook returns.
pub enum Transition<D, S: Simulation> {
    Stay,
    /// Replace the current form with another one.
    SetForm(BoxedForm<D, S>),
    /// Drop the form and return to the window's menu.
    ClearForm,
    /// Flag the owning window for removal on the next tick.
    CloseWindow,
}

impl<D: 'static, S: Simulation> Transition<D, S> {
    pub fn set_form<F: Form<D, S>>(form: F) -> Self {
        Self::SetForm(BoxedForm::new(form))
    }

    pub fn is_stay(&self) -> bool {
        matches!(self, Self::Stay)
    }
}

/// A form together with the identity of its concrete type.
pub struct BoxedForm<D, S: Simulation> {
    type_id: TypeId,
    name: &'static str,
    pub(crate) form: Box<dyn Form<D, S>>,
}

impl<D: 'static, S: Simulation> BoxedForm<D, S> {
    pub fn new<F: Form<D, S>>(form: F) -> Self {
        Self {
            type_id: TypeId::of::<F>(),
            name: short_type_name::<F>(),
            form: Box::new(form),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<F: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<F>()
    }
}
