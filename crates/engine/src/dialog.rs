//! Reusable prompt and yes/no form.

use std::fmt;

use crate::simulation::{Context, Simulation};
use crate::window::{Form, Transition};

/// Called with the player's answer; returns what the window should do next.
pub type DialogCallback<D, S> = fn(DialogResponse, &mut D, &mut Context<'_, S>) -> Transition<D, S>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    /// Any line continues
    Prompt,
    /// Only yes or no answers are taken
    YesNo,
}

impl DialogKind {
    fn hint(&self) -> &'static str {
        match self {
            Self::Prompt => "Press ENTER to continue.",
            Self::YesNo => "Y/N?",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResponse {
    Continue,
    Yes,
    No,
}

impl DialogResponse {
    /// Interpret a line of input for `kind`. `None` means ask again.
    pub fn parse(kind: DialogKind, input: &str) -> Option<Self> {
        match kind {
            DialogKind::Prompt => Some(Self::Continue),
            DialogKind::YesNo => match input.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => Some(Self::Yes),
                "n" | "no" => Some(Self::No),
                _ => None,
            },
        }
    }
}

pub struct DialogForm<D, S: Simulation> {
    kind: DialogKind,
    text: String,
    on_response: DialogCallback<D, S>,
}

impl<D, S: Simulation> DialogForm<D, S> {
    pub fn prompt(text: impl Into<String>, on_response: DialogCallback<D, S>) -> Self {
        Self {
            kind: DialogKind::Prompt,
            text: text.into(),
            on_response,
        }
    }

    pub fn yes_no(text: impl Into<String>, on_response: DialogCallback<D, S>) -> Self {
        Self {
            kind: DialogKind::YesNo,
            text: text.into(),
            on_response,
        }
    }

    pub fn kind(&self) -> DialogKind {
        self.kind
    }
}

impl<D, S: Simulation> fmt::Debug for DialogForm<D, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogForm")
            .field("kind", &self.kind)
            .field("text", &self.text)
            .finish()
    }
}

impl<D: 'static, S: Simulation> Form<D, S> for DialogForm<D, S> {
    fn render(&self, _data: &D, _state: &S) -> String {
        format!("{}\n\n{}", self.text, self.kind.hint())
    }

    fn on_input(&mut self, input: &str, data: &mut D, cx: &mut Context<'_, S>) -> Transition<D, S> {
        match DialogResponse::parse(self.kind, input) {
            Some(response) => (self.on_response)(response, data, cx),
            None => Transition::Stay,
        }
    }
}
