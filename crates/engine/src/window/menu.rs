//! Menu of commands bound to actions.
//!
//! Indices are never stored on a choice. Each render numbers the choices in
//! order and keeps that numbering as a snapshot stamped with the menu's
//! generation; input is resolved against the snapshot. Adding or clearing
//! commands bumps the generation, so an index typed against an older render
//! is reported as stale instead of firing whatever now sits at that position.

use std::fmt::{self, Write as _};

use super::IgnoreReason;

/// Commands are plain enums; the `Debug` text is the command name.
pub trait MenuCommand: Copy + Eq + fmt::Debug + 'static {}

impl<T: Copy + Eq + fmt::Debug + 'static> MenuCommand for T {}

pub struct MenuChoice<C, A> {
    pub command: C,
    pub action: A,
    pub description: String,
}

impl<C: PartialEq, A> PartialEq for MenuChoice<C, A> {
    fn eq(&self, other: &Self) -> bool {
        self.command == other.command
    }
}

struct RenderedMenu<C> {
    generation: u64,
    commands: Vec<C>,
}

pub struct Menu<C, A> {
    choices: Vec<MenuChoice<C, A>>,
    header: Option<String>,
    footer: Option<String>,
    generation: u64,
    rendered: Option<RenderedMenu<C>>,
}

impl<C: MenuCommand, A: Copy> Default for Menu<C, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: MenuCommand, A: Copy> Menu<C, A> {
    pub fn new() -> Self {
        Self {
            choices: Vec::new(),
            header: None,
            footer: None,
            generation: 0,
            rendered: None,
        }
    }

    /// Returns false when `command` is already on the menu.
    pub fn add(&mut self, command: C, action: A, description: impl Into<String>) -> bool {
        if self.contains(command) {
            return false;
        }
        self.choices.push(MenuChoice {
            command,
            action,
            description: description.into(),
        });
        self.generation += 1;
        true
    }

    pub fn remove(&mut self, command: C) -> bool {
        let before = self.choices.len();
        self.choices.retain(|choice| choice.command != command);
        let removed = self.choices.len() != before;
        if removed {
            self.generation += 1;
        }
        removed
    }

    pub fn clear(&mut self) {
        if !self.choices.is_empty() {
            self.choices.clear();
            self.generation += 1;
        }
    }

    pub fn contains(&self, command: C) -> bool {
        self.choices.iter().any(|choice| choice.command == command)
    }

    pub fn commands(&self) -> Vec<C> {
        self.choices.iter().map(|choice| choice.command).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn set_header(&mut self, header: impl Into<String>) {
        self.header = Some(header.into());
    }

    pub fn footer(&self) -> Option<&str> {
        self.footer.as_deref()
    }

    pub fn set_footer(&mut self, footer: impl Into<String>) {
        self.footer = Some(footer.into());
    }

    /// Render the menu and refresh the index snapshot.
    ///
    /// An empty menu renders nothing at all, header and footer included.
    pub fn render(&mut self, show_command_names: bool) -> String {
        self.rendered = Some(RenderedMenu {
            generation: self.generation,
            commands: self.commands(),
        });

        if self.choices.is_empty() {
            return String::new();
        }

        let mut out = String::new();
        if let Some(header) = &self.header {
            let _ = writeln!(out, "{header}");
        }
        for (index, choice) in self.choices.iter().enumerate() {
            if show_command_names {
                let _ = writeln!(
                    out,
                    "{}. [{:?}] {}",
                    index + 1,
                    choice.command,
                    choice.description
                );
            } else {
                let _ = writeln!(out, "{}. {}", index + 1, choice.description);
            }
        }
        if let Some(footer) = &self.footer {
            let _ = writeln!(out, "{footer}");
        }
        out
    }

    /// Drop the index snapshot, as if nothing was rendered yet.
    pub fn forget_render(&mut self) {
        self.rendered = None;
    }

    /// Resolve a typed index against the last render.
    pub fn resolve(&self, input: &str) -> Result<(C, A), IgnoreReason> {
        let Some(rendered) = &self.rendered else {
            return Err(IgnoreReason::NotInMenu);
        };
        let index: usize = input.trim().parse().map_err(|_| IgnoreReason::NotInMenu)?;
        let command = index
            .checked_sub(1)
            .and_then(|i| rendered.commands.get(i))
            .copied()
            .ok_or(IgnoreReason::NotInMenu)?;

        if rendered.generation != self.generation {
            return Err(IgnoreReason::StaleMenu);
        }

        self.choices
            .iter()
            .find(|choice| choice.command == command)
            .map(|choice| (choice.command, choice.action))
            .ok_or(IgnoreReason::StaleMenu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum StoreCommand {
        BuyFood,
        BuyClothing,
        Leave,
    }

    type TestMenu = Menu<StoreCommand, u8>;

    fn store_menu() -> TestMenu {
        let mut menu = TestMenu::new();
        menu.add(StoreCommand::BuyFood, 1, "Buy food");
        menu.add(StoreCommand::BuyClothing, 2, "Buy clothing");
        menu.add(StoreCommand::Leave, 3, "Leave store");
        menu
    }

    #[test]
    fn when_duplicate_added_then_ignored() {
        let mut menu = store_menu();
        assert!(!menu.add(StoreCommand::Leave, 9, "Leave again"));
        assert_eq!(menu.len(), 3);
    }

    #[test]
    fn renders_numbered_choices_between_header_and_footer() {
        let mut menu = store_menu();
        menu.set_header("Matt's General Store");
        menu.set_footer("Which item would you like to buy?");

        let text = menu.render(false);
        assert_eq!(
            text,
            "Matt's General Store\n1. Buy food\n2. Buy clothing\n3. Leave store\nWhich item would you like to buy?\n"
        );
    }

    #[test]
    fn renders_command_names_when_enabled() {
        let mut menu = store_menu();
        let text = menu.render(true);
        assert!(text.contains("2. [BuyClothing] Buy clothing"));
    }

    #[test]
    fn when_empty_then_renders_nothing() {
        let mut menu = TestMenu::new();
        menu.set_header("header");
        menu.set_footer("footer");
        assert_eq!(menu.render(true), "");
    }

    #[test]
    fn when_rendered_then_index_resolves() {
        let mut menu = store_menu();
        menu.render(false);
        assert_eq!(menu.resolve("2"), Ok((StoreCommand::BuyClothing, 2)));
        assert_eq!(menu.resolve(" 3 "), Ok((StoreCommand::Leave, 3)));
    }

    #[test]
    fn when_not_rendered_then_not_in_menu() {
        let menu = store_menu();
        assert_eq!(menu.resolve("1"), Err(IgnoreReason::NotInMenu));
    }

    #[test]
    fn when_index_out_of_range_then_not_in_menu() {
        let mut menu = store_menu();
        menu.render(false);
        assert_eq!(menu.resolve("0"), Err(IgnoreReason::NotInMenu));
        assert_eq!(menu.resolve("4"), Err(IgnoreReason::NotInMenu));
        assert_eq!(menu.resolve("food"), Err(IgnoreReason::NotInMenu));
    }

    #[test]
    fn when_menu_changes_after_render_then_stale() {
        let mut menu = store_menu();
        menu.render(false);
        menu.remove(StoreCommand::BuyFood);

        assert_eq!(menu.resolve("1"), Err(IgnoreReason::StaleMenu));

        menu.render(false);
        assert_eq!(menu.resolve("1"), Ok((StoreCommand::BuyClothing, 2)));
    }
}
