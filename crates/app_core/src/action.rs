//! Actions offered by the panel for a file

use std::fmt;

/// What an action does when triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    Open,
    Rename,
    Move,
    Copy,
    Unpack,
    ShowMetadata,
    Quit,
}

impl Effect {
    /// Stable identifier, used in logs
    pub const fn id(self) -> &'static str {
        match self {
            Effect::Open => "file.open",
            Effect::Rename => "file.rename",
            Effect::Move => "file.move_to",
            Effect::Copy => "file.copy_to",
            Effect::Unpack => "archive.unpack",
            Effect::ShowMetadata => "image.show_metadata",
            Effect::Quit => "app.quit",
        }
    }

    /// Button text shown for this effect
    pub const fn label(self) -> &'static str {
        match self {
            Effect::Open => "Open file",
            Effect::Rename => "Rename file",
            Effect::Move => "Move file",
            Effect::Copy => "Copy file",
            Effect::Unpack => "Unpack archive",
            Effect::ShowMetadata => "Show metadata",
            Effect::Quit => "Quit",
        }
    }

    /// Does triggering this effect ask for a destination directory?
    pub const fn needs_destination(self) -> bool {
        matches!(self, Effect::Move | Effect::Copy | Effect::Unpack)
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A named operation exposed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub label: &'static str,
    pub effect: Effect,
}

impl From<Effect> for ActionDescriptor {
    fn from(effect: Effect) -> Self {
        Self {
            label: effect.label(),
            effect,
        }
    }
}

/// Ordered, frozen list of actions for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSet {
    actions: Vec<ActionDescriptor>,
}

impl ActionSet {
    pub fn builder() -> ActionSetBuilder {
        ActionSetBuilder::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionDescriptor> {
        self.actions.iter()
    }

    pub fn get(&self, index: usize) -> Option<&ActionDescriptor> {
        self.actions.get(index)
    }

    pub fn contains(&self, effect: Effect) -> bool {
        self.actions.iter().any(|a| a.effect == effect)
    }

    pub fn effects(&self) -> Vec<Effect> {
        self.actions.iter().map(|a| a.effect).collect()
    }
}

/// Append-only builder; the set cannot change once built
#[derive(Debug, Default)]
pub struct ActionSetBuilder {
    actions: Vec<ActionDescriptor>,
}

impl ActionSetBuilder {
    pub fn push(mut self, action: impl Into<ActionDescriptor>) -> Self {
        self.actions.push(action.into());
        self
    }

    pub fn extend<I>(mut self, actions: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ActionDescriptor>,
    {
        self.actions.extend(actions.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> ActionSet {
        ActionSet {
            actions: self.actions,
        }
    }
}
