//! Capabilities the presentation layer provides to the core

use crate::action::Effect;
use std::path::PathBuf;

/// User-facing dialogs
pub trait Dialogs {
    /// Ask for the destination of `effect`. `None` means the user cancelled.
    fn pick_directory(&mut self, effect: Effect) -> Option<PathBuf>;

    /// Ask for a new name for `current`. `None` means the user cancelled.
    fn ask_new_name(&mut self, current: &str) -> Option<String>;
}

/// Opens links in a new browser tab; fire-and-forget
pub trait BrowserLauncher {
    fn open_url(&self, url: &str);
}
