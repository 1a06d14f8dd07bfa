//! Modal prompts that temporarily take over keyboard input.
//!
//! Each overlay owns its state, key handler and render function. Closing an
//! overlay may yield a `UserAction` for the reducer to run.

pub mod confirm_delete;
pub mod file_picker;
pub mod rename;
mod render_utils;

pub use confirm_delete::ConfirmDeleteState;
use crossterm::event::KeyEvent;
pub use file_picker::FilePickerState;
use ratatui::Frame;
use ratatui::layout::Rect;
pub use rename::RenameState;

use crate::events::UserAction;
use crate::render::Palette;

#[derive(Debug, PartialEq, Eq)]
pub enum OverlayTransition {
    Stay,
    Close,
}

/// Update returned by overlay key handlers.
#[derive(Debug)]
pub struct OverlayUpdate {
    pub transition: OverlayTransition,
    pub action: Option<UserAction>,
}

impl OverlayUpdate {
    pub fn stay() -> Self {
        Self {
            transition: OverlayTransition::Stay,
            action: None,
        }
    }

    pub fn close() -> Self {
        Self {
            transition: OverlayTransition::Close,
            action: None,
        }
    }

    #[must_use]
    pub fn with_action(mut self, action: UserAction) -> Self {
        self.action = Some(action);
        self
    }
}

#[derive(Debug)]
pub enum Overlay {
    Rename(RenameState),
    FilePicker(FilePickerState),
    ConfirmDelete(ConfirmDeleteState),
}

impl Overlay {
    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        match self {
            Overlay::Rename(state) => state.handle_key(key),
            Overlay::FilePicker(state) => state.handle_key(key),
            Overlay::ConfirmDelete(state) => state.handle_key(key),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        match self {
            Overlay::Rename(state) => state.render(frame, area, palette),
            Overlay::FilePicker(state) => state.render(frame, area, palette),
            Overlay::ConfirmDelete(state) => state.render(frame, area, palette),
        }
    }
}
