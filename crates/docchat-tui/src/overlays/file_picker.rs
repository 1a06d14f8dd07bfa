//! File path prompt for uploads.

use std::path::PathBuf;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;

use super::OverlayUpdate;
use super::render_utils::{render_help, render_input_line, render_popup};
use crate::events::UserAction;
use crate::features::input::TextBuffer;
use crate::render::Palette;

#[derive(Debug, Clone, Default)]
pub struct FilePickerState {
    pub input: TextBuffer,
}

impl FilePickerState {
    pub fn open() -> Self {
        Self::default()
    }

    /// Every exit yields an upload action; a dismissed picker carries `None`.
    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => OverlayUpdate::close().with_action(UserAction::UploadFile(None)),
            KeyCode::Char('c') if ctrl => {
                OverlayUpdate::close().with_action(UserAction::UploadFile(None))
            }
            KeyCode::Enter => {
                let path = self.input.text().trim();
                let file = (!path.is_empty()).then(|| PathBuf::from(path));
                OverlayUpdate::close().with_action(UserAction::UploadFile(file))
            }
            _ => {
                self.input.input(key);
                OverlayUpdate::stay()
            }
        }
    }

    /// Pasted paths (e.g. dragged into the terminal) land in the prompt.
    pub fn handle_paste(&mut self, event: &Event) {
        if let Event::Paste(text) = event {
            self.input.insert_str(text.trim().trim_matches(|c| c == '\'' || c == '"'));
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let inner = render_popup(frame, area, "Upload File", 70, 5, palette);
        render_input_line(
            frame,
            Rect::new(inner.x, inner.y, inner.width, 1),
            &self.input,
            "Path to a .pdf, .docx or .txt file",
            palette,
        );
        render_help(
            frame,
            Rect::new(inner.x, inner.y + 2, inner.width, 1),
            "Enter upload · Esc cancel",
            None,
            palette,
        );
    }
}
