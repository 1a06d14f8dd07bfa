//! Rename prompt for a session.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use docchat_core::models::SessionId;
use docchat_core::title::normalize_title;
use ratatui::Frame;
use ratatui::layout::Rect;

use super::OverlayUpdate;
use super::render_utils::{render_help, render_input_line, render_popup};
use crate::events::UserAction;
use crate::features::input::TextBuffer;
use crate::render::Palette;

#[derive(Debug, Clone)]
pub struct RenameState {
    pub session_id: SessionId,
    pub current_title: String,
    pub input: TextBuffer,
    pub error: Option<String>,
}

impl RenameState {
    pub fn open(session_id: SessionId, current_title: &str) -> Self {
        Self {
            session_id,
            current_title: current_title.to_string(),
            input: TextBuffer::default(),
            error: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if !matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            self.error = None;
        }

        match key.code {
            KeyCode::Esc => OverlayUpdate::close(),
            KeyCode::Char('c') if ctrl => OverlayUpdate::close(),
            KeyCode::Enter => match normalize_title(self.input.text()) {
                Some(title) => OverlayUpdate::close().with_action(UserAction::RenameSession {
                    id: self.session_id,
                    title,
                }),
                None => {
                    self.error = Some("Title cannot be empty".to_string());
                    OverlayUpdate::stay()
                }
            },
            _ => {
                self.input.input(key);
                OverlayUpdate::stay()
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let inner = render_popup(frame, area, "Rename Session", 50, 5, palette);
        render_input_line(
            frame,
            Rect::new(inner.x, inner.y, inner.width, 1),
            &self.input,
            &self.current_title,
            palette,
        );
        render_help(
            frame,
            Rect::new(inner.x, inner.y + 2, inner.width, 1),
            "Enter save · Esc cancel",
            self.error.as_deref(),
            palette,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlays::OverlayTransition;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_blank_title_stays_open_with_error() {
        let mut state = RenameState::open(SessionId(1), "New Chat");
        state.handle_key(key(KeyCode::Char(' ')));

        let update = state.handle_key(key(KeyCode::Enter));

        assert_eq!(update.transition, OverlayTransition::Stay);
        assert!(update.action.is_none());
        assert_eq!(state.error.as_deref(), Some("Title cannot be empty"));
    }

    #[test]
    fn test_enter_submits_trimmed_title() {
        let mut state = RenameState::open(SessionId(4), "New Chat");
        for c in " Plans ".chars() {
            state.handle_key(key(KeyCode::Char(c)));
        }

        let update = state.handle_key(key(KeyCode::Enter));

        assert_eq!(update.transition, OverlayTransition::Close);
        assert_eq!(
            update.action,
            Some(UserAction::RenameSession {
                id: SessionId(4),
                title: "Plans".to_string()
            })
        );
    }
}
