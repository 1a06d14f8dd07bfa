//! Delete confirmation.

use crossterm::event::{KeyCode, KeyEvent};
use docchat_core::models::SessionId;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Wrap};

use super::OverlayUpdate;
use super::render_utils::{render_help, render_popup};
use crate::events::UserAction;
use crate::render::Palette;

#[derive(Debug, Clone)]
pub struct ConfirmDeleteState {
    pub session_id: SessionId,
    pub title: String,
}

impl ConfirmDeleteState {
    pub fn open(session_id: SessionId, title: &str) -> Self {
        Self {
            session_id,
            title: title.to_string(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => {
                OverlayUpdate::close().with_action(UserAction::DeleteSession(self.session_id))
            }
            KeyCode::Char('n' | 'N') | KeyCode::Esc => OverlayUpdate::close(),
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let inner = render_popup(frame, area, "Delete Session", 50, 6, palette);
        frame.render_widget(
            Paragraph::new(Line::from(format!("Delete \"{}\"?", self.title)))
                .wrap(Wrap { trim: true }),
            Rect::new(inner.x, inner.y, inner.width, 2),
        );
        render_help(
            frame,
            Rect::new(inner.x, inner.y + 3, inner.width, 1),
            "y delete · n cancel",
            None,
            palette,
        );
    }
}
