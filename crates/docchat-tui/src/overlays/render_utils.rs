//! Shared overlay rendering.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::common::text::truncate_with_ellipsis;
use crate::features::input::TextBuffer;
use crate::render::Palette;

/// Draws a bordered popup centred in `area` and returns its inner rect.
pub fn render_popup(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    width: u16,
    height: u16,
    palette: &Palette,
) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(Style::default().bg(palette.background).fg(palette.text))
        .title(format!(" {title} "))
        .title_style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(popup);
    frame.render_widget(block, popup);
    inner
}

/// One-line editable field with a visible cursor.
pub fn render_input_line(
    frame: &mut Frame,
    area: Rect,
    buffer: &TextBuffer,
    placeholder: &str,
    palette: &Palette,
) {
    let prompt = "> ";
    let line = if buffer.text().is_empty() {
        Line::from(vec![
            Span::styled(prompt, Style::default().fg(palette.muted)),
            Span::styled(placeholder, Style::default().fg(palette.muted)),
        ])
    } else {
        let available = (area.width as usize).saturating_sub(prompt.len() + 1);
        Line::from(vec![
            Span::styled(prompt, Style::default().fg(palette.muted)),
            Span::styled(
                truncate_with_ellipsis(buffer.text(), available),
                Style::default().fg(palette.text),
            ),
        ])
    };
    frame.render_widget(Paragraph::new(line), area);

    let cursor_x = area.x + (prompt.len() + buffer.cursor()) as u16;
    if cursor_x < area.x + area.width {
        frame.set_cursor_position((cursor_x, area.y));
    }
}

/// Dim help text, or an error in the error colour.
pub fn render_help(
    frame: &mut Frame,
    area: Rect,
    help: &str,
    error: Option<&str>,
    palette: &Palette,
) {
    let span = match error {
        Some(error) => Span::styled(error.to_string(), Style::default().fg(palette.error)),
        None => Span::styled(help.to_string(), Style::default().fg(palette.muted)),
    };
    frame.render_widget(Paragraph::new(Line::from(span)), area);
}
