//! View: draws `AppState` into a frame. Reads state, never mutates it.

use docchat_core::config::Theme;
use docchat_core::models::Sender;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::common::text::{sanitize_for_display, truncate_with_ellipsis, wrap_text};
use crate::features::input::InputState;
use crate::state::{AppState, Focus};

const SIDEBAR_WIDTH: u16 = 30;
const INPUT_HEIGHT: u16 = 3;
const SPINNER: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];

/// Colours for one theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub user: Color,
    pub bot: Color,
    pub error: Color,
    pub selection: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background: Color::Rgb(17, 24, 39),
                text: Color::Rgb(229, 231, 235),
                muted: Color::Rgb(107, 114, 128),
                accent: Color::Rgb(129, 140, 248),
                user: Color::Rgb(96, 165, 250),
                bot: Color::Rgb(52, 211, 153),
                error: Color::Rgb(248, 113, 113),
                selection: Color::Rgb(55, 65, 81),
            },
            Theme::Light => Self {
                background: Color::Rgb(249, 250, 251),
                text: Color::Rgb(17, 24, 39),
                muted: Color::Rgb(107, 114, 128),
                accent: Color::Rgb(79, 70, 229),
                user: Color::Rgb(37, 99, 235),
                bot: Color::Rgb(5, 150, 105),
                error: Color::Rgb(220, 38, 38),
                selection: Color::Rgb(229, 231, 235),
            },
        }
    }
}

pub fn render(app: &AppState, frame: &mut Frame) {
    let palette = Palette::for_theme(app.theme);
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
        area,
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(area);

    render_sidebar(app, frame, columns[0], &palette);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(INPUT_HEIGHT),
        ])
        .split(columns[1]);

    render_header(app, frame, rows[0], &palette);
    if app.active.is_some() {
        render_transcript(app, frame, rows[1], &palette);
    } else {
        render_welcome(frame, rows[1], &palette);
    }
    render_status(app, frame, rows[2], &palette);
    render_input(app, frame, rows[3], &palette);

    if let Some(overlay) = &app.overlay {
        overlay.render(frame, area, &palette);
    }
}

fn render_sidebar(app: &AppState, frame: &mut Frame, area: Rect, palette: &Palette) {
    let focused = app.focus == Focus::Sidebar && app.overlay.is_none();
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(if focused {
            palette.accent
        } else {
            palette.muted
        }))
        .title(Span::styled(
            " Sessions ",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let list_height = inner.height.saturating_sub(2) as usize;
    let offset = app.sidebar_cursor.saturating_sub(list_height.saturating_sub(1));

    let mut lines: Vec<Line> = Vec::new();
    if app.sessions.is_empty() {
        lines.push(Line::from(Span::styled(
            "No sessions yet",
            Style::default().fg(palette.muted),
        )));
    }
    for (index, session) in app
        .sessions
        .list()
        .iter()
        .enumerate()
        .skip(offset)
        .take(list_height)
    {
        let is_active = app.active == Some(session.id);
        let marker = if is_active { "● " } else { "  " };
        let title = truncate_with_ellipsis(&session.title, width.saturating_sub(2));
        let mut style = Style::default().fg(if is_active {
            palette.accent
        } else {
            palette.text
        });
        if focused && index == app.sidebar_cursor {
            style = style.bg(palette.selection).add_modifier(Modifier::BOLD);
        }
        lines.push(Line::from(vec![Span::raw(marker), Span::styled(title, style)]));
    }
    frame.render_widget(
        Paragraph::new(lines),
        Rect::new(inner.x, inner.y, inner.width, list_height as u16),
    );

    let footer = Line::from(Span::styled(
        truncate_with_ellipsis(&app.user.email, width),
        Style::default().fg(palette.muted),
    ));
    frame.render_widget(
        Paragraph::new(footer),
        Rect::new(inner.x, inner.y + inner.height.saturating_sub(1), inner.width, 1),
    );
}

fn render_header(app: &AppState, frame: &mut Frame, area: Rect, palette: &Palette) {
    let title = app
        .active_session()
        .map_or("docchat", |session| session.title.as_str());
    let mut lines = vec![Line::from(Span::styled(
        format!(" {}", truncate_with_ellipsis(title, area.width as usize)),
        Style::default()
            .fg(palette.text)
            .add_modifier(Modifier::BOLD),
    ))];
    if app.document.is_active() {
        lines.push(Line::from(Span::styled(
            format!(" 📄 Active Document: {}", app.document.display_name()),
            Style::default().fg(palette.accent),
        )));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_welcome(frame: &mut Frame, area: Rect, palette: &Palette) {
    let lines = vec![
        Line::from(Span::styled(
            "Welcome to docchat",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            "Ctrl+N to start a new chat, or pick a session with Tab.",
            Style::default().fg(palette.muted),
        )),
        Line::from(Span::styled(
            "Upload a document with Ctrl+O and ask questions about it.",
            Style::default().fg(palette.muted),
        )),
    ];
    let top = area.y + area.height.saturating_sub(lines.len() as u16) / 2;
    frame.render_widget(
        Paragraph::new(lines).alignment(ratatui::layout::Alignment::Center),
        Rect::new(area.x, top, area.width, area.height - (top - area.y)),
    );
}

fn transcript_lines(app: &AppState, width: usize, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let body_width = width.saturating_sub(2);
    for message in app.transcript.messages() {
        let (label, color) = match message.sender {
            Sender::User => ("You", palette.user),
            Sender::Bot => ("AI", palette.bot),
        };
        lines.push(Line::from(Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        let text = sanitize_for_display(&message.text);
        for wrapped in wrap_text(&text, body_width) {
            lines.push(Line::from(Span::styled(
                format!("  {wrapped}"),
                Style::default().fg(palette.text),
            )));
        }
        lines.push(Line::raw(""));
    }
    lines
}

fn render_transcript(app: &AppState, frame: &mut Frame, area: Rect, palette: &Palette) {
    if app.transcript.is_loading() && app.transcript.messages().is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " Loading messages…",
                Style::default().fg(palette.muted),
            ))),
            area,
        );
        return;
    }

    let mut lines = transcript_lines(app, area.width as usize, palette);
    let spinner = SPINNER[app.spinner_frame % SPINNER.len()];
    if app.is_awaiting_reply() {
        lines.push(Line::from(Span::styled(
            format!("{spinner} 🧠 AI is thinking..."),
            Style::default().fg(palette.muted),
        )));
    }
    if app.is_uploading() {
        lines.push(Line::from(Span::styled(
            format!("{spinner} 📎 Analyzing file..."),
            Style::default().fg(palette.muted),
        )));
    }

    let height = area.height as usize;
    let max_back = lines.len().saturating_sub(height);
    let back = app.transcript.scroll_back.min(max_back);
    let end = lines.len() - back;
    let start = end.saturating_sub(height);
    let visible: Vec<Line> = lines.drain(start..end).collect();
    frame.render_widget(Paragraph::new(visible), area);
}

fn render_status(app: &AppState, frame: &mut Frame, area: Rect, palette: &Palette) {
    let line = match &app.status {
        Some(status) => Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(palette.error),
        )),
        None => Line::from(Span::styled(
            " Ctrl+N new · Ctrl+O upload · Ctrl+R rename · Tab sessions · Ctrl+T theme · Ctrl+L logout · Ctrl+Q quit",
            Style::default().fg(palette.muted),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_input(app: &AppState, frame: &mut Frame, area: Rect, palette: &Palette) {
    let focused = app.focus == Focus::Input && app.overlay.is_none();
    let enabled = app.active.is_some() && !app.is_awaiting_reply();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused && enabled {
            palette.accent
        } else {
            palette.muted
        }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let buffer = &app.input.buffer;
    let line = if buffer.text().is_empty() {
        Line::from(Span::styled(
            InputState::placeholder(app.document.is_active()),
            Style::default().fg(palette.muted),
        ))
    } else {
        Line::from(Span::styled(
            truncate_with_ellipsis(buffer.text(), inner.width as usize),
            Style::default().fg(palette.text),
        ))
    };
    frame.render_widget(Paragraph::new(line), inner);

    if focused && enabled {
        let x = inner.x + (buffer.cursor() as u16).min(inner.width.saturating_sub(1));
        frame.set_cursor_position((x, inner.y));
    }
}

#[cfg(test)]
mod tests {
    use docchat_core::models::{Message, Session, SessionId, User};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::mutations::{SessionMutation, TranscriptMutation};

    fn screen(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn app() -> AppState {
        AppState::new(
            User {
                id: 1,
                email: "ada@example.com".to_string(),
            },
            Theme::Dark,
        )
    }

    #[test]
    fn test_welcome_without_session() {
        let app = app();
        let out = screen(&app);
        assert!(out.contains("Welcome to docchat"));
        assert!(out.contains("No sessions yet"));
    }

    #[test]
    fn test_active_session_shows_transcript_and_header() {
        let mut app = app();
        app.sessions
            .apply(SessionMutation::Prepend(Session::new(SessionId(1), "Plans")));
        app.active = Some(SessionId(1));
        app.transcript
            .apply(TranscriptMutation::Reset(Some(SessionId(1))));
        app.transcript.apply(TranscriptMutation::Load {
            session: SessionId(1),
            messages: vec![Message::user("Hello"), Message::bot("Hi there")],
        });

        let out = screen(&app);
        assert!(out.contains("Plans"));
        assert!(out.contains("Hello"));
        assert!(out.contains("Hi there"));
    }
}
