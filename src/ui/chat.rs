use crate::app::App;
use crate::chat_message::{render_loading, ChatMessage};
use crate::chat_state::Entry;
use crate::constants::INPUT_PLACEHOLDER;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub fn draw_chat(f: &mut Frame<'_>, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(1),    // Messages
                Constraint::Length(1), // Status
                Constraint::Length(3), // Input
            ]
            .as_ref(),
        )
        .split(area);

    draw_messages(f, app, chunks[0]);
    app.status_indicator.render(f, chunks[1]);
    draw_input(f, app, chunks[2]);
}

/// Lines of the message pane, loading row included.
pub fn message_lines(app: &App, width: u16) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for entry in app.chat.entries() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        match entry {
            Entry::Message(message) => lines.extend(ChatMessage::new(message).render(width)),
            Entry::Loading => lines.extend(render_loading(app.status_indicator.spinner_frame())),
        }
    }
    lines
}

fn draw_messages(f: &mut Frame<'_>, app: &mut App, area: Rect) {
    let lines = message_lines(app, area.width);

    let fingerprint = app.chat.fingerprint();
    app.chat.scroll.sync(fingerprint);
    let total_lines = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let scroll = app.chat.scroll.resolve(total_lines, area.height);

    let msgs_para = Paragraph::new(lines).block(Block::default());
    f.render_widget(msgs_para.scroll((scroll, 0)), area);
}

fn draw_input(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (title, border) = if app.chat.is_loading() {
        (" Repository (waiting for review) ", Color::DarkGray)
    } else {
        (" Repository ", Color::LightBlue)
    };

    let text = if app.chat.input().is_empty() {
        Line::from(Span::styled(
            INPUT_PLACEHOLDER,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))
    } else {
        Line::from(Span::styled(
            app.chat.input().to_string(),
            Style::default().fg(Color::White),
        ))
    };

    let visible_width = area.width.saturating_sub(2);
    let text_width = u16::try_from(app.chat.input().width()).unwrap_or(u16::MAX);
    let scroll_offset = text_width.saturating_sub(visible_width.saturating_sub(1));

    let input = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(border)),
        )
        .scroll((0, scroll_offset));
    f.render_widget(input, area);

    // scroll_offset <= text_width, so the visible part is taken first
    let cursor_x = area
        .x
        .saturating_add(1)
        .saturating_add(text_width - scroll_offset);
    f.set_cursor_position((cursor_x, area.y.saturating_add(1)));
}
