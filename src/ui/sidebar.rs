use crate::app::App;
use crate::config::ResponseMode;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw_sidebar(f: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(Color::DarkGray));

    let heading = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::Gray);

    let mode = match app.client().mode() {
        ResponseMode::Download => "download",
        ResponseMode::Structured => "structured",
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Code ", heading),
            Span::styled(
                "Review",
                Style::default()
                    .fg(Color::Rgb(0, 123, 255))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" Bot", heading),
        ]),
        Line::from(""),
        Line::from(Span::styled("Server", label)),
        Line::from(Span::styled(app.client().endpoint().to_string(), value)),
        Line::from(""),
        Line::from(Span::styled("Reply mode", label)),
        Line::from(Span::styled(mode, value)),
        Line::from(""),
        Line::from(Span::styled("Saves to", label)),
        Line::from(Span::styled(app.download_dir().display().to_string(), value)),
    ];

    let sidebar = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    f.render_widget(sidebar, area);
}
