use crate::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Paragraph, Wrap},
    Frame,
};

pub fn footer_text(app: &App) -> &'static str {
    if app.chat.is_loading() {
        "Waiting for feedback... PgUp/PgDn scroll · Esc quit"
    } else if app.chat.log().latest_attachment().is_some() {
        "Enter send · Ctrl+S save feedback.html · Ctrl+O open · PgUp/PgDn scroll · Esc quit"
    } else {
        "Enter send · PgUp/PgDn scroll · End follow · Esc quit"
    }
}

/// Draws the footer with key hints for the current state
pub fn draw_footer(f: &mut Frame<'_>, area: Rect, app: &App) {
    let footer = Paragraph::new(footer_text(app))
        .style(Style::default().fg(Color::LightCyan))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FeedbackReply;
    use crate::config::Config;
    use tokio::sync::mpsc;

    #[test]
    fn test_hints_follow_state() {
        let (tx, _rx) = mpsc::channel(4);
        let mut app = App::new(&Config::default(), tx).unwrap();
        assert!(footer_text(&app).contains("End follow"));

        app.chat.set_input("https://github.com/a/b");
        let submission = app.chat.submit().unwrap();
        assert!(footer_text(&app).starts_with("Waiting for feedback"));

        app.settle(submission.request, Ok(FeedbackReply::File(b"x".to_vec())));
        assert!(footer_text(&app).contains("Ctrl+S"));
    }
}
