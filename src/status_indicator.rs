use crate::constants::SPINNER_FRAMES;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Status line under the message pane: a spinner while a review request is
/// outstanding, and the result of the last save/open action.
#[derive(Debug, Default)]
pub struct StatusIndicator {
    waiting: bool,
    outcome: Option<String>,
    spinner_idx: usize,
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_waiting(&mut self) {
        self.waiting = true;
        self.outcome = None;
    }

    pub fn stop_waiting(&mut self) {
        self.waiting = false;
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    pub fn set_outcome(&mut self, outcome: impl Into<String>) {
        self.outcome = Some(outcome.into());
    }

    pub fn outcome(&self) -> Option<&str> {
        self.outcome.as_deref()
    }

    pub fn update_spinner(&mut self) {
        self.spinner_idx = self.spinner_idx.wrapping_add(1);
    }

    pub fn spinner_frame(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_idx % SPINNER_FRAMES.len()]
    }

    /// Glyph, text and style for the current state. A save/open outcome
    /// reported mid-request wins over the busy text, the spinner keeps going.
    fn parts(&self) -> (&'static str, &str, Style) {
        let glyph = if self.waiting { self.spinner_frame() } else { " " };
        match (self.waiting, self.outcome.as_deref()) {
            (_, Some(outcome)) => (glyph, outcome, Style::default().fg(Color::Yellow)),
            (true, None) => (
                glyph,
                "Waiting for the review server...",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
            (false, None) => (glyph, "", Style::default()),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let (glyph, text, style) = self.parts();
        let line = Line::from(vec![
            Span::styled(glyph, Style::default().fg(Color::Gray)),
            Span::raw(" "),
            Span::styled(text.to_string(), style),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}
