use crate::constants::{BOT_ICON, LOADING_TEXT, USER_ICON};
use crate::message::{Message, MessageContent, Sender};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use textwrap::wrap;

/// Renders one log message into styled lines for the message pane.
#[derive(Debug, Clone, Copy)]
pub struct ChatMessage<'a> {
    message: &'a Message,
}

impl<'a> ChatMessage<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self { message }
    }

    pub fn render(&self, width: u16) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let base_style = base_style(self.message.sender);

        self.render_header(&mut lines, base_style);

        match &self.message.content {
            MessageContent::Text(text) => self.render_content(&mut lines, text, width, base_style),
            MessageContent::Attachment {
                filename, label, ..
            } => self.render_attachment(&mut lines, label, filename, base_style),
        }

        render_footer(&mut lines, self.indent(), base_style);
        lines
    }

    fn indent(&self) -> &'static str {
        match self.message.sender {
            Sender::User => "  ",
            Sender::Bot => "",
        }
    }

    fn render_header(&self, lines: &mut Vec<Line<'static>>, style: Style) {
        let (icon, name) = match self.message.sender {
            Sender::User => (USER_ICON, "You"),
            Sender::Bot => (BOT_ICON, "Bot"),
        };
        let timestamp = self.message.timestamp.format("%H:%M").to_string();

        lines.push(Line::from(vec![
            Span::styled(self.indent().to_string(), style),
            Span::styled("┌─".to_string(), style),
            Span::styled(format!("{} {}", icon, name), style.add_modifier(Modifier::BOLD)),
            Span::styled(" ", style),
            Span::styled(timestamp, style.add_modifier(Modifier::DIM)),
            Span::styled(
                format!(" {}", self.message.id),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    fn render_content(&self, lines: &mut Vec<Line<'static>>, text: &str, width: u16, style: Style) {
        let indent = self.indent();
        let mut in_code_block = false;
        let mut code_buffer = String::new();
        let mut text_buffer = String::new();

        for line in text.lines() {
            if line.trim().starts_with("```") {
                flush_text_buffer(lines, &text_buffer, width, style, indent);
                flush_code_buffer(lines, &code_buffer, style, indent);
                text_buffer.clear();
                code_buffer.clear();
                in_code_block = !in_code_block;
                continue;
            }

            if in_code_block {
                code_buffer.push_str(line);
                code_buffer.push('\n');
            } else {
                text_buffer.push_str(line);
                text_buffer.push('\n');
            }
        }

        flush_text_buffer(lines, &text_buffer, width, style, indent);
        flush_code_buffer(lines, &code_buffer, style, indent);
    }

    fn render_attachment(
        &self,
        lines: &mut Vec<Line<'static>>,
        label: &str,
        filename: &str,
        style: Style,
    ) {
        let indent = self.indent();
        let button = Style::default()
            .fg(Color::Black)
            .bg(Color::Rgb(0, 123, 255))
            .add_modifier(Modifier::BOLD);

        lines.push(Line::from(vec![
            Span::styled(indent.to_string(), style),
            Span::styled("│ ".to_string(), style),
            Span::styled(format!(" 📎 {} ", label), button),
            Span::styled(format!("  {}", filename), style.add_modifier(Modifier::DIM)),
        ]));
        lines.push(Line::from(vec![
            Span::styled(indent.to_string(), style),
            Span::styled("│ ".to_string(), style),
            Span::styled(
                "Ctrl+S save · Ctrl+O open".to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }
}

/// Synthetic row shown while a request is outstanding.
pub fn render_loading(spinner: &str) -> Vec<Line<'static>> {
    let style = base_style(Sender::Bot).add_modifier(Modifier::DIM);
    vec![
        Line::from(vec![
            Span::styled("┌─".to_string(), style),
            Span::styled(format!("{} Bot", BOT_ICON), style.add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("│ ".to_string(), style),
            Span::styled(format!("{} {}", spinner, LOADING_TEXT), style),
        ]),
        Line::from(Span::styled("╰─".to_string(), style)),
    ]
}

fn base_style(sender: Sender) -> Style {
    Style::default().fg(match sender {
        Sender::User => Color::Rgb(255, 223, 128),
        Sender::Bot => Color::Rgb(144, 238, 144),
    })
}

fn flush_text_buffer(
    lines: &mut Vec<Line<'static>>,
    buffer: &str,
    width: u16,
    style: Style,
    indent: &str,
) {
    let buffer = buffer.trim_end_matches('\n');
    if buffer.is_empty() {
        return;
    }

    let wrap_width = (width as usize).saturating_sub(4 + indent.len()).max(1);
    for wrapped_line in wrap(buffer, wrap_width) {
        lines.push(Line::from(vec![
            Span::styled(indent.to_string(), style),
            Span::styled("│ ".to_string(), style),
            Span::styled(wrapped_line.to_string(), style),
        ]));
    }
}

fn flush_code_buffer(lines: &mut Vec<Line<'static>>, buffer: &str, style: Style, indent: &str) {
    if buffer.is_empty() {
        return;
    }

    let code_style = Style::default()
        .fg(Color::Rgb(209, 154, 102))
        .add_modifier(Modifier::BOLD);

    for code_line in buffer.lines() {
        lines.push(Line::from(vec![
            Span::styled(indent.to_string(), style),
            Span::styled("│ ".to_string(), style),
            Span::styled("▎".to_string(), Style::default().fg(Color::DarkGray)),
            Span::styled(format!(" {}", code_line), code_style),
        ]));
    }
}

fn render_footer(lines: &mut Vec<Line<'static>>, indent: &str, style: Style) {
    lines.push(Line::from(vec![
        Span::styled(indent.to_string(), style),
        Span::styled("╰─".to_string(), style),
    ]));
}
