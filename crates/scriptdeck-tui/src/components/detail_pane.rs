use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use scriptdeck_core::Entry;
use std::sync::Arc;

/// What the viewer currently has for its script body
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerBody {
    Loading,
    Loaded(Arc<str>),
    Failed(String),
}

/// Modal viewer for one script: header, full description, then the code
#[derive(Debug, Clone)]
pub struct DetailPane {
    pub entry: Entry,
    pub body: ViewerBody,
    pub scroll: u16,
}

impl DetailPane {
    pub fn new(entry: Entry) -> Self {
        Self {
            entry,
            body: ViewerBody::Loading,
            scroll: 0,
        }
    }

    pub fn text(&self) -> Option<&Arc<str>> {
        match &self.body {
            ViewerBody::Loaded(text) => Some(text),
            _ => None,
        }
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self.line_count().saturating_sub(1);
        self.scroll = self.scroll.saturating_add(lines).min(max);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    fn line_count(&self) -> u16 {
        match &self.body {
            ViewerBody::Loaded(text) => u16::try_from(text.lines().count()).unwrap_or(u16::MAX),
            _ => 1,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = centered(area, 90, 90);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Span::styled(
                format!(" {} ", self.entry.title),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ))
            .title_bottom(Line::from(Span::styled(
                " c copy │ d download │ j/k scroll │ Esc close ",
                Style::default().fg(Color::DarkGray),
            )));

        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let description = if self.entry.description.is_empty() {
            self.entry.summary()
        } else {
            self.entry.description.as_str()
        };
        let header_height = if description.is_empty() { 2 } else { 4 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(header_height), Constraint::Min(0)])
            .split(inner);

        let mut header = vec![Line::from(vec![
            Span::styled(
                self.entry.filename.clone(),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(
                format!("  {}", self.entry.category),
                Style::default().fg(Color::DarkGray),
            ),
        ])];
        if !description.is_empty() {
            header.push(Line::from(Span::styled(
                description.to_string(),
                Style::default().fg(Color::Gray),
            )));
        }
        frame.render_widget(
            Paragraph::new(header).wrap(Wrap { trim: true }),
            chunks[0],
        );

        let body = match &self.body {
            ViewerBody::Loading => Paragraph::new(Span::styled(
                "Loading...",
                Style::default().fg(Color::DarkGray),
            )),
            ViewerBody::Failed(message) => Paragraph::new(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            )),
            ViewerBody::Loaded(text) => Paragraph::new(Text::raw(text.to_string()))
                .style(Style::default().fg(Color::White))
                .scroll((self.scroll, 0)),
        };

        frame.render_widget(
            body.block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            ),
            chunks[1],
        );
    }
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
