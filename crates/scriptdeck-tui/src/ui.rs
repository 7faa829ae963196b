//! TUI rendering logic

use crate::app::App;
use crate::components::ListPane;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use scriptdeck_core::CatalogStatus;

/// Main UI renderer
#[derive(Default)]
pub struct Ui;

impl Ui {
    pub fn new() -> Self {
        Self
    }

    /// Render the full UI
    pub fn render(&mut self, frame: &mut Frame, app: &mut App) {
        let size = frame.area();
        app.spinner.tick();

        // Nothing to show yet: full-screen loading
        if app.is_loading && app.catalog.entries().is_empty() {
            self.render_loading_screen(frame, size, app);
            app.toast_manager.render(frame, size);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Length(3), // Search bar
                Constraint::Min(0),    // List
                Constraint::Length(1), // Status bar
            ])
            .split(size);

        self.render_header(frame, chunks[0], app);
        app.search
            .render(frame, chunks[1], &app.category_label());
        self.render_list(frame, chunks[2], app);
        self.render_status_bar(frame, chunks[3], app);

        if let Some(viewer) = &app.viewer {
            viewer.render(frame, size);
        }

        app.toast_manager.render(frame, size);
    }

    fn render_loading_screen(&self, frame: &mut Frame, area: Rect, app: &App) {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Length(5),
                Constraint::Percentage(40),
            ])
            .split(area);

        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(40),
                Constraint::Percentage(30),
            ])
            .split(vertical[1]);

        let loading_area = horizontal[1];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Span::styled(
                " scriptdeck ",
                Style::default().fg(Color::Cyan).bold(),
            ));

        let inner = block.inner(loading_area);
        frame.render_widget(block, loading_area);

        let lines = vec![
            Line::from(vec![
                app.spinner.render(),
                Span::raw("  "),
                Span::styled("Loading script catalog...", Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Press 'q' to quit",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, app: &App) {
        let source = app.catalog.config().metadata_url.as_str();

        let header = Paragraph::new(Line::from(vec![
            Span::styled("◈ ", Style::default().fg(Color::Cyan)),
            Span::styled("scriptdeck", Style::default().fg(Color::White).bold()),
            Span::styled("  SAPP Lua scripts  ", Style::default().fg(Color::Gray)),
            Span::styled(source.to_string(), Style::default().fg(Color::DarkGray)),
        ]));
        frame.render_widget(header, area);
    }

    fn render_list(&self, frame: &mut Frame, area: Rect, app: &mut App) {
        let focused = !app.search.active && app.viewer.is_none();
        let title = format!("Scripts · {}", app.category_label());

        ListPane::new(
            title,
            &app.filtered,
            &app.search.query,
            &mut app.list_state,
            focused,
        )
        .render(frame, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, app: &App) {
        let status = app.catalog.status();
        let (icon, color) = match status {
            CatalogStatus::Ready { .. } => ("●", Color::Green),
            CatalogStatus::Stale { .. } => ("⚠", Color::Yellow),
            CatalogStatus::Unavailable { .. } => ("✗", Color::Red),
            CatalogStatus::NotLoaded => ("○", Color::DarkGray),
        };

        let mut spans = vec![
            Span::styled(format!(" {} ", icon), Style::default().fg(color).bold()),
            Span::styled(
                format!("{} ", app.catalog.status_message()),
                Style::default().fg(color),
            ),
        ];

        if !app.is_idle() {
            spans.push(app.spinner.render());
            spans.push(Span::raw(" "));
        }

        let hint = if app.search.active {
            "type to filter │ Enter done │ Esc clear"
        } else {
            "/ search │ Tab category │ Enter view │ c copy │ d download │ F5 reload"
        };

        spans.extend([
            Span::styled("│", Style::default().fg(Color::DarkGray)),
            Span::styled(" q", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(" quit ", Style::default().fg(Color::Gray)),
            Span::styled("│", Style::default().fg(Color::DarkGray)),
            Span::styled(format!(" {}", hint), Style::default().fg(Color::Gray)),
        ]);

        let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
        frame.render_widget(bar, area);
    }
}
