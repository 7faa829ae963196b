use super::search_bar::highlight_matches;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Wrap,
    },
    Frame,
};
use scriptdeck_core::Entry;

/// Scrollable list of script entries with the search query highlighted
pub struct ListPane<'a> {
    pub title: String,
    pub entries: &'a [Entry],
    pub query: &'a str,
    pub state: &'a mut ListState,
    pub focused: bool,
}

impl<'a> ListPane<'a> {
    pub fn new(
        title: impl Into<String>,
        entries: &'a [Entry],
        query: &'a str,
        state: &'a mut ListState,
        focused: bool,
    ) -> Self {
        Self {
            title: title.into(),
            entries,
            query,
            state,
            focused,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_color = if self.focused {
            Color::Cyan
        } else {
            Color::DarkGray
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(Span::styled(
                format!(" {} ({}) ", self.title, self.entries.len()),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));

        if self.entries.is_empty() {
            let text = if self.query.trim().is_empty() {
                "No scripts".to_string()
            } else {
                no_results_message(self.query)
            };
            let empty = Paragraph::new(Line::from(Span::styled(
                text,
                Style::default().fg(Color::DarkGray),
            )))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| entry_item(entry, self.query))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(Color::Cyan)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, area, self.state);

        // Each entry takes two rows
        let visible = (area.height as usize).saturating_sub(2) / 2;
        if self.entries.len() > visible {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));

            let scroll_area = Rect {
                x: area.x + area.width.saturating_sub(1),
                y: area.y + 1,
                width: 1,
                height: area.height.saturating_sub(2),
            };

            let mut scrollbar_state = ScrollbarState::new(self.entries.len())
                .position(self.state.selected().unwrap_or(0));

            frame.render_stateful_widget(scrollbar, scroll_area, &mut scrollbar_state);
        }
    }
}

/// `No scripts found for "<q>"`
pub fn no_results_message(query: &str) -> String {
    format!("No scripts found for \"{}\"", query.trim())
}

fn entry_item(entry: &Entry, query: &str) -> ListItem<'static> {
    let mut title = highlight_matches(&entry.title, query);
    title.push(Span::styled(
        format!("  [{}]", entry.category),
        Style::default().fg(Color::DarkGray),
    ));

    let mut detail = vec![Span::raw("   ")];
    let summary = entry.summary();
    if summary.is_empty() {
        detail.extend(highlight_matches(&entry.filename, query));
    } else {
        detail.extend(highlight_matches(summary, query));
    }

    ListItem::new(vec![
        Line::from(title),
        Line::from(detail).style(Style::default().fg(Color::Gray)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_results_message() {
        assert_eq!(no_results_message(" tag "), "No scripts found for \"tag\"");
    }

    #[test]
    fn test_entry_item_two_lines() {
        let entry = Entry {
            category: "Core".into(),
            key: "foo".into(),
            title: "Foo".into(),
            description: String::new(),
            short_description: String::new(),
            filename: "foo.lua".into(),
        };
        assert_eq!(entry_item(&entry, "").height(), 2);
    }
}
