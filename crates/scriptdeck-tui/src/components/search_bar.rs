use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Search-as-you-type input for the script list
pub struct SearchBar {
    /// Current search query
    pub query: String,
    /// Whether the search bar has keyboard focus
    pub active: bool,
    /// Placeholder text when empty
    pub placeholder: String,
}

impl Default for SearchBar {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchBar {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            active: false,
            placeholder: "Search by title, description or filename...".to_string(),
        }
    }

    pub fn push(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn pop(&mut self) {
        self.query.pop();
    }

    pub fn clear(&mut self) {
        self.query.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
    }

    /// Render the search bar, with the active category filter in the title
    pub fn render(&self, frame: &mut Frame, area: Rect, category: &str) {
        let (text, style) = if self.query.is_empty() {
            (
                self.placeholder.as_str(),
                Style::default().fg(Color::DarkGray),
            )
        } else {
            (self.query.as_str(), Style::default().fg(Color::White))
        };

        let border_color = if self.active {
            Color::Cyan
        } else {
            Color::DarkGray
        };

        let search_line = Line::from(vec![
            Span::styled("/ ", Style::default().fg(Color::Cyan)),
            Span::styled(text, style),
            if self.active {
                Span::styled(
                    "_",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::SLOW_BLINK),
                )
            } else {
                Span::raw("")
            },
        ]);

        let paragraph = Paragraph::new(search_line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(Line::from(vec![
                    Span::styled(
                        " Search ",
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled("│", Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        format!(" Category: {} ", category),
                        Style::default().fg(Color::Yellow),
                    ),
                ])),
        );

        frame.render_widget(paragraph, area);
    }
}

/// Highlight search matches in text with yellow background
///
/// Matching is case-insensitive. Some characters change byte length when
/// lowercased, so every lowercase byte keeps the span of the original
/// character it came from and matches are sliced out of `text` by those.
pub fn highlight_matches(text: &str, query: &str) -> Vec<Span<'static>> {
    let query = query.trim();
    if query.is_empty() {
        return vec![Span::raw(text.to_string())];
    }

    let query_lower = query.to_lowercase();
    let (text_lower, origin) = lowercase_with_origin(text);

    let mut spans = Vec::new();
    let mut last_end = 0;

    for (idx, matched) in text_lower.match_indices(&query_lower) {
        let start = origin[idx].0;
        let end = origin[idx + matched.len() - 1].1;
        if start < last_end {
            continue;
        }

        if start > last_end {
            spans.push(Span::raw(text[last_end..start].to_string()));
        }

        spans.push(Span::styled(
            text[start..end].to_string(),
            Style::default()
                .bg(Color::Yellow)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));

        last_end = end;
    }

    if last_end < text.len() {
        spans.push(Span::raw(text[last_end..].to_string()));
    }

    if spans.is_empty() {
        vec![Span::raw(text.to_string())]
    } else {
        spans
    }
}

/// Lowercase `text`, recording for each output byte the byte range of the
/// source character it came from
fn lowercase_with_origin(text: &str) -> (String, Vec<(usize, usize)>) {
    let mut lower = String::with_capacity(text.len());
    let mut origin = Vec::with_capacity(text.len());

    for (start, c) in text.char_indices() {
        let end = start + c.len_utf8();
        for l in c.to_lowercase() {
            lower.push(l);
            origin.extend(std::iter::repeat_n((start, end), l.len_utf8()));
        }
    }

    (lower, origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(spans: &[Span<'_>]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_highlight_empty_query() {
        let spans = highlight_matches("Spawn Protection", "  ");
        assert_eq!(spans.len(), 1);
    }

    #[test]
    fn test_highlight_single_match() {
        let spans = highlight_matches("Spawn Protection", "protect");
        assert_eq!(spans.len(), 3); // "Spawn " + "Protect" + "ion"
        assert_eq!(spans[1].content, "Protect");
    }

    #[test]
    fn test_highlight_multiple_matches() {
        let spans = highlight_matches("tag tag tag", "tag");
        assert_eq!(spans.len(), 5);
        assert_eq!(joined(&spans), "tag tag tag");
    }

    #[test]
    fn test_highlight_preserves_original_case() {
        let spans = highlight_matches("Mini GAMES", "games");
        assert_eq!(spans[1].content, "GAMES");
    }

    #[test]
    fn test_highlight_no_match() {
        let spans = highlight_matches("Spawn Protection", "xyz");
        assert_eq!(spans.len(), 1);
    }

    #[test]
    fn test_highlight_after_expanding_lowercase() {
        // 'İ' lowercases to two chars, shifting byte offsets
        let spans = highlight_matches("İstanbul rally", "rally");
        assert_eq!(joined(&spans), "İstanbul rally");
        assert_eq!(spans[1].content, "rally");
    }

    #[test]
    fn test_highlight_mixed_shrinking_and_growing_lowercase() {
        // Ω (U+2126) shrinks by one byte, İ grows by one: same total length
        let text = "\u{2126}\u{130} shield";
        assert_eq!(text.to_lowercase().len(), text.len());

        let spans = highlight_matches(text, "i");

        assert_eq!(joined(&spans), text);
        assert_eq!(spans[1].content, "\u{130}");
        assert_eq!(spans[3].content, "i");
    }

    #[test]
    fn test_search_bar_editing() {
        let mut bar = SearchBar::new();
        bar.push('f');
        bar.push('o');
        bar.pop();
        assert_eq!(bar.query, "f");
        bar.clear();
        assert!(bar.is_empty());
    }
}
