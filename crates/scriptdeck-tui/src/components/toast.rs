//! Toast notifications for action results (copy, download, reload)

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastType {
    Success,
    Warning,
    Error,
}

impl ToastType {
    pub fn color(&self) -> Color {
        match self {
            Self::Success => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Warning => "⚠",
            Self::Error => "✗",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub toast_type: ToastType,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, toast_type: ToastType) -> Self {
        Self {
            message: message.into(),
            toast_type,
            created_at: Instant::now(),
            duration: Duration::from_secs(3),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.duration
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastType::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, ToastType::Warning)
    }

    /// Errors stay up a little longer
    pub fn error(message: impl Into<String>) -> Self {
        let mut toast = Self::new(message, ToastType::Error);
        toast.duration = Duration::from_secs(5);
        toast
    }
}

/// Stack of live toasts, newest at the bottom
#[derive(Debug, Default)]
pub struct ToastManager {
    toasts: Vec<Toast>,
}

impl ToastManager {
    const MAX_VISIBLE: usize = 3;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn clear_expired(&mut self) {
        self.toasts.retain(|t| !t.is_expired());
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.clear_expired();

        if self.toasts.is_empty() {
            return;
        }

        let skip = self.toasts.len().saturating_sub(Self::MAX_VISIBLE);
        let visible = &self.toasts[skip..];

        let toast_height: u16 = 3;
        let mut y_offset =
            area.height
                .saturating_sub(visible.len() as u16 * toast_height + 2);

        for toast in visible {
            let width = (toast.message.chars().count() + 6).min(area.width as usize) as u16;
            let x_offset = area.width.saturating_sub(width) / 2;

            let toast_area = Rect {
                x: area.x + x_offset,
                y: area.y + y_offset,
                width,
                height: toast_height,
            };

            render_single_toast(frame, toast_area, toast);

            y_offset += toast_height;
        }
    }
}

fn render_single_toast(frame: &mut Frame, area: Rect, toast: &Toast) {
    let color = toast.toast_type.color();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let content = Line::from(vec![
        Span::styled(
            format!("{} ", toast.toast_type.icon()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(toast.message.as_str(), Style::default().fg(Color::White)),
    ]);

    frame.render_widget(Paragraph::new(content).alignment(Alignment::Center), inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_toasts_are_dropped() {
        let mut manager = ToastManager::new();
        let mut old = Toast::success("Copied to clipboard");
        old.duration = Duration::ZERO;
        manager.push(old);
        manager.push(Toast::warning("Failed to load"));

        std::thread::sleep(Duration::from_millis(2));
        manager.clear_expired();

        assert_eq!(manager.len(), 1);
        assert_eq!(manager.latest().map(|t| t.toast_type), Some(ToastType::Warning));
    }

    #[test]
    fn test_error_toast_lasts_longer() {
        assert!(Toast::error("x").duration > Toast::success("x").duration);
    }
}
