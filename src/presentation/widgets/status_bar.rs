//! Status bar widget.

use chrono::{DateTime, Local, Utc};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Severity of the transient notice shown in the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational.
    Info,
    /// Success.
    Success,
    /// Error.
    Error,
}

impl NoticeLevel {
    /// Returns color for level.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Info => Color::Cyan,
            Self::Success => Color::Green,
            Self::Error => Color::Red,
        }
    }
}

/// One-line bar at the bottom of the messages screen: signed-in account on
/// the left, the current transient notice in the middle, last refresh time
/// on the right.
#[derive(Debug, Clone)]
pub struct StatusBar {
    account: String,
    notice: Option<(String, NoticeLevel)>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl StatusBar {
    /// Creates a bar for the signed-in account.
    #[must_use]
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            notice: None,
            refreshed_at: None,
        }
    }

    /// Sets the transient notice.
    #[must_use]
    pub fn notice(mut self, message: impl Into<String>, level: NoticeLevel) -> Self {
        self.notice = Some((message.into(), level));
        self
    }

    /// Sets the last successful refresh instant.
    #[must_use]
    pub const fn refreshed_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.refreshed_at = at;
        self
    }
}

impl Widget for &StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let base = Style::default().fg(Color::Gray);
        let width = area.width as usize;

        let left = &self.account;
        let right = self.refreshed_at.map_or_else(String::new, |at| {
            format!("updated {}", at.with_timezone(&Local).format("%H:%M:%S"))
        });

        let mut spans = vec![Span::styled(left.clone(), base)];

        let (center, center_style) = match &self.notice {
            Some((message, level)) => (
                message.clone(),
                Style::default()
                    .fg(level.color())
                    .add_modifier(Modifier::BOLD),
            ),
            None => (String::new(), base),
        };

        let left_len = left.chars().count();
        let center_len = center.chars().count();
        let right_len = right.chars().count();

        let center_start = width.saturating_sub(center_len) / 2;
        let left_padding = center_start.saturating_sub(left_len);
        if left_padding > 0 {
            spans.push(Span::raw(" ".repeat(left_padding)));
        }

        if !center.is_empty() {
            spans.push(Span::styled(center, center_style));
        }

        let current_len = left_len + left_padding + center_len;
        let right_padding = width
            .saturating_sub(right_len)
            .saturating_sub(current_len);
        if right_padding > 0 {
            spans.push(Span::raw(" ".repeat(right_padding)));
        }

        if !right.is_empty() {
            spans.push(Span::styled(right, base));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_levels_map_to_distinct_colors() {
        assert_ne!(NoticeLevel::Success.color(), NoticeLevel::Error.color());
        assert_ne!(NoticeLevel::Info.color(), NoticeLevel::Error.color());
    }

    #[test]
    fn test_renders_account_and_notice() {
        let bar = StatusBar::new("a@b.com").notice("Message sent", NoticeLevel::Success);
        let mut buf = Buffer::empty(Rect::new(0, 0, 40, 1));

        (&bar).render(buf.area, &mut buf);

        let rendered: String = (0..40).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert!(rendered.contains("a@b.com"));
        assert!(rendered.contains("Message sent"));
    }
}
