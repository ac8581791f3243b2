//! Message history list widget.

use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget, Widget},
};

use crate::domain::entities::{DeliveryStatus, HistorySnapshot};

const TIMESTAMP_FORMAT: &str = "%b %d %H:%M";

/// Scrollable view over the newest-first history snapshot.
#[derive(Debug, Default)]
pub struct HistoryList {
    snapshot: HistorySnapshot,
    state: ListState,
    focused: bool,
}

impl HistoryList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the displayed snapshot, keeping the selection on the same
    /// position when it still exists.
    pub fn set_snapshot(&mut self, snapshot: HistorySnapshot) {
        self.snapshot = snapshot;
        if let Some(selected) = self.state.selected()
            && selected >= self.snapshot.len()
        {
            self.state
                .select(self.snapshot.len().checked_sub(1));
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> &HistorySnapshot {
        &self.snapshot
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn select_next(&mut self) {
        if self.snapshot.is_empty() {
            return;
        }
        let next = self
            .state
            .selected()
            .map_or(0, |i| (i + 1).min(self.snapshot.len() - 1));
        self.state.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        if self.snapshot.is_empty() {
            return;
        }
        let previous = self.state.selected().map_or(0, |i| i.saturating_sub(1));
        self.state.select(Some(previous));
    }

    pub fn select_first(&mut self) {
        if !self.snapshot.is_empty() {
            self.state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        self.state.select(self.snapshot.len().checked_sub(1));
    }

    fn status_style(status: DeliveryStatus) -> Style {
        let color = match status {
            DeliveryStatus::Done => Color::Green,
            DeliveryStatus::Failed => Color::Red,
            DeliveryStatus::Sent => Color::Cyan,
            DeliveryStatus::Queued | DeliveryStatus::Sending => Color::Yellow,
            DeliveryStatus::Unknown => Color::DarkGray,
        };
        Style::default().fg(color)
    }
}

impl Widget for &mut HistoryList {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!("History ({})", self.snapshot.len()));

        if self.snapshot.is_empty() {
            let placeholder = List::new([ListItem::new(Line::from(Span::styled(
                "No messages yet",
                Style::default().fg(Color::DarkGray),
            )))])
            .block(block);
            Widget::render(placeholder, area, buf);
            return;
        }

        let items: Vec<ListItem<'_>> = self
            .snapshot
            .items()
            .iter()
            .map(|item| {
                let time = item
                    .effective_time()
                    .with_timezone(&Local)
                    .format(TIMESTAMP_FORMAT)
                    .to_string();

                // A history entry without a status renders as Unknown.
                let status = item.status.unwrap_or(DeliveryStatus::Unknown);
                let header = Line::from(vec![
                    Span::styled(
                        format!("{} {}", status.glyph(), status.label()),
                        HistoryList::status_style(status),
                    ),
                    Span::raw("  "),
                    Span::styled(time, Style::default().fg(Color::DarkGray)),
                    Span::raw("  "),
                    Span::styled(
                        item.recipient.clone(),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]);
                let body = Line::from(Span::raw(format!("  {}", item.content)));

                ListItem::new(vec![header, body])
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        StatefulWidget::render(list, area, buf, &mut self.state);
    }
}
