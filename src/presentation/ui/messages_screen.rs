//! Messages screen: compose box over the history list.

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, StatefulWidget, Widget},
};

use crate::domain::entities::{HistorySnapshot, OutboundMessage, User};
use crate::presentation::widgets::{HistoryList, NoticeLevel, StatusBar, TextInput};

/// Which pane owns keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagesFocus {
    Compose,
    History,
}

/// Result of a key press on the messages screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagesKeyResult {
    None,
    Quit,
    Logout,
    Submit(String),
    Refresh,
}

/// Mutable state behind the messages screen.
pub struct MessagesScreenState {
    user: User,
    compose: TextInput,
    history: HistoryList,
    focus: MessagesFocus,
    sending: bool,
    notice: Option<(String, NoticeLevel)>,
    last_refreshed: Option<DateTime<Utc>>,
}

impl MessagesScreenState {
    /// Creates the screen state. `recipient` is the display form of the
    /// number every message goes to; it labels the compose box so the user
    /// can see the destination.
    #[must_use]
    pub fn new(user: User, recipient: impl Into<String>) -> Self {
        let mut compose = TextInput::new(format!("To {}", recipient.into()))
            .placeholder("Type a message...")
            .max_chars(OutboundMessage::MAX_CONTENT_CHARS);
        compose.set_focused(true);

        Self {
            user,
            compose,
            history: HistoryList::new(),
            focus: MessagesFocus::Compose,
            sending: false,
            notice: None,
            last_refreshed: None,
        }
    }

    #[must_use]
    pub const fn focus(&self) -> MessagesFocus {
        self.focus
    }

    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Replaces the history snapshot after a successful fetch.
    pub fn set_snapshot(&mut self, snapshot: HistorySnapshot) {
        self.history.set_snapshot(snapshot);
        self.last_refreshed = Some(Utc::now());
    }

    #[must_use]
    pub fn snapshot(&self) -> &HistorySnapshot {
        self.history.snapshot()
    }

    pub fn set_sending(&mut self, sending: bool) {
        self.sending = sending;
    }

    #[must_use]
    pub const fn is_sending(&self) -> bool {
        self.sending
    }

    /// Shows a transient notice in the status bar.
    pub fn set_notice(&mut self, message: impl Into<String>, level: NoticeLevel) {
        self.notice = Some((message.into(), level));
    }

    #[must_use]
    pub fn notice(&self) -> Option<&(String, NoticeLevel)> {
        self.notice.as_ref()
    }

    /// Clears the transient notice. Called on every poll tick so notices
    /// fade with the next refresh.
    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Clears only an error notice, leaving success notices (like a send
    /// confirmation) to outlive the refresh they triggered.
    pub fn clear_error_notice(&mut self) {
        if matches!(self.notice, Some((_, NoticeLevel::Error))) {
            self.notice = None;
        }
    }

    /// Clears the compose box after a successful send.
    pub fn clear_compose(&mut self) {
        self.compose.clear();
    }

    fn set_focus(&mut self, focus: MessagesFocus) {
        self.focus = focus;
        self.compose.set_focused(focus == MessagesFocus::Compose);
        self.history.set_focused(focus == MessagesFocus::History);
    }

    /// Handles key event, returns action.
    pub fn handle_key(&mut self, key: KeyEvent) -> MessagesKeyResult {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => return MessagesKeyResult::Quit,
                KeyCode::Char('d') => return MessagesKeyResult::Logout,
                KeyCode::Char('r') => return MessagesKeyResult::Refresh,
                _ => {}
            }
        }

        if key.code == KeyCode::Tab {
            let next = match self.focus {
                MessagesFocus::Compose => MessagesFocus::History,
                MessagesFocus::History => MessagesFocus::Compose,
            };
            self.set_focus(next);
            return MessagesKeyResult::None;
        }

        match self.focus {
            MessagesFocus::Compose => self.handle_compose_key(key),
            MessagesFocus::History => self.handle_history_key(key),
        }
    }

    fn handle_compose_key(&mut self, key: KeyEvent) -> MessagesKeyResult {
        match key.code {
            KeyCode::Enter => {
                let content = self.compose.value().trim().to_string();
                if !content.is_empty() && !self.sending {
                    return MessagesKeyResult::Submit(content);
                }
            }
            KeyCode::Char(c) => self.compose.input_char(c),
            KeyCode::Backspace => self.compose.backspace(),
            KeyCode::Delete => self.compose.delete(),
            KeyCode::Left => self.compose.move_left(),
            KeyCode::Right => self.compose.move_right(),
            KeyCode::Home => self.compose.move_start(),
            KeyCode::End => self.compose.move_end(),
            _ => {}
        }
        MessagesKeyResult::None
    }

    fn handle_history_key(&mut self, key: KeyEvent) -> MessagesKeyResult {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.history.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.history.select_previous(),
            KeyCode::Home | KeyCode::Char('g') => self.history.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.history.select_last(),
            KeyCode::Char('r') => return MessagesKeyResult::Refresh,
            _ => {}
        }
        MessagesKeyResult::None
    }

    fn counter_line(&self) -> Line<'static> {
        let used = self.compose.char_count();
        let max = OutboundMessage::MAX_CONTENT_CHARS;
        let style = if used >= max {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let hint = if self.sending {
            "Sending...  "
        } else {
            "Enter: Send | Tab: History | Ctrl+R: Refresh | Ctrl+D: Logout  "
        };

        Line::from(vec![
            Span::styled(hint, Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{used}/{max}"), style),
        ])
    }
}

/// Stateless renderer over [`MessagesScreenState`].
pub struct MessagesScreen;

impl MessagesScreen {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for MessagesScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl StatefulWidget for MessagesScreen {
    type State = MessagesScreenState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let layout = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ]);
        let [history_area, compose_area, counter_area, status_area] = layout.areas(area);

        (&mut state.history).render(history_area, buf);
        (&state.compose).render(compose_area, buf);
        Paragraph::new(state.counter_line()).render(counter_area, buf);

        let mut bar = StatusBar::new(state.user.email().to_string())
            .refreshed_at(state.last_refreshed);
        if let Some((message, level)) = &state.notice {
            bar = bar.notice(message.clone(), *level);
        }
        (&bar).render(status_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::domain::entities::{DeliveryStatus, MessageHistoryItem};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn state() -> MessagesScreenState {
        MessagesScreenState::new(User::new("1", "a@b.com"), "+1 (877) 780-4236")
    }

    fn history_item(id: &str) -> MessageHistoryItem {
        MessageHistoryItem {
            id: id.to_string(),
            content: "hello".to_string(),
            sender: "web-app".to_string(),
            recipient: "+18777804236".to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 8, 20, 10, 0, 0).unwrap(),
            created_at: None,
            updated_at: None,
            status: Some(DeliveryStatus::Queued),
            user_id: None,
        }
    }

    #[test]
    fn test_submit_trims_content() {
        let mut state = state();
        for c in "  hi  ".chars() {
            state.handle_key(key(KeyCode::Char(c)));
        }

        assert_eq!(
            state.handle_key(key(KeyCode::Enter)),
            MessagesKeyResult::Submit("hi".to_string())
        );
    }

    #[test]
    fn test_blank_submit_is_ignored() {
        let mut state = state();
        state.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(state.handle_key(key(KeyCode::Enter)), MessagesKeyResult::None);
    }

    #[test]
    fn test_submit_blocked_while_sending() {
        let mut state = state();
        state.handle_key(key(KeyCode::Char('x')));
        state.set_sending(true);
        assert_eq!(state.handle_key(key(KeyCode::Enter)), MessagesKeyResult::None);
    }

    #[test]
    fn test_tab_toggles_focus() {
        let mut state = state();
        assert_eq!(state.focus(), MessagesFocus::Compose);

        state.handle_key(key(KeyCode::Tab));
        assert_eq!(state.focus(), MessagesFocus::History);

        state.handle_key(key(KeyCode::Tab));
        assert_eq!(state.focus(), MessagesFocus::Compose);
    }

    #[test]
    fn test_refresh_from_history_pane() {
        let mut state = state();
        state.handle_key(key(KeyCode::Tab));
        assert_eq!(
            state.handle_key(key(KeyCode::Char('r'))),
            MessagesKeyResult::Refresh
        );
    }

    #[test]
    fn test_r_types_into_compose() {
        let mut state = state();
        state.handle_key(key(KeyCode::Char('r')));
        assert_eq!(state.compose.value(), "r");
    }

    #[test]
    fn test_control_shortcuts() {
        let mut state = state();
        assert_eq!(state.handle_key(ctrl('c')), MessagesKeyResult::Quit);
        assert_eq!(state.handle_key(ctrl('d')), MessagesKeyResult::Logout);
        assert_eq!(state.handle_key(ctrl('r')), MessagesKeyResult::Refresh);
    }

    #[test]
    fn test_compose_box_shows_recipient() {
        let mut state = state();
        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);

        MessagesScreen::new().render(area, &mut buf, &mut state);

        let rendered: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|pos| buf[pos].symbol().to_string())
            .collect();
        assert!(rendered.contains("To +1 (877) 780-4236"));
    }

    #[test]
    fn test_snapshot_updates_refresh_time() {
        let mut state = state();
        assert!(state.last_refreshed.is_none());

        state.set_snapshot(HistorySnapshot::from_fetch(vec![history_item("a")]));
        assert!(state.last_refreshed.is_some());
        assert_eq!(state.snapshot().len(), 1);
    }
}
