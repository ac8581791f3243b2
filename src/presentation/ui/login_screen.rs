//! Login screen.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::application::Credentials;
use crate::presentation::widgets::TextInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Input,
    Submitting,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Email,
    Password,
}

/// Result of a key press on the login screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAction {
    None,
    Submit,
}

/// Login screen UI.
pub struct LoginScreen {
    email_input: TextInput,
    password_input: TextInput,
    focus: Field,
    state: LoginState,
    error_message: Option<String>,
}

impl LoginScreen {
    /// Creates new login screen.
    #[must_use]
    pub fn new() -> Self {
        let mut email_input = TextInput::new("Email").placeholder("you@example.com");
        email_input.set_focused(true);
        let password_input = TextInput::new("Password").password();

        Self {
            email_input,
            password_input,
            focus: Field::Email,
            state: LoginState::Input,
            error_message: None,
        }
    }

    /// Returns current state.
    #[must_use]
    pub const fn state(&self) -> LoginState {
        self.state
    }

    /// Returns the entered credentials, once both fields are filled.
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        if self.email_input.value().is_empty() || self.password_input.value().is_empty() {
            return None;
        }
        Some(Credentials::new(
            self.email_input.value(),
            self.password_input.value(),
        ))
    }

    /// Sets submitting state.
    pub fn set_submitting(&mut self) {
        self.state = LoginState::Submitting;
        self.error_message = None;
    }

    /// Sets error state.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.state = LoginState::Error;
        self.error_message = Some(message.into());
    }

    /// Resets to input state, clearing the password.
    pub fn reset(&mut self) {
        self.state = LoginState::Input;
        self.error_message = None;
        self.password_input.clear();
        self.set_focus(Field::Password);
    }

    fn set_focus(&mut self, field: Field) {
        self.focus = field;
        self.email_input.set_focused(field == Field::Email);
        self.password_input.set_focused(field == Field::Password);
    }

    fn focused_input(&mut self) -> &mut TextInput {
        match self.focus {
            Field::Email => &mut self.email_input,
            Field::Password => &mut self.password_input,
        }
    }

    /// Handles key event, returns action.
    pub fn handle_key(&mut self, key: KeyEvent) -> LoginAction {
        if self.state == LoginState::Submitting {
            return LoginAction::None;
        }

        if self.state == LoginState::Error {
            self.state = LoginState::Input;
            self.error_message = None;
        }

        match key.code {
            KeyCode::Enter => {
                if self.credentials().is_some() {
                    return LoginAction::Submit;
                }
                // Jump to whichever field is still blank.
                if self.email_input.value().is_empty() {
                    self.set_focus(Field::Email);
                } else {
                    self.set_focus(Field::Password);
                }
            }
            KeyCode::Tab | KeyCode::Down => {
                let next = match self.focus {
                    Field::Email => Field::Password,
                    Field::Password => Field::Email,
                };
                self.set_focus(next);
            }
            KeyCode::BackTab | KeyCode::Up => {
                let previous = match self.focus {
                    Field::Email => Field::Password,
                    Field::Password => Field::Email,
                };
                self.set_focus(previous);
            }
            KeyCode::Char(c) => {
                self.focused_input().input_char(c);
            }
            KeyCode::Backspace => {
                self.focused_input().backspace();
            }
            KeyCode::Delete => {
                self.focused_input().delete();
            }
            KeyCode::Left => {
                self.focused_input().move_left();
            }
            KeyCode::Right => {
                self.focused_input().move_right();
            }
            KeyCode::Home => {
                self.focused_input().move_start();
            }
            KeyCode::End => {
                self.focused_input().move_end();
            }
            _ => {}
        }

        LoginAction::None
    }

    fn render_inner(&self, area: Rect, buf: &mut Buffer) {
        let vertical = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(14),
            Constraint::Fill(1),
        ]);
        let [_, center, _] = vertical.areas(area);

        let horizontal = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Min(50),
            Constraint::Fill(1),
        ]);
        let [_, content_area, _] = horizontal.areas(center);

        Clear.render(content_area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Textline Login ");

        let inner = block.inner(content_area);
        block.render(content_area, buf);

        let inner_layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ]);
        let areas = inner_layout.areas::<6>(inner);

        let title =
            Paragraph::new("Sign in to send messages").style(Style::default().fg(Color::White));
        title.render(areas[0], buf);

        (&self.email_input).render(areas[2], buf);
        (&self.password_input).render(areas[3], buf);

        let status = match self.state {
            LoginState::Input => Line::from(vec![
                Span::styled("Enter: Login", Style::default().fg(Color::DarkGray)),
                Span::raw(" | "),
                Span::styled("Tab: Next field", Style::default().fg(Color::DarkGray)),
                Span::raw(" | "),
                Span::styled("Esc: Quit", Style::default().fg(Color::DarkGray)),
            ]),
            LoginState::Submitting => Line::from(Span::styled(
                "Signing in...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )),
            LoginState::Error => {
                let msg = self.error_message.as_deref().unwrap_or("Unknown error");
                Line::from(Span::styled(
                    msg.to_string(),
                    Style::default().fg(Color::Red),
                ))
            }
        };
        let status_para = Paragraph::new(status);
        status_para.render(areas[5], buf);
    }
}

impl Default for LoginScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &LoginScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_inner(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(screen: &mut LoginScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_initial_state() {
        let screen = LoginScreen::new();
        assert_eq!(screen.state(), LoginState::Input);
        assert!(screen.credentials().is_none());
    }

    #[test]
    fn test_tab_switches_fields() {
        let mut screen = LoginScreen::new();
        type_text(&mut screen, "a@b.com");
        screen.handle_key(key(KeyCode::Tab));
        type_text(&mut screen, "secret");

        let credentials = screen.credentials().unwrap();
        assert_eq!(credentials.email, "a@b.com");
        assert_eq!(credentials.password, "secret");
    }

    #[test]
    fn test_submit_requires_both_fields() {
        let mut screen = LoginScreen::new();
        type_text(&mut screen, "a@b.com");
        assert_eq!(screen.handle_key(key(KeyCode::Enter)), LoginAction::None);

        screen.handle_key(key(KeyCode::Tab));
        type_text(&mut screen, "secret");
        assert_eq!(screen.handle_key(key(KeyCode::Enter)), LoginAction::Submit);
    }

    #[test]
    fn test_keys_ignored_while_submitting() {
        let mut screen = LoginScreen::new();
        screen.set_submitting();
        assert_eq!(
            screen.handle_key(key(KeyCode::Char('x'))),
            LoginAction::None
        );
        assert!(screen.credentials().is_none());
    }

    #[test]
    fn test_error_cleared_on_next_key() {
        let mut screen = LoginScreen::new();
        screen.set_error("Invalid email or password.");
        assert_eq!(screen.state(), LoginState::Error);

        screen.handle_key(key(KeyCode::Char('a')));
        assert_eq!(screen.state(), LoginState::Input);
    }

    #[test]
    fn test_reset_clears_password_only() {
        let mut screen = LoginScreen::new();
        type_text(&mut screen, "a@b.com");
        screen.handle_key(key(KeyCode::Tab));
        type_text(&mut screen, "secret");

        screen.reset();

        assert!(screen.credentials().is_none());
        assert_eq!(screen.email_input.value(), "a@b.com");
        assert!(screen.password_input.value().is_empty());
    }
}
