//! Main application orchestrator.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent};
use futures_util::StreamExt;
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;
use tokio::time::interval_at;
use tracing::{debug, error, info, warn};

use crate::application::use_cases::{
    LoginUseCase, LogoutUseCase, RestoreSessionUseCase, SendMessageUseCase,
};
use crate::domain::entities::{HistorySnapshot, MessageHistoryItem, SendReceipt, User};
use crate::domain::errors::ApiError;
use crate::domain::ports::{MessagePort, SessionPort, TokenStoragePort};
use crate::presentation::events::{EventResult, is_quit_event};
use crate::presentation::ui::{
    LoginAction, LoginScreen, MessagesKeyResult, MessagesScreen, MessagesScreenState,
};
use crate::presentation::widgets::NoticeLevel;

#[derive(Debug)]
enum Action {
    LoginSucceeded {
        user: User,
    },
    LoginFailed {
        error: ApiError,
    },
    HistoryLoaded {
        seq: u64,
        items: Vec<MessageHistoryItem>,
    },
    HistoryFailed {
        seq: u64,
        error: ApiError,
    },
    MessageSent {
        receipt: SendReceipt,
    },
    SendFailed {
        error: ApiError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppState {
    Login,
    Messages,
    Exiting,
}

enum CurrentScreen {
    Login(LoginScreen),
    Messages(Box<MessagesScreenState>),
}

pub struct App {
    state: AppState,
    screen: CurrentScreen,
    login_use_case: Arc<LoginUseCase>,
    logout_use_case: LogoutUseCase,
    restore_session_use_case: RestoreSessionUseCase,
    send_message_use_case: Arc<SendMessageUseCase>,
    message_port: Arc<dyn MessagePort>,
    recipient_display: String,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    poll_period: Duration,
    // Fetch sequencing: every spawned fetch gets the next number, and a
    // result is applied only if no later fetch has been applied already.
    // An overlapping slow response is discarded instead of clobbering a
    // newer snapshot.
    next_fetch_seq: u64,
    applied_fetch_seq: u64,
}

impl App {
    /// Creates the app over its ports.
    ///
    /// # Errors
    /// `Validation` if the configured recipient is not a usable phone
    /// number.
    pub fn new(
        session_port: Arc<dyn SessionPort>,
        message_port: Arc<dyn MessagePort>,
        storage_port: Arc<dyn TokenStoragePort>,
        recipient: &str,
        poll_period: Duration,
    ) -> Result<Self, ApiError> {
        let login_use_case = Arc::new(LoginUseCase::new(session_port.clone(), storage_port.clone()));
        let logout_use_case = LogoutUseCase::new(session_port.clone(), storage_port.clone());
        let restore_session_use_case = RestoreSessionUseCase::new(session_port, storage_port);
        let send_message_use_case =
            Arc::new(SendMessageUseCase::new(message_port.clone(), recipient)?);
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Ok(Self {
            state: AppState::Login,
            screen: CurrentScreen::Login(LoginScreen::new()),
            login_use_case,
            logout_use_case,
            restore_session_use_case,
            send_message_use_case,
            message_port,
            recipient_display: recipient.to_string(),
            action_tx,
            action_rx,
            poll_period,
            next_fetch_seq: 0,
            applied_fetch_seq: 0,
        })
    }

    /// Runs until the user quits.
    ///
    /// # Errors
    /// Returns error if terminal drawing fails.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        match self.restore_session_use_case.execute().await {
            Ok(Some(user)) => {
                info!(email = %user.email(), "Restored existing session");
                self.enter_messages_screen(user);
            }
            Ok(None) => {
                debug!("No restorable session, starting at login");
            }
            Err(e) => {
                warn!(error = %e, "Session restore failed, starting at login");
            }
        }

        self.run_event_loop(terminal).await?;

        info!("Application exiting normally");
        Ok(())
    }

    async fn run_event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mut terminal_events = EventStream::new();
        // The immediate load comes from entering the messages screen; the
        // timer covers only the steady-state refreshes after it.
        let mut poll_timer = interval_at(
            tokio::time::Instant::now() + self.poll_period,
            self.poll_period,
        );

        terminal.draw(|frame| self.render(frame))?;

        while self.state != AppState::Exiting {
            tokio::select! {
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action).await;
                    terminal.draw(|frame| self.render(frame))?;
                }

                _ = poll_timer.tick() => {
                    if self.state == AppState::Messages {
                        if let CurrentScreen::Messages(state) = &mut self.screen {
                            state.clear_notice();
                        }
                        self.spawn_history_fetch();
                        terminal.draw(|frame| self.render(frame))?;
                    }
                }

                Some(Ok(event)) = terminal_events.next() => {
                    if self.handle_terminal_event(event).await == EventResult::Exit {
                        self.state = AppState::Exiting;
                    }
                    terminal.draw(|frame| self.render(frame))?;
                }
            }
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        match &mut self.screen {
            CurrentScreen::Login(screen) => {
                frame.render_widget(&*screen, frame.area());
            }
            CurrentScreen::Messages(state) => {
                frame.render_stateful_widget(MessagesScreen::new(), frame.area(), state);
            }
        }
    }

    async fn handle_terminal_event(&mut self, event: Event) -> EventResult {
        match event {
            Event::Key(key) => self.handle_key(key).await,
            _ => EventResult::Continue,
        }
    }

    async fn handle_key(&mut self, key: KeyEvent) -> EventResult {
        let result = match &mut self.screen {
            CurrentScreen::Login(screen) => {
                if is_quit_event(&key) {
                    return EventResult::Exit;
                }
                if screen.handle_key(key) == LoginAction::Submit {
                    self.handle_login_submit();
                }
                return EventResult::Continue;
            }
            CurrentScreen::Messages(state) => state.handle_key(key),
        };

        match result {
            MessagesKeyResult::Quit => return EventResult::Exit,
            MessagesKeyResult::Logout => {
                self.handle_logout().await;
            }
            MessagesKeyResult::Submit(content) => {
                self.spawn_send(content);
            }
            MessagesKeyResult::Refresh => {
                if let CurrentScreen::Messages(state) = &mut self.screen {
                    state.clear_notice();
                }
                self.spawn_history_fetch();
            }
            MessagesKeyResult::None => {}
        }

        EventResult::Continue
    }

    /// Kicks off login in the background so the "Signing in..." state gets
    /// drawn instead of the key handler blocking on the round trip. The
    /// outcome comes back through the action channel.
    fn handle_login_submit(&mut self) {
        let CurrentScreen::Login(screen) = &mut self.screen else {
            return;
        };
        let Some(credentials) = screen.credentials() else {
            return;
        };
        screen.set_submitting();

        let use_case = Arc::clone(&self.login_use_case);
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let action = match use_case.execute(&credentials).await {
                Ok(outcome) => Action::LoginSucceeded { user: outcome.user },
                Err(error) => Action::LoginFailed { error },
            };
            let _ = tx.send(action);
        });
    }

    async fn handle_logout(&mut self) {
        if let Err(e) = self.logout_use_case.execute().await {
            warn!(error = %e, "Logout did not fully clear local state");
        }
        self.transition_to_login(None);
    }

    /// The backend rejected our token. Clear it and fall back to login.
    async fn handle_session_expired(&mut self) {
        warn!("Session rejected by server, forcing logout");
        if let Err(e) = self.logout_use_case.execute().await {
            warn!(error = %e, "Forced logout did not fully clear local state");
        }
        self.transition_to_login(Some(ApiError::Unauthorized.user_message()));
    }

    fn transition_to_login(&mut self, error: Option<String>) {
        let mut screen = LoginScreen::new();
        if let Some(message) = error {
            screen.set_error(message);
        }
        self.state = AppState::Login;
        self.screen = CurrentScreen::Login(screen);
    }

    fn enter_messages_screen(&mut self, user: User) {
        self.state = AppState::Messages;
        self.screen = CurrentScreen::Messages(Box::new(MessagesScreenState::new(
            user,
            self.recipient_display.clone(),
        )));
        self.spawn_history_fetch();
    }

    fn spawn_history_fetch(&mut self) {
        self.next_fetch_seq += 1;
        let seq = self.next_fetch_seq;
        let port = Arc::clone(&self.message_port);
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let action = match port.fetch_history().await {
                Ok(items) => Action::HistoryLoaded { seq, items },
                Err(error) => Action::HistoryFailed { seq, error },
            };
            let _ = tx.send(action);
        });
    }

    fn spawn_send(&mut self, content: String) {
        if let CurrentScreen::Messages(state) = &mut self.screen {
            state.set_sending(true);
        }
        let use_case = Arc::clone(&self.send_message_use_case);
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let action = match use_case.execute(&content).await {
                Ok(receipt) => Action::MessageSent { receipt },
                Err(error) => Action::SendFailed { error },
            };
            let _ = tx.send(action);
        });
    }

    async fn handle_action(&mut self, action: Action) {
        match action {
            Action::LoginSucceeded { user } => {
                info!(email = %user.email(), "Login successful");
                self.enter_messages_screen(user);
            }
            Action::LoginFailed { error } => {
                error!(error = %error, "Login failed");
                if let CurrentScreen::Login(screen) = &mut self.screen {
                    screen.set_error(login_error_message(&error));
                }
            }
            Action::HistoryLoaded { seq, items } => {
                if seq <= self.applied_fetch_seq {
                    debug!(seq, applied = self.applied_fetch_seq, "Discarding stale history result");
                    return;
                }
                self.applied_fetch_seq = seq;
                if let CurrentScreen::Messages(state) = &mut self.screen {
                    state.set_snapshot(HistorySnapshot::from_fetch(items));
                    state.clear_error_notice();
                }
            }
            Action::HistoryFailed { seq, error } => {
                if seq <= self.applied_fetch_seq {
                    debug!(seq, "Discarding stale history failure");
                    return;
                }
                if error.is_unauthorized() && self.state == AppState::Messages {
                    self.handle_session_expired().await;
                    return;
                }
                if let CurrentScreen::Messages(state) = &mut self.screen {
                    // With history already on screen, a failed refresh is
                    // not worth interrupting the user for.
                    if state.snapshot().is_empty() {
                        state.set_notice(error.user_message(), NoticeLevel::Error);
                    } else {
                        warn!(error = %error, "History refresh failed, keeping previous snapshot");
                    }
                }
            }
            Action::MessageSent { receipt } => {
                debug!(id = ?receipt.id, success = receipt.success, "Send acknowledged");
                if let CurrentScreen::Messages(state) = &mut self.screen {
                    state.set_sending(false);
                    state.clear_compose();
                    let notice = receipt
                        .message
                        .unwrap_or_else(|| "Message sent".to_string());
                    state.set_notice(notice, NoticeLevel::Success);
                }
                self.spawn_history_fetch();
            }
            Action::SendFailed { error } => {
                if let CurrentScreen::Messages(state) = &mut self.screen {
                    state.set_sending(false);
                }
                if error.is_unauthorized() && self.state == AppState::Messages {
                    self.handle_session_expired().await;
                    return;
                }
                error!(error = %error, "Send failed");
                if let CurrentScreen::Messages(state) = &mut self.screen {
                    state.set_notice(error.user_message(), NoticeLevel::Error);
                }
            }
        }
    }
}

/// Maps a login failure to the message shown on the form.
fn login_error_message(error: &ApiError) -> String {
    match error {
        ApiError::Unauthorized => "Invalid email or password.".to_string(),
        ApiError::Validation { message } => message.clone(),
        ApiError::ServerError { .. } => "Server error. Please try again later.".to_string(),
        e if e.is_network_error() => "Unable to connect to server. Please try again.".to_string(),
        _ => "Login failed. Please try again.".to_string(),
    }
}
