//! UI screens.

mod app;
mod login_screen;
mod messages_screen;

pub use app::App;
pub use login_screen::{LoginAction, LoginScreen, LoginState};
pub use messages_screen::{
    MessagesFocus, MessagesKeyResult, MessagesScreen, MessagesScreenState,
};
