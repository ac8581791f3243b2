//! Use case implementations.

mod login_use_case;
mod logout_use_case;
mod restore_session_use_case;
mod send_message_use_case;

pub use login_use_case::LoginUseCase;
pub use logout_use_case::LogoutUseCase;
pub use restore_session_use_case::RestoreSessionUseCase;
pub use send_message_use_case::SendMessageUseCase;
