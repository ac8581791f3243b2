//! Reusable terminal widgets.

mod history_list;
mod input;
mod status_bar;

pub use history_list::HistoryList;
pub use input::TextInput;
pub use status_bar::{NoticeLevel, StatusBar};
