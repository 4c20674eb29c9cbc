pub mod past_papers;
pub mod session;

pub use past_papers::{browse, find_by_key, trigger_keys, BrowseView, DifficultyTab, PastPaperEntry};
pub use session::Session;
