pub mod campaign;
pub mod log_entry;
pub mod user;

pub use campaign::Campaign;
pub use log_entry::{LogEntry, WorkTag};
pub use user::User;
