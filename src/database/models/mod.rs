pub mod category;
pub mod notification;
pub mod user;

pub use category::CategoryWithPopularity;
pub use notification::Notification;
pub use user::{LoginPreference, User};
