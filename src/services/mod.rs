pub mod account_service;
pub mod category_service;
pub mod notification_service;

pub use account_service::{AccountError, AccountService, SecuritySettings};
pub use category_service::{CategoryDetail, CategoryFilter, CategoryService, CategorySort};
pub use notification_service::NotificationService;
