pub use super::search_logs::Entity as SearchLogs;
pub use super::students::Entity as Students;
