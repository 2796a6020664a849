pub mod search_log;
pub mod student;
