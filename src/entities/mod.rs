pub mod prelude;

pub mod search_logs;
pub mod students;
