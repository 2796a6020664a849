use crate::entities::{prelude::*, search_logs, students};
use anyhow::Result;
use sea_orm::{DatabaseConnection, EntityTrait, Set};

/// Audit classification of a directory search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    Name,
    HallTicket,
}

impl SearchType {
    /// `Name` when any returned record's name contains the query
    /// (case-insensitive), otherwise `HallTicket`.
    #[must_use]
    pub fn classify(records: &[students::Model], query: &str) -> Self {
        let needle = query.to_lowercase();
        let by_name = records.iter().any(|record| {
            record
                .name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        });

        if by_name { Self::Name } else { Self::HallTicket }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::HallTicket => "hall_ticket",
        }
    }
}

pub struct SearchLogRepository {
    conn: DatabaseConnection,
}

impl SearchLogRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(
        &self,
        searcher_address: &str,
        search_term: &str,
        search_type: SearchType,
        result_count: i32,
    ) -> Result<()> {
        let active_model = search_logs::ActiveModel {
            searcher_address: Set(searcher_address.to_string()),
            search_term: Set(search_term.to_string()),
            search_type: Set(search_type.as_str().to_string()),
            result_count: Set(result_count),
            searched_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        SearchLogs::insert(active_model).exec(&self.conn).await?;
        Ok(())
    }
}
