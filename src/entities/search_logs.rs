use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Append-only audit trail of directory searches. Never read back or
/// mutated by the service.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "search_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub searcher_address: String,
    pub search_term: String,
    pub search_type: String,
    pub result_count: i32,
    pub searched_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
