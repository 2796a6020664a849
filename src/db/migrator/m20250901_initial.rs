use crate::entities::prelude::*;
use crate::entities::search_logs;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Students)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(SearchLogs)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Index on searched_at for audit exports
        manager
            .create_index(
                Index::create()
                    .name("idx_search_logs_searched_at")
                    .table(SearchLogs)
                    .col(search_logs::Column::SearchedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SearchLogs).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students).to_owned())
            .await
    }
}
