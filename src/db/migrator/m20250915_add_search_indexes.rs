use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // hall_ticket already carries a unique index from table creation.
        manager
            .create_index(
                Index::create()
                    .name("idx_students_name")
                    .table(Students::Table)
                    .col(Students::Name)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_students_roll_number")
                    .table(Students::Table)
                    .col(Students::RollNumber)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_students_roll_number")
                    .table(Students::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_students_name")
                    .table(Students::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum Students {
    Table,
    Name,
    RollNumber,
}
