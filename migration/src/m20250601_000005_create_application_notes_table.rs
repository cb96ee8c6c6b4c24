use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ApplicationNotes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ApplicationNotes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ApplicationNotes::ApplicationId).integer().not_null())
                    // Kept when the author account goes away.
                    .col(ColumnDef::new(ApplicationNotes::AuthorId).integer().null())
                    .col(ColumnDef::new(ApplicationNotes::Body).text().not_null())
                    .col(
                        ColumnDef::new(ApplicationNotes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_application_notes_application")
                            .from(ApplicationNotes::Table, ApplicationNotes::ApplicationId)
                            .to(Applications::Table, Applications::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_application_notes_author")
                            .from(ApplicationNotes::Table, ApplicationNotes::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_application_notes_application")
                    .table(ApplicationNotes::Table)
                    .col(ApplicationNotes::ApplicationId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ApplicationNotes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ApplicationNotes {
    Table,
    Id,
    ApplicationId,
    AuthorId,
    Body,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Applications {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
