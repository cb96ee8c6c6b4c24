use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JobStages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JobStages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JobStages::JobId).integer().not_null())
                    .col(ColumnDef::new(JobStages::Name).string_len(100).not_null())
                    // Sort key only; not unique within a job.
                    .col(ColumnDef::new(JobStages::Position).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_stages_job")
                            .from(JobStages::Table, JobStages::JobId)
                            .to(Jobs::Table, Jobs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_job_stages_job")
                    .table(JobStages::Table)
                    .col(JobStages::JobId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobStages::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum JobStages {
    Table,
    Id,
    JobId,
    Name,
    Position,
}

#[derive(DeriveIden)]
enum Jobs {
    Table,
    Id,
}
