use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Applications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Applications::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Applications::CandidateId).integer().not_null())
                    .col(ColumnDef::new(Applications::JobId).integer().not_null())
                    .col(ColumnDef::new(Applications::StageId).integer().null())
                    .col(
                        ColumnDef::new(Applications::Status)
                            .string_len(50)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Applications::ResumePath).string_len(500).null())
                    .col(ColumnDef::new(Applications::CoverLetter).text().null())
                    .col(
                        ColumnDef::new(Applications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Applications::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_applications_candidate")
                            .from(Applications::Table, Applications::CandidateId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_applications_job")
                            .from(Applications::Table, Applications::JobId)
                            .to(Jobs::Table, Jobs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_applications_stage")
                            .from(Applications::Table, Applications::StageId)
                            .to(JobStages::Table, JobStages::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // One application per candidate per job.
        manager
            .create_index(
                Index::create()
                    .name("idx_applications_candidate_job")
                    .table(Applications::Table)
                    .col(Applications::CandidateId)
                    .col(Applications::JobId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_applications_job")
                    .table(Applications::Table)
                    .col(Applications::JobId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Applications::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Applications {
    Table,
    Id,
    CandidateId,
    JobId,
    StageId,
    Status,
    ResumePath,
    CoverLetter,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Jobs {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum JobStages {
    Table,
    Id,
}
