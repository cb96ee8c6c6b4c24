use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Jobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Jobs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Jobs::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Jobs::Company).string_len(255).not_null())
                    .col(ColumnDef::new(Jobs::Location).string_len(255).not_null())
                    .col(ColumnDef::new(Jobs::Department).string_len(255).null())
                    .col(
                        ColumnDef::new(Jobs::EmploymentType)
                            .string_len(100)
                            .not_null()
                            .default("Full-time"),
                    )
                    .col(
                        ColumnDef::new(Jobs::Status)
                            .string_len(50)
                            .not_null()
                            .default("open"),
                    )
                    .col(ColumnDef::new(Jobs::Description).text().not_null())
                    .col(ColumnDef::new(Jobs::Requirements).text().null())
                    .col(ColumnDef::new(Jobs::MinSalary).double().null())
                    .col(ColumnDef::new(Jobs::MaxSalary).double().null())
                    .col(ColumnDef::new(Jobs::CreatedById).integer().null())
                    .col(
                        ColumnDef::new(Jobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_jobs_created_by")
                            .from(Jobs::Table, Jobs::CreatedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_created_by")
                    .table(Jobs::Table)
                    .col(Jobs::CreatedById)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Jobs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Jobs {
    Table,
    Id,
    Title,
    Company,
    Location,
    Department,
    EmploymentType,
    Status,
    Description,
    Requirements,
    MinSalary,
    MaxSalary,
    CreatedById,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
