use sea_orm::entity::prelude::*;

/// Pipeline used when a recruiter does not supply `stage_names`.
pub const DEFAULT_STAGE_NAMES: [&str; 5] = ["Applied", "Screening", "Interview", "Offer", "Hired"];

/// Synthesized for an application to a job that has no stages at all.
pub const FALLBACK_STAGE_NAME: &str = "Applied";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "job_stages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub job_id: i32,
    pub name: String,
    /// Sort key within the job, assigned 1..N.
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::job::Entity",
        from = "Column::JobId",
        to = "super::job::Column::Id",
        on_delete = "Cascade"
    )]
    Job,
    #[sea_orm(has_many = "super::application::Entity")]
    Applications,
}

impl Related<super::job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl Related<super::application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
