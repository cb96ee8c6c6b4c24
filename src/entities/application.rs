use sea_orm::entity::prelude::*;

pub const STATUS_ACTIVE: &str = "active";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub candidate_id: i32,
    pub job_id: i32,
    /// `None` once the stage it pointed at has been removed.
    pub stage_id: Option<i32>,
    pub status: String,
    pub resume_path: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub cover_letter: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CandidateId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Candidate,
    #[sea_orm(
        belongs_to = "super::job::Entity",
        from = "Column::JobId",
        to = "super::job::Column::Id",
        on_delete = "Cascade"
    )]
    Job,
    #[sea_orm(
        belongs_to = "super::job_stage::Entity",
        from = "Column::StageId",
        to = "super::job_stage::Column::Id",
        on_delete = "SetNull"
    )]
    Stage,
    #[sea_orm(has_many = "super::application_note::Entity")]
    Notes,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Candidate.def()
    }
}

impl Related<super::job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl Related<super::job_stage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stage.def()
    }
}

impl Related<super::application_note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
