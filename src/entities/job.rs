use sea_orm::entity::prelude::*;

/// The only status with special meaning: visible to the public and to candidates.
pub const STATUS_OPEN: &str = "open";

pub const DEFAULT_EMPLOYMENT_TYPE: &str = "Full-time";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub company: String,
    pub location: String,
    pub department: Option<String>,
    pub employment_type: String,
    pub status: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub requirements: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub min_salary: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub max_salary: Option<f64>,
    pub created_by_id: Option<i32>,
    pub created_at: DateTimeUtc,
}

impl Model {
    pub fn is_open(&self) -> bool {
        self.status == STATUS_OPEN
    }

    pub fn is_owned_by(&self, user_id: i32) -> bool {
        self.created_by_id == Some(user_id)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedById",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    Creator,
    #[sea_orm(has_many = "super::job_stage::Entity")]
    Stages,
    #[sea_orm(has_many = "super::application::Entity")]
    Applications,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::job_stage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stages.def()
    }
}

impl Related<super::application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
