//! Tutor rating entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A student's rating of a tutor. Owned by the student; removed together with
/// either account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tutor_rating")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Student who gave the rating.
    #[sea_orm(indexed)]
    pub student_id: i64,

    #[sea_orm(indexed)]
    pub tutor_id: i64,

    /// 1 to 5.
    pub points: i16,

    #[sea_orm(column_type = "Text", nullable)]
    pub review: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::StudentId",
        to = "super::account::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::TutorId",
        to = "super::account::Column::Id",
        on_delete = "Cascade"
    )]
    Tutor,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
