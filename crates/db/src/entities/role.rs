//! Role entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Name of the student role.
pub const STUDENT: &str = "STUDENT";
/// Name of the tutor role.
pub const TUTOR: &str = "TUTOR";
/// Name of the administrator role; admins may verify other accounts.
pub const ADMIN: &str = "ADMIN";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "role")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Upper-case capability tag.
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::account_role::Entity")]
    AccountRoles,
}

impl Related<super::account_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountRoles.def()
    }
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        super::account_role::Relation::Account.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::account_role::Relation::Role.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
