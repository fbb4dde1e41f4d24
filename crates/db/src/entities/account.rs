//! Account entity.

use sea_orm::entity::prelude::*;

/// A registered person on the platform.
///
/// Not `Serialize`; accounts leave the service layer only as projections
/// without `password_hash`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "account")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub first_name: String,

    pub last_name: String,

    /// Login key, unique across all accounts.
    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 PHC string.
    pub password_hash: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    #[sea_orm(nullable, indexed)]
    pub affiliation_id: Option<i64>,

    #[sea_orm(default_value = false)]
    pub is_verified: bool,

    /// Set in the same statement that flips `is_verified`.
    #[sea_orm(nullable)]
    pub verified_at: Option<DateTimeWithTimeZone>,

    /// Cleared when the account is archived instead of deleted.
    #[sea_orm(default_value = true)]
    pub enabled: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::affiliation::Entity",
        from = "Column::AffiliationId",
        to = "super::affiliation::Column::Id",
        on_delete = "SetNull"
    )]
    Affiliation,

    #[sea_orm(has_many = "super::account_role::Entity")]
    AccountRoles,

    #[sea_orm(has_many = "super::progress::Entity")]
    Progress,
}

impl Related<super::affiliation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Affiliation.def()
    }
}

impl Related<super::account_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountRoles.def()
    }
}

impl Related<super::progress::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Progress.def()
    }
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        super::account_role::Relation::Role.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::account_role::Relation::Account.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
