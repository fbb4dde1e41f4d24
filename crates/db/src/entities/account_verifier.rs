//! Verification edges between accounts.
//!
//! Each row says "`verifier_id` verified `account_id`". The edge set is only
//! ever read in that direction; no relation is declared from the verifier side.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "account_verifier")]
pub struct Model {
    /// The verified account.
    #[sea_orm(primary_key, auto_increment = false)]
    pub account_id: i64,

    #[sea_orm(primary_key, auto_increment = false)]
    pub verifier_id: i64,

    pub verified_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id",
        on_delete = "Cascade"
    )]
    Verified,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Verified.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
