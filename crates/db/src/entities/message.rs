//! Message entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A persisted chat message.
///
/// Messages are retained for archival: the account foreign keys restrict
/// deletion and the chat foreign key is cleared rather than cascaded.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "message")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(indexed)]
    pub sender_id: i64,

    #[sea_orm(indexed)]
    pub receiver_id: i64,

    #[sea_orm(nullable, indexed)]
    pub chat_id: Option<i64>,

    #[sea_orm(column_type = "Text")]
    pub body: String,

    /// Assigned by the server when the row is written.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::SenderId",
        to = "super::account::Column::Id",
        on_delete = "Restrict"
    )]
    Sender,

    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::ReceiverId",
        to = "super::account::Column::Id",
        on_delete = "Restrict"
    )]
    Receiver,

    #[sea_orm(
        belongs_to = "super::chat::Entity",
        from = "Column::ChatId",
        to = "super::chat::Column::Id",
        on_delete = "SetNull"
    )]
    Chat,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sender.def()
    }
}

impl Related<super::chat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Chat.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
