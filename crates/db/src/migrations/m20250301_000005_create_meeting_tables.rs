//! Create meeting and meeting participant tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Meeting::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Meeting::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Meeting::Title).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Meeting::StartsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Meeting::DurationMinutes)
                            .integer()
                            .not_null()
                            .default(60),
                    )
                    .col(ColumnDef::new(Meeting::Location).string_len(512))
                    .col(
                        ColumnDef::new(Meeting::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MeetingParticipant::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MeetingParticipant::MeetingId).big_integer().not_null())
                    .col(ColumnDef::new(MeetingParticipant::AccountId).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(MeetingParticipant::MeetingId)
                            .col(MeetingParticipant::AccountId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meeting_participant_meeting")
                            .from(MeetingParticipant::Table, MeetingParticipant::MeetingId)
                            .to(Meeting::Table, Meeting::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meeting_participant_account")
                            .from(MeetingParticipant::Table, MeetingParticipant::AccountId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: account_id for "meetings of an account"
        manager
            .create_index(
                Index::create()
                    .name("idx_meeting_participant_account_id")
                    .table(MeetingParticipant::Table)
                    .col(MeetingParticipant::AccountId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MeetingParticipant::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Meeting::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Meeting {
    Table,
    Id,
    Title,
    StartsAt,
    DurationMinutes,
    Location,
    CreatedAt,
}

#[derive(Iden)]
enum MeetingParticipant {
    Table,
    MeetingId,
    AccountId,
}

#[derive(Iden)]
enum Account {
    Table,
    Id,
}
