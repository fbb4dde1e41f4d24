//! Create affiliation, account, role and membership tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Affiliation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Affiliation::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Affiliation::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Affiliation::Address).text().not_null())
                    .col(
                        ColumnDef::new(Affiliation::CreatedAt)
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
                    .table(Account::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Account::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Account::FirstName).string_len(100).not_null())
                    .col(ColumnDef::new(Account::LastName).string_len(100).not_null())
                    .col(ColumnDef::new(Account::Email).string_len(320).not_null())
                    .col(ColumnDef::new(Account::PasswordHash).string_len(256).not_null())
                    .col(ColumnDef::new(Account::Description).text())
                    .col(ColumnDef::new(Account::AffiliationId).big_integer())
                    .col(
                        ColumnDef::new(Account::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Account::VerifiedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Account::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Account::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_affiliation")
                            .from(Account::Table, Account::AffiliationId)
                            .to(Affiliation::Table, Affiliation::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    // A verified account always carries its verification time.
                    .check(
                        Expr::col(Account::IsVerified)
                            .eq(false)
                            .or(Expr::col(Account::VerifiedAt).is_not_null()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_account_email")
                    .table(Account::Table)
                    .col(Account::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_account_affiliation_id")
                    .table(Account::Table)
                    .col(Account::AffiliationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Role::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Role::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Role::Name)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "INSERT INTO role (name) VALUES ('STUDENT'), ('TUTOR'), ('ADMIN') ON CONFLICT DO NOTHING;",
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccountRole::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AccountRole::AccountId).big_integer().not_null())
                    .col(ColumnDef::new(AccountRole::RoleId).integer().not_null())
                    .col(
                        ColumnDef::new(AccountRole::GrantedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(AccountRole::AccountId)
                            .col(AccountRole::RoleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_role_account")
                            .from(AccountRole::Table, AccountRole::AccountId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_role_role")
                            .from(AccountRole::Table, AccountRole::RoleId)
                            .to(Role::Table, Role::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: role_id for counting members of a role
        manager
            .create_index(
                Index::create()
                    .name("idx_account_role_role_id")
                    .table(AccountRole::Table)
                    .col(AccountRole::RoleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccountVerifier::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AccountVerifier::AccountId).big_integer().not_null())
                    .col(ColumnDef::new(AccountVerifier::VerifierId).big_integer().not_null())
                    .col(
                        ColumnDef::new(AccountVerifier::VerifiedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(AccountVerifier::AccountId)
                            .col(AccountVerifier::VerifierId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_verifier_account")
                            .from(AccountVerifier::Table, AccountVerifier::AccountId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_verifier_verifier")
                            .from(AccountVerifier::Table, AccountVerifier::VerifierId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccountVerifier::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AccountRole::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Role::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Account::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Affiliation::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Affiliation {
    Table,
    Id,
    Name,
    Address,
    CreatedAt,
}

#[derive(Iden)]
enum Account {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    PasswordHash,
    Description,
    AffiliationId,
    IsVerified,
    VerifiedAt,
    Enabled,
    CreatedAt,
}

#[derive(Iden)]
enum Role {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum AccountRole {
    Table,
    AccountId,
    RoleId,
    GrantedAt,
}

#[derive(Iden)]
enum AccountVerifier {
    Table,
    AccountId,
    VerifierId,
    VerifiedAt,
}
