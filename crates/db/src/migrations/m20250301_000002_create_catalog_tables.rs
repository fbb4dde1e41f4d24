//! Create course category, course and enrolment tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CourseCategory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseCategory::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CourseCategory::Name)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CourseCategory::CreatedAt)
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
                    .table(Course::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Course::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Course::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Course::DescriptionShort).string_len(512))
                    .col(ColumnDef::new(Course::DescriptionLong).text())
                    .col(ColumnDef::new(Course::TutorId).big_integer().not_null())
                    .col(ColumnDef::new(Course::CategoryId).big_integer())
                    .col(ColumnDef::new(Course::StartDate).date())
                    .col(ColumnDef::new(Course::EndDate).date())
                    .col(
                        ColumnDef::new(Course::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_tutor")
                            .from(Course::Table, Course::TutorId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_category")
                            .from(Course::Table, Course::CategoryId)
                            .to(CourseCategory::Table, CourseCategory::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_course_tutor_id")
                    .table(Course::Table)
                    .col(Course::TutorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_course_category_id")
                    .table(Course::Table)
                    .col(Course::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CourseParticipant::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CourseParticipant::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(CourseParticipant::AccountId).big_integer().not_null())
                    .col(
                        ColumnDef::new(CourseParticipant::EnrolledAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(CourseParticipant::CourseId)
                            .col(CourseParticipant::AccountId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_participant_course")
                            .from(CourseParticipant::Table, CourseParticipant::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_participant_account")
                            .from(CourseParticipant::Table, CourseParticipant::AccountId)
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
            .drop_table(Table::drop().table(CourseParticipant::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Course::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseCategory::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CourseCategory {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum Course {
    Table,
    Id,
    Name,
    DescriptionShort,
    DescriptionLong,
    TutorId,
    CategoryId,
    StartDate,
    EndDate,
    CreatedAt,
}

#[derive(Iden)]
enum CourseParticipant {
    Table,
    CourseId,
    AccountId,
    EnrolledAt,
}

#[derive(Iden)]
enum Account {
    Table,
    Id,
}
