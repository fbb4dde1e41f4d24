//! Create tutor rating, course rating and progress tables.
//!
//! All three are owned by the student and cascade with the owning account.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TutorRating::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TutorRating::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TutorRating::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(TutorRating::TutorId).big_integer().not_null())
                    .col(ColumnDef::new(TutorRating::Points).small_integer().not_null())
                    .col(ColumnDef::new(TutorRating::Review).text())
                    .col(
                        ColumnDef::new(TutorRating::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::col(TutorRating::Points).between(1, 5))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tutor_rating_student")
                            .from(TutorRating::Table, TutorRating::StudentId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tutor_rating_tutor")
                            .from(TutorRating::Table, TutorRating::TutorId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tutor_rating_tutor_id")
                    .table(TutorRating::Table)
                    .col(TutorRating::TutorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CourseRating::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseRating::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourseRating::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(CourseRating::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(CourseRating::Points).small_integer().not_null())
                    .col(ColumnDef::new(CourseRating::Review).text())
                    .col(
                        ColumnDef::new(CourseRating::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::col(CourseRating::Points).between(1, 5))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_rating_student")
                            .from(CourseRating::Table, CourseRating::StudentId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_rating_course")
                            .from(CourseRating::Table, CourseRating::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Progress::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Progress::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Progress::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Progress::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Progress::Points).integer().not_null())
                    .col(
                        ColumnDef::new(Progress::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_progress_student")
                            .from(Progress::Table, Progress::StudentId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_progress_course")
                            .from(Progress::Table, Progress::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_progress_student_id")
                    .table(Progress::Table)
                    .col(Progress::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Progress::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseRating::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TutorRating::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TutorRating {
    Table,
    Id,
    StudentId,
    TutorId,
    Points,
    Review,
    CreatedAt,
}

#[derive(Iden)]
enum CourseRating {
    Table,
    Id,
    StudentId,
    CourseId,
    Points,
    Review,
    CreatedAt,
}

#[derive(Iden)]
enum Progress {
    Table,
    Id,
    StudentId,
    CourseId,
    Points,
    RecordedAt,
}

#[derive(Iden)]
enum Account {
    Table,
    Id,
}

#[derive(Iden)]
enum Course {
    Table,
    Id,
}
