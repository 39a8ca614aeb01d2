//! Migration: Create habits table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Habits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Habits::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Habits::UserId).integer().not_null())
                    .col(ColumnDef::new(Habits::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Habits::Description).text().null())
                    .col(
                        ColumnDef::new(Habits::Frequency)
                            .string_len(20)
                            .not_null()
                            .default("daily"),
                    )
                    .col(
                        ColumnDef::new(Habits::TargetDays)
                            .integer()
                            .not_null()
                            .default(21),
                    )
                    .col(ColumnDef::new(Habits::TimeToRemind).time().null())
                    .col(
                        ColumnDef::new(Habits::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Habits::CurrentStreak)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Habits::MaxStreak)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Habits::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Habits::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_habits_user_id")
                            .from(Habits::Table, Habits::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_habits_user_id")
                    .table(Habits::Table)
                    .col(Habits::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Habits::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Habits {
    Table,
    Id,
    UserId,
    Name,
    Description,
    Frequency,
    TargetDays,
    TimeToRemind,
    IsActive,
    CurrentStreak,
    MaxStreak,
    CreatedAt,
    UpdatedAt,
}
