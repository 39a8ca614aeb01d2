//! Migration: Create habit_executions table.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_habits_table::Habits;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HabitExecutions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HabitExecutions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HabitExecutions::HabitId).integer().not_null())
                    .col(ColumnDef::new(HabitExecutions::ExecutionDate).date().not_null())
                    .col(
                        ColumnDef::new(HabitExecutions::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(HabitExecutions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(HabitExecutions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_habit_executions_habit_id")
                            .from(HabitExecutions::Table, HabitExecutions::HabitId)
                            .to(Habits::Table, Habits::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one record per habit per day; also serves lookups by habit_id
        manager
            .create_index(
                Index::create()
                    .name("uq_habit_executions_habit_date")
                    .table(HabitExecutions::Table)
                    .col(HabitExecutions::HabitId)
                    .col(HabitExecutions::ExecutionDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_habit_executions_execution_date")
                    .table(HabitExecutions::Table)
                    .col(HabitExecutions::ExecutionDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_habit_executions_status")
                    .table(HabitExecutions::Table)
                    .col(HabitExecutions::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HabitExecutions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum HabitExecutions {
    Table,
    Id,
    HabitId,
    ExecutionDate,
    Status,
    CreatedAt,
    UpdatedAt,
}
