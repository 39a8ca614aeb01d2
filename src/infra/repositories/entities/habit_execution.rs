//! Habit execution database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{ExecutionStatus, HabitExecution};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "habit_executions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub habit_id: i32,
    pub execution_date: Date,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::habit::Entity",
        from = "Column::HabitId",
        to = "super::habit::Column::Id",
        on_delete = "Cascade"
    )]
    Habit,
}

impl Related<super::habit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Habit.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now();
        if insert {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}

impl From<Model> for HabitExecution {
    fn from(model: Model) -> Self {
        HabitExecution {
            id: model.id,
            habit_id: model.habit_id,
            execution_date: model.execution_date,
            status: ExecutionStatus::from(model.status.as_str()),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<HabitExecution> for Model {
    fn from(execution: HabitExecution) -> Self {
        Model {
            id: execution.id,
            habit_id: execution.habit_id,
            execution_date: execution.execution_date,
            status: execution.status.into(),
            created_at: execution.created_at,
            updated_at: execution.updated_at,
        }
    }
}
