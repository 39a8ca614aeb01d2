//! Habit database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{Habit, HabitFrequency};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "habits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub frequency: String,
    pub target_days: i32,
    pub time_to_remind: Option<Time>,
    pub is_active: bool,
    pub current_streak: i32,
    pub max_streak: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::habit_execution::Entity")]
    Executions,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::habit_execution::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Executions.def()
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

impl From<Model> for Habit {
    fn from(model: Model) -> Self {
        Habit {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            description: model.description,
            frequency: HabitFrequency::from(model.frequency.as_str()),
            target_days: model.target_days,
            time_to_remind: model.time_to_remind,
            is_active: model.is_active,
            current_streak: model.current_streak,
            max_streak: model.max_streak,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Habit> for Model {
    fn from(habit: Habit) -> Self {
        Model {
            id: habit.id,
            user_id: habit.user_id,
            name: habit.name,
            description: habit.description,
            frequency: habit.frequency.into(),
            target_days: habit.target_days,
            time_to_remind: habit.time_to_remind,
            is_active: habit.is_active,
            current_streak: habit.current_streak,
            max_streak: habit.max_streak,
            created_at: habit.created_at,
            updated_at: habit.updated_at,
        }
    }
}
