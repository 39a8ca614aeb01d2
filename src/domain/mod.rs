//! Domain layer - Core business entities and logic
//!
//! Users, their habits and the per-day executions of those habits,
//! plus the request/response shapes exchanged over the API.

pub mod habit;
pub mod habit_execution;
pub mod user;

pub use habit::{
    CreateHabit, Habit, HabitDetails, HabitDetailsResponse, HabitFrequency, HabitResponse,
    NewHabit, UpdateHabit,
};
pub use habit_execution::{
    current_streak, CreateExecution, ExecutionFilter, ExecutionResponse, ExecutionStatus,
    HabitExecution, NewExecution, UpdateExecution,
};
pub use user::{CreateUser, UpdateUser, User, UserResponse};
