//! Habit execution handlers, nested under `/habits/:id/executions`.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::{get, patch},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::extractors::{ApiPath, ApiQuery, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::DEFAULT_RECENT_EXECUTIONS;
use crate::domain::{
    CreateExecution, ExecutionFilter, ExecutionResponse, ExecutionStatus, UpdateExecution,
};
use crate::errors::AppResult;
use crate::types::{Created, Paginated, PaginationParams};

/// Query for listing executions; date bounds are inclusive
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExecutionListQuery {
    #[param(value_type = Option<String>, example = "done")]
    pub status: Option<ExecutionStatus>,
    #[param(value_type = Option<String>, example = "2024-05-01")]
    pub start_date: Option<NaiveDate>,
    #[param(value_type = Option<String>, example = "2024-05-31")]
    pub end_date: Option<NaiveDate>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl ExecutionListQuery {
    fn split(self) -> (ExecutionFilter, PaginationParams) {
        (
            ExecutionFilter {
                status: self.status,
                start_date: self.start_date,
                end_date: self.end_date,
            },
            PaginationParams::new(self.page, self.per_page),
        )
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentQuery {
    /// Number of executions, 7 when omitted
    #[param(example = 7)]
    pub n: Option<u64>,
}

pub fn execution_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:id/executions",
            get(list_executions).post(record_execution),
        )
        .route("/:id/executions/recent", get(recent_executions))
        .route("/:id/executions/:execution_id", patch(update_execution))
}

/// List executions of a habit, newest first
#[utoipa::path(
    get,
    path = "/habits/{id}/executions",
    tag = "Executions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Habit ID"), ExecutionListQuery),
    responses(
        (status = 200, description = "Page of executions", body = [ExecutionResponse]),
        (status = 400, description = "Malformed query string"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Habit not found"),
        (status = 422, description = "start_date after end_date")
    )
)]
pub async fn list_executions(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ApiPath(habit_id): ApiPath<i32>,
    ApiQuery(query): ApiQuery<ExecutionListQuery>,
) -> AppResult<Json<Paginated<ExecutionResponse>>> {
    let (filter, page) = query.split();
    let (executions, total) = state
        .execution_service
        .list_executions(current_user.id, habit_id, filter, &page)
        .await?;

    Ok(Json(
        Paginated::new(executions, &page, total).map(ExecutionResponse::from),
    ))
}

/// Record today's status of a habit; a second call on the same day replaces it
#[utoipa::path(
    post,
    path = "/habits/{id}/executions",
    tag = "Executions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Habit ID")),
    request_body = CreateExecution,
    responses(
        (status = 201, description = "Execution recorded", body = ExecutionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Habit not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn record_execution(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ApiPath(habit_id): ApiPath<i32>,
    ValidatedJson(payload): ValidatedJson<CreateExecution>,
) -> AppResult<Created<ExecutionResponse>> {
    let today = Utc::now().date_naive();
    let execution = state
        .execution_service
        .record_execution(current_user.id, habit_id, payload.status, today)
        .await?;
    Ok(Created(execution.into()))
}

/// Most recent executions of a habit
#[utoipa::path(
    get,
    path = "/habits/{id}/executions/recent",
    tag = "Executions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Habit ID"), RecentQuery),
    responses(
        (status = 200, description = "Recent executions, newest first", body = [ExecutionResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Habit not found"),
        (status = 422, description = "n out of range")
    )
)]
pub async fn recent_executions(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ApiPath(habit_id): ApiPath<i32>,
    ApiQuery(query): ApiQuery<RecentQuery>,
) -> AppResult<Json<Vec<ExecutionResponse>>> {
    let n = query.n.unwrap_or(DEFAULT_RECENT_EXECUTIONS);
    let executions = state
        .execution_service
        .recent_executions(current_user.id, habit_id, n)
        .await?;
    Ok(Json(executions.into_iter().map(Into::into).collect()))
}

/// Change the status of an execution
#[utoipa::path(
    patch,
    path = "/habits/{id}/executions/{execution_id}",
    tag = "Executions",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Habit ID"),
        ("execution_id" = i32, Path, description = "Execution ID")
    ),
    request_body = UpdateExecution,
    responses(
        (status = 200, description = "Execution updated", body = ExecutionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Habit or execution not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_execution(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ApiPath((habit_id, execution_id)): ApiPath<(i32, i32)>,
    ValidatedJson(payload): ValidatedJson<UpdateExecution>,
) -> AppResult<Json<ExecutionResponse>> {
    let execution = state
        .execution_service
        .update_execution(current_user.id, habit_id, execution_id, payload)
        .await?;
    Ok(Json(execution.into()))
}
