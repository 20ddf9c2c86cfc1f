//! Task CRUD endpoints, all scoped to the authenticated user.

use actix_web::{web, HttpResponse, HttpResponseBuilder};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::cookies::access_cookie;
use crate::entities::tasks::{TaskPriority, TaskStatus};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::repos::tasks::{self, NewTask, Task, TaskFilter, TaskUpdate};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
}

/// Partial update. A field that is absent stays untouched; `description` and
/// `due_date` accept an explicit null to clear the value.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "double_option_rfc3339")]
    pub due_date: Option<Option<OffsetDateTime>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn double_option_rfc3339<'de, D>(
    deserializer: D,
) -> Result<Option<Option<OffsetDateTime>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(with = "time::serde::rfc3339::option")] Option<OffsetDateTime>);

    Option::<Wrapper>::deserialize(deserializer).map(|outer| Some(outer.and_then(|w| w.0)))
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Builder with the refreshed access cookie already attached when this
/// request came in on the silent-refresh path.
fn respond(status_builder: HttpResponseBuilder, user: &CurrentUser, app_state: &AppState) -> HttpResponseBuilder {
    let mut builder = status_builder;
    if let Some(token) = &user.refreshed_access_token {
        builder.cookie(access_cookie(token.clone(), &app_state.security));
    }
    builder
}

async fn list_tasks(
    user: CurrentUser,
    query: web::Query<TaskListQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let query = query.into_inner();

    let filter = TaskFilter {
        status: query.status,
        priority: query.priority,
        search: query.search.filter(|s| !s.trim().is_empty()),
    };

    let tasks = tasks::list_for_user(db, user.user_id, &filter).await?;
    let body: Vec<TaskResponse> = tasks.into_iter().map(TaskResponse::from).collect();

    Ok(respond(HttpResponse::Ok(), &user, &app_state).json(body))
}

async fn create_task(
    user: CurrentUser,
    body: ValidatedJson<CreateTaskRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let req = body.into_inner();

    let title = req.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::validation(
            ErrorCode::ValidationError,
            "Title cannot be empty",
        ));
    }

    let new_task = NewTask {
        title,
        description: req.description,
        status: req.status.unwrap_or(TaskStatus::Todo),
        priority: req.priority.unwrap_or(TaskPriority::Medium),
        due_date: req.due_date,
    };

    let task = tasks::create_for_user(db, user.user_id, new_task).await?;

    Ok(respond(HttpResponse::Created(), &user, &app_state).json(TaskResponse::from(task)))
}

async fn get_task(
    user: CurrentUser,
    path: web::Path<Uuid>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let task_id = path.into_inner();

    let task = tasks::find_for_user(db, user.user_id, task_id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::TaskNotFound, "Task not found"))?;

    Ok(respond(HttpResponse::Ok(), &user, &app_state).json(TaskResponse::from(task)))
}

async fn update_task(
    user: CurrentUser,
    path: web::Path<Uuid>,
    body: ValidatedJson<UpdateTaskRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let task_id = path.into_inner();
    let req = body.into_inner();

    if let Some(title) = &req.title {
        if title.trim().is_empty() {
            return Err(AppError::validation(
                ErrorCode::ValidationError,
                "Title cannot be empty",
            ));
        }
    }

    let update = TaskUpdate {
        title: req.title.map(|t| t.trim().to_string()),
        description: req.description,
        status: req.status,
        priority: req.priority,
        due_date: req.due_date,
    };

    let task = tasks::update_for_user(db, user.user_id, task_id, update).await?;

    Ok(respond(HttpResponse::Ok(), &user, &app_state).json(TaskResponse::from(task)))
}

async fn delete_task(
    user: CurrentUser,
    path: web::Path<Uuid>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let task_id = path.into_inner();

    tasks::delete_for_user(db, user.user_id, task_id).await?;

    Ok(respond(HttpResponse::NoContent(), &user, &app_state).finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_tasks))
        .route("", web::post().to(create_task))
        .route("/{id}", web::get().to(get_task))
        .route("/{id}", web::patch().to(update_task))
        .route("/{id}", web::delete().to(delete_task));
}
