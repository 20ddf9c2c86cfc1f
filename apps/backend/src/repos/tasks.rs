//! Task repository functions, generic over `ConnectionTrait`.
//!
//! Every query is scoped to the owning user; a task id from another user's
//! workspace behaves exactly like a missing task.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::tasks::{self, TaskPriority, TaskStatus};
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::infra::db_errors::map_db_err;

/// Task domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Optional list filters; all combine with AND.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Substring match on title or description
    pub search: Option<String>,
}

/// Fields settable at creation time.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<OffsetDateTime>,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Option<OffsetDateTime>>,
}

/// Aggregate counts for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TaskStats {
    pub total: u64,
    pub todo: u64,
    pub in_progress: u64,
    pub done: u64,
    /// Past due date and not done
    pub overdue: u64,
}

pub async fn list_for_user<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    filter: &TaskFilter,
) -> Result<Vec<Task>, DomainError> {
    let mut query = tasks::Entity::find().filter(tasks::Column::UserId.eq(user_id));

    if let Some(status) = &filter.status {
        query = query.filter(tasks::Column::Status.eq(status.clone()));
    }
    if let Some(priority) = &filter.priority {
        query = query.filter(tasks::Column::Priority.eq(priority.clone()));
    }
    if let Some(search) = &filter.search {
        query = query.filter(
            Condition::any()
                .add(tasks::Column::Title.contains(search))
                .add(tasks::Column::Description.contains(search)),
        );
    }

    let models = query
        .order_by_desc(tasks::Column::CreatedAt)
        .all(conn)
        .await
        .map_err(map_db_err)?;

    Ok(models.into_iter().map(Task::from).collect())
}

pub async fn find_for_user<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    task_id: Uuid,
) -> Result<Option<Task>, DomainError> {
    let model = tasks::Entity::find_by_id(task_id)
        .filter(tasks::Column::UserId.eq(user_id))
        .one(conn)
        .await
        .map_err(map_db_err)?;

    Ok(model.map(Task::from))
}

pub async fn create_for_user<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    new_task: NewTask,
) -> Result<Task, DomainError> {
    let now = OffsetDateTime::now_utc();
    let active = tasks::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        title: Set(new_task.title),
        description: Set(new_task.description),
        status: Set(new_task.status),
        priority: Set(new_task.priority),
        due_date: Set(new_task.due_date),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = active.insert(conn).await.map_err(map_db_err)?;
    Ok(Task::from(model))
}

pub async fn update_for_user<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    task_id: Uuid,
    update: TaskUpdate,
) -> Result<Task, DomainError> {
    let model = tasks::Entity::find_by_id(task_id)
        .filter(tasks::Column::UserId.eq(user_id))
        .one(conn)
        .await
        .map_err(map_db_err)?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Task, "Task not found"))?;

    let mut active: tasks::ActiveModel = model.into();
    if let Some(title) = update.title {
        active.title = Set(title);
    }
    if let Some(description) = update.description {
        active.description = Set(description);
    }
    if let Some(status) = update.status {
        active.status = Set(status);
    }
    if let Some(priority) = update.priority {
        active.priority = Set(priority);
    }
    if let Some(due_date) = update.due_date {
        active.due_date = Set(due_date);
    }
    active.updated_at = Set(OffsetDateTime::now_utc());

    let model = active.update(conn).await.map_err(map_db_err)?;
    Ok(Task::from(model))
}

pub async fn delete_for_user<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    task_id: Uuid,
) -> Result<(), DomainError> {
    let result = tasks::Entity::delete_by_id(task_id)
        .filter(tasks::Column::UserId.eq(user_id))
        .exec(conn)
        .await
        .map_err(map_db_err)?;

    if result.rows_affected == 0 {
        return Err(DomainError::not_found(NotFoundKind::Task, "Task not found"));
    }
    Ok(())
}

pub async fn stats_for_user<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    now: OffsetDateTime,
) -> Result<TaskStats, DomainError> {
    let by_user = tasks::Entity::find().filter(tasks::Column::UserId.eq(user_id));

    let total = by_user.clone().count(conn).await.map_err(map_db_err)?;
    let todo = by_user
        .clone()
        .filter(tasks::Column::Status.eq(TaskStatus::Todo))
        .count(conn)
        .await
        .map_err(map_db_err)?;
    let in_progress = by_user
        .clone()
        .filter(tasks::Column::Status.eq(TaskStatus::InProgress))
        .count(conn)
        .await
        .map_err(map_db_err)?;
    let done = by_user
        .clone()
        .filter(tasks::Column::Status.eq(TaskStatus::Done))
        .count(conn)
        .await
        .map_err(map_db_err)?;
    let overdue = by_user
        .filter(tasks::Column::Status.ne(TaskStatus::Done))
        .filter(tasks::Column::DueDate.lt(now))
        .count(conn)
        .await
        .map_err(map_db_err)?;

    Ok(TaskStats {
        total,
        todo,
        in_progress,
        done,
        overdue,
    })
}

impl From<tasks::Model> for Task {
    fn from(model: tasks::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            description: model.description,
            status: model.status,
            priority: model.priority,
            due_date: model.due_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
