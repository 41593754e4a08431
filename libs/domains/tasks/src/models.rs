use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::StringLen;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Task status
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
}

/// A task owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    /// Calendar date, `YYYY-MM-DD`
    pub deadline: Option<NaiveDate>,
    /// Owning user
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new task
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTask {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    pub deadline: Option<NaiveDate>,
}

/// DTO for updating an existing task
///
/// `description` and `deadline` distinguish a missing field (keep) from an
/// explicit `null` (clear).
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTask {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 2000))]
    #[schema(value_type = Option<String>, nullable)]
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<NaiveDate>, nullable)]
    pub deadline: Option<Option<NaiveDate>>,
}

/// Present-but-null becomes `Some(None)`; absence is handled by `#[serde(default)]`.
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Ordering of a task listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskSort {
    /// Earliest deadline first, tasks without one last, then by creation time
    #[default]
    Deadline,
    /// Oldest first
    CreatedAt,
}

/// Query parameters for listing a user's tasks
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TaskFilter {
    /// Only tasks with this status
    pub status: Option<TaskStatus>,
    /// Case-insensitive substring of title or description
    #[validate(length(max = 200))]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: TaskSort,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u64,
    /// Rows to skip; bounded by the database's signed 64-bit OFFSET
    #[serde(default)]
    #[validate(range(max = 9_223_372_036_854_775_807u64))]
    pub offset: u64,
}

fn default_limit() -> u64 {
    20
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self {
            status: None,
            search: None,
            sort: TaskSort::default(),
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl TaskFilter {
    /// Trimmed search term, `None` when absent or blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

/// One page of a task listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskPage {
    /// Tasks matching the owner, status and search, ignoring limit/offset
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    pub data: Vec<Task>,
}

impl Task {
    pub fn new(user_id: Uuid, input: CreateTask) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: input.title,
            description: input.description,
            status: input.status,
            deadline: input.deadline,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply updates from UpdateTask DTO
    pub fn apply_update(&mut self, update: UpdateTask) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(deadline) = update.deadline {
            self.deadline = deadline;
        }
        self.updated_at = Utc::now();
    }
}
