use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    ApiJson, ApiPath, ApiQuery, CurrentUser, ErrorResponse, JwtAuth, jwt_auth_middleware,
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::TaskResult;
use crate::models::{CreateTask, Task, TaskFilter, TaskPage, TaskSort, TaskStatus, UpdateTask};
use crate::repository::TaskRepository;
use crate::service::TaskService;

pub const TAG: &str = "tasks";

/// OpenAPI documentation for the tasks API
#[derive(OpenApi)]
#[openapi(
    paths(list_tasks, create_task, get_task, update_task, delete_task),
    components(schemas(
        Task,
        TaskStatus,
        TaskSort,
        TaskPage,
        CreateTask,
        UpdateTask,
        ErrorResponse
    )),
    tags((name = TAG, description = "Per-user task management"))
)]
pub struct ApiDoc;

type SharedService<R> = State<Arc<TaskService<R>>>;

/// Create the tasks router; every route requires a bearer token.
///
/// Paths start at `/{user_id}/tasks` so the router merges into the users
/// router under the same prefix.
pub fn router<R: TaskRepository + 'static>(service: TaskService<R>, auth: JwtAuth) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/{user_id}/tasks",
            get(list_tasks::<R>).post(create_task::<R>),
        )
        .route(
            "/{user_id}/tasks/{task_id}",
            get(get_task::<R>)
                .put(update_task::<R>)
                .delete(delete_task::<R>),
        )
        .route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware))
        .with_state(shared_service)
}

/// List a user's tasks with filtering, search, sorting and pagination
#[utoipa::path(
    get,
    path = "/{user_id}/tasks",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("user_id" = Uuid, Path, description = "Owning user ID"), TaskFilter),
    responses(
        (status = 200, description = "One page of tasks", body = TaskPage),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn list_tasks<R: TaskRepository>(
    State(service): SharedService<R>,
    current: CurrentUser,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiQuery(filter): ApiQuery<TaskFilter>,
) -> TaskResult<Json<TaskPage>> {
    let page = service.list_tasks(current.id, user_id, filter).await?;
    Ok(Json(page))
}

/// Create a task for a user
#[utoipa::path(
    post,
    path = "/{user_id}/tasks",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("user_id" = Uuid, Path, description = "Owning user ID")),
    request_body = CreateTask,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn create_task<R: TaskRepository>(
    State(service): SharedService<R>,
    current: CurrentUser,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<CreateTask>,
) -> TaskResult<impl IntoResponse> {
    let task = service.create_task(current.id, user_id, input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Get one of a user's tasks
#[utoipa::path(
    get,
    path = "/{user_id}/tasks/{task_id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(
        ("user_id" = Uuid, Path, description = "Owning user ID"),
        ("task_id" = Uuid, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task found", body = Task),
        (status = 403, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "User or task not found", body = ErrorResponse)
    )
)]
async fn get_task<R: TaskRepository>(
    State(service): SharedService<R>,
    current: CurrentUser,
    ApiPath((user_id, task_id)): ApiPath<(Uuid, Uuid)>,
) -> TaskResult<Json<Task>> {
    let task = service.get_task(current.id, user_id, task_id).await?;
    Ok(Json(task))
}

/// Partially update a task; `null` clears description or deadline
#[utoipa::path(
    put,
    path = "/{user_id}/tasks/{task_id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(
        ("user_id" = Uuid, Path, description = "Owning user ID"),
        ("task_id" = Uuid, Path, description = "Task ID")
    ),
    request_body = UpdateTask,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "User or task not found", body = ErrorResponse)
    )
)]
async fn update_task<R: TaskRepository>(
    State(service): SharedService<R>,
    current: CurrentUser,
    ApiPath((user_id, task_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(input): ApiJson<UpdateTask>,
) -> TaskResult<Json<Task>> {
    let task = service
        .update_task(current.id, user_id, task_id, input)
        .await?;
    Ok(Json(task))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/{user_id}/tasks/{task_id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(
        ("user_id" = Uuid, Path, description = "Owning user ID"),
        ("task_id" = Uuid, Path, description = "Task ID")
    ),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 403, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "User or task not found", body = ErrorResponse)
    )
)]
async fn delete_task<R: TaskRepository>(
    State(service): SharedService<R>,
    current: CurrentUser,
    ApiPath((user_id, task_id)): ApiPath<(Uuid, Uuid)>,
) -> TaskResult<StatusCode> {
    service.delete_task(current.id, user_id, task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
