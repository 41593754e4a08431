use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    ApiJson, ApiPath, AppError, CurrentUser, ErrorResponse, JwtAuth, ValidatedJson,
    jwt_auth_middleware,
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::UserResult;
use crate::models::{CreateUser, LoginRequest, TokenResponse, UpdateUser, UserResponse};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const TAG: &str = "users";

/// OpenAPI documentation for the users API
#[derive(OpenApi)]
#[openapi(
    paths(signup, login, me, get_user, update_user, delete_user),
    components(schemas(
        CreateUser,
        UpdateUser,
        LoginRequest,
        TokenResponse,
        UserResponse,
        ErrorResponse
    )),
    tags((name = TAG, description = "Accounts and login"))
)]
pub struct ApiDoc;

/// Handler state: the service plus the token issuer used by login.
pub struct UserState<R: UserRepository> {
    pub service: UserService<R>,
    pub auth: JwtAuth,
}

type SharedState<R> = State<Arc<UserState<R>>>;

/// Create the users router.
///
/// Signup and login are public; every other route requires a bearer token.
pub fn router<R: UserRepository + 'static>(service: UserService<R>, auth: JwtAuth) -> Router {
    let state = Arc::new(UserState {
        service,
        auth: auth.clone(),
    });

    let public = Router::new()
        .route("/", post(signup::<R>))
        .route("/login", post(login::<R>));

    let protected = Router::new()
        .route("/me", get(me::<R>))
        .route(
            "/{user_id}",
            get(get_user::<R>)
                .put(update_user::<R>)
                .delete(delete_user::<R>),
        )
        .route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware));

    public.merge(protected).with_state(state)
}

/// Register a new account
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateUser,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
async fn signup<R: UserRepository>(
    State(state): SharedState<R>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let user = state.service.signup(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Exchange email and password for a bearer token
#[utoipa::path(
    post,
    path = "/login",
    tag = TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Incorrect email or password", body = ErrorResponse),
        (status = 403, description = "Account inactive", body = ErrorResponse)
    )
)]
async fn login<R: UserRepository>(
    State(state): SharedState<R>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = state.service.verify_credentials(&input).await?;
    let token = state.auth.create_token(user.id, &user.email, &user.name)?;

    tracing::info!(user_id = %user.id, "Issued access token");
    Ok(Json(TokenResponse::bearer(token, state.auth.expiration_secs())))
}

/// The authenticated caller's own account
#[utoipa::path(
    get,
    path = "/me",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    )
)]
async fn me<R: UserRepository>(
    State(state): SharedState<R>,
    current: CurrentUser,
) -> UserResult<Json<UserResponse>> {
    let user = state.service.get_user(current.id).await?;
    Ok(Json(user))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{user_id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(state): SharedState<R>,
    current: CurrentUser,
    ApiPath(user_id): ApiPath<Uuid>,
) -> UserResult<Json<UserResponse>> {
    let user = state.service.get_user_for(current.id, user_id).await?;
    Ok(Json(user))
}

/// Partially update a user
#[utoipa::path(
    put,
    path = "/{user_id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("user_id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(state): SharedState<R>,
    current: CurrentUser,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<UpdateUser>,
) -> UserResult<Json<UserResponse>> {
    let user = state
        .service
        .update_user_for(current.id, user_id, input)
        .await?;
    Ok(Json(user))
}

/// Delete a user together with all of their tasks
#[utoipa::path(
    delete,
    path = "/{user_id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Not authorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(state): SharedState<R>,
    current: CurrentUser,
    ApiPath(user_id): ApiPath<Uuid>,
) -> UserResult<StatusCode> {
    state.service.delete_user_for(current.id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
