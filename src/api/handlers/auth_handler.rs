//! Registration and diagnostics handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::{DATABASE_CONNECTED, MSG_REGISTERED};
use crate::domain::RegistrationRequest;
use crate::errors::AppResult;

/// Registration confirmation (never carries the hash)
#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationResponse {
    /// Confirmation message
    #[schema(example = "User registered successfully")]
    pub message: String,
    /// Registered username
    #[schema(example = "testuser")]
    pub username: String,
}

/// Database diagnostics
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DbInfoResponse {
    /// Number of registered users
    #[schema(example = 42)]
    pub user_count: u64,
    /// Connectivity status
    #[schema(example = "connected")]
    pub database: String,
    /// Active deployment profiles
    #[schema(example = json!(["prod"]))]
    pub profiles: Vec<String>,
}

/// Create registration routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/db-info", get(db_info))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Registration",
    request_body = RegistrationRequest,
    responses(
        (status = 201, description = "User registered successfully", body = RegistrationResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username or email already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegistrationRequest>,
) -> AppResult<(StatusCode, Json<RegistrationResponse>)> {
    let user = state.registration.register(Some(payload)).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse {
            message: MSG_REGISTERED.to_string(),
            username: user.username,
        }),
    ))
}

/// Report database connectivity
#[utoipa::path(
    get,
    path = "/api/auth/db-info",
    tag = "Diagnostics",
    responses(
        (status = 200, description = "Database reachable", body = DbInfoResponse),
        (status = 500, description = "Database connection failed")
    )
)]
pub async fn db_info(State(state): State<AppState>) -> AppResult<Json<DbInfoResponse>> {
    let user_count = state.registration.count_users().await?;

    Ok(Json(DbInfoResponse {
        user_count,
        database: DATABASE_CONNECTED.to_string(),
        profiles: state.profiles.to_vec(),
    }))
}
