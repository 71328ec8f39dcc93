//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::auth_handler;
use crate::domain::RegistrationRequest;

/// OpenAPI documentation for the registration service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Registration Service",
        version = "0.1.0",
        description = "User registration with unique usernames and emails.\n\n\
            Errors use the body `{\"error\": {\"code\", \"message\"}}`. \
            A taken username or email returns `409 Conflict` (`DUPLICATE_USERNAME` / \
            `DUPLICATE_EMAIL`), not `400` with `{\"error\": \"...\"}`. \
            `/api/auth/db-info` reports active profiles as the `profiles` array \
            rather than a single `profile` string.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::db_info,
    ),
    components(
        schemas(
            RegistrationRequest,
            auth_handler::RegistrationResponse,
            auth_handler::DbInfoResponse,
        )
    ),
    tags(
        (name = "Registration", description = "User registration"),
        (name = "Diagnostics", description = "Database connectivity")
    )
)]
pub struct ApiDoc;
