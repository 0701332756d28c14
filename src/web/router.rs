//! Router configuration for Web API.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::file::{get_file, missing_path, upload_files};
use super::handlers::AppState;
use super::middleware::{create_cors_layer, security_headers};

/// OpenAPI document for the depot API.
#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::file::get_file,
        super::handlers::file::upload_files
    ),
    components(schemas(super::dto::UploadResponse)),
    tags(
        (name = "files", description = "File depot: retrieval, scaling and bulk upload")
    )
)]
struct ApiDoc;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    // Whole-request ceiling; the per-file check in the upload handler is
    // stricter. Folder uploads carry many files per request.
    let body_limit = (app_state.max_upload_size as usize).saturating_mul(8);

    let file_routes = Router::new()
        .route("/files", get(missing_path))
        .route("/files/", get(missing_path))
        .route("/files/Upload", post(upload_files))
        .route("/files/*path", get(get_file));

    Router::new()
        .merge(file_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(security_headers))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Create the Swagger UI router.
pub fn create_swagger_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Create a router serving the built browser UI, if the directory exists.
pub fn create_static_router(ui_path: &str) -> Option<Router> {
    let dir = std::path::Path::new(ui_path);
    if !dir.is_dir() {
        tracing::warn!("UI path {} does not exist; not serving the UI", ui_path);
        return None;
    }

    let serve = ServeDir::new(dir).append_index_html_on_directories(true);
    Some(Router::new().fallback_service(serve))
}
