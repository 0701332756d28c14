//! File depot handlers.

use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::header,
    response::Response,
    Json,
};
use std::sync::Arc;
use utoipa;

use crate::scale::{self, ScaledFile};
use crate::storage::{UploadFile, UploadReconstructor};
use crate::web::dto::{ApiResponse, ScaleQuery, UploadResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::{content_type, Result};

/// GET /files/{path} - Serve a stored file, optionally scaled.
///
/// The `scale` query applies only to image content; blank values are
/// ignored. Non-image content is served unchanged regardless of the query.
#[utoipa::path(
    get,
    path = "/files/{path}",
    tag = "files",
    params(
        ("path" = String, Path, description = "File path relative to the storage root"),
        ("scale" = Option<String>, Query, description = "Scale factor for images: percentage (\"50%\") or decimal (\"0.5\")")
    ),
    responses(
        (status = 200, description = "File content"),
        (status = 400, description = "Malformed or non-positive scale factor"),
        (status = 403, description = "Path escapes the storage root"),
        (status = 404, description = "File not found")
    )
)]
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    Query(query): Query<ScaleQuery>,
) -> std::result::Result<Response<Body>, ApiError> {
    let resolver = state.resolver.clone();
    let cache_max_age = state.cache_max_age;

    let scale_spec = query
        .scale
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    // Path resolution, file reads and image work all block
    let served = tokio::task::spawn_blocking(move || -> Result<ScaledFile> {
        let target = resolver.resolve(&path)?;
        let declared = content_type::lookup(&target);
        let bytes = std::fs::read(&target)?;

        match scale_spec {
            Some(spec) => scale::maybe_scale(bytes, &declared, &spec),
            None => Ok(ScaledFile {
                bytes,
                content_type: declared,
            }),
        }
    })
    .await
    .map_err(|e| {
        tracing::error!("File task failed: {}", e);
        ApiError::internal("Failed to serve file")
    })??;

    let response = Response::builder()
        .header(header::CONTENT_TYPE, served.content_type)
        .header(header::CONTENT_LENGTH, served.bytes.len())
        .header(
            header::CACHE_CONTROL,
            format!("public, max-age={cache_max_age}"),
        )
        .body(Body::from(served.bytes))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })?;

    Ok(response)
}

/// GET /files - Reject file requests carrying no path.
pub async fn missing_path() -> ApiError {
    ApiError::bad_request("No path provided")
}

/// POST /files/Upload - Bulk upload preserving client directory structure.
///
/// Request body: multipart/form-data with repeated "files" parts (the part
/// file name carries the relative path), repeated "dirs" text fields and an
/// optional "path" text field naming the base directory under the root.
/// Every field is optional: an upload with no entries still ensures the
/// base directory exists and reports where it resolved.
#[utoipa::path(
    post,
    path = "/files/Upload",
    tag = "files",
    responses(
        (status = 200, description = "Upload complete", body = UploadResponse),
        (status = 400, description = "Invalid multipart data, invalid names, or file too large"),
        (status = 403, description = "An upload target escapes the storage root"),
        (status = 500, description = "Write failure")
    )
)]
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> std::result::Result<Json<ApiResponse<UploadResponse>>, ApiError> {
    let mut base_path = String::new();
    let mut dirs: Vec<String> = Vec::new();
    let mut files: Vec<UploadFile> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        ApiError::bad_request("Invalid multipart data")
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "files" => {
                let relative_path = field.file_name().unwrap_or("").to_string();
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| {
                        tracing::error!("Failed to read file content: {}", e);
                        ApiError::bad_request("Failed to read file")
                    })?
                    .to_vec();

                if content.len() as u64 > state.max_upload_size {
                    let max_mb = state.max_upload_size / 1024 / 1024;
                    return Err(ApiError::bad_request(format!(
                        "File too large (max {}MB)",
                        max_mb
                    )));
                }

                files.push(UploadFile {
                    relative_path,
                    content,
                });
            }
            "dirs" => {
                dirs.push(field.text().await.map_err(|e| {
                    tracing::error!("Failed to read dirs field: {}", e);
                    ApiError::bad_request("Invalid dirs field")
                })?);
            }
            "path" => {
                base_path = field.text().await.map_err(|e| {
                    tracing::error!("Failed to read path field: {}", e);
                    ApiError::bad_request("Invalid path field")
                })?;
            }
            _ => {}
        }
    }

    let reconstructor = UploadReconstructor::new(state.resolver.clone());
    let outcome =
        tokio::task::spawn_blocking(move || reconstructor.reconstruct(&base_path, &dirs, files))
            .await
            .map_err(|e| {
                tracing::error!("Upload task failed: {}", e);
                ApiError::internal("Failed to save upload")
            })??;

    tracing::info!(
        files = outcome.files_written,
        dirs = outcome.dirs_created,
        saved_to = %outcome.saved_to.display(),
        "Upload complete"
    );

    Ok(Json(ApiResponse::new(UploadResponse {
        message: "Upload complete".to_string(),
        saved_to: outcome.saved_to.display().to_string(),
    })))
}
