//! Uploaded File Serving
//!
//! Serves profile pictures and employee documents stored by
//! [`crate::services::FileStorage`]. Public routes: stored names are
//! unguessable content hashes, and the URLs are embedded in profile
//! payloads that already sit behind authentication.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use http::header;

use crate::core::ServerState;

/// Uploaded file router
pub fn router() -> Router<ServerState> {
    Router::new().route("/uploads/{category}/{filename}", get(serve_upload))
}

enum ServeFileResponse {
    Ok(Vec<u8>, String),
    NotFound,
}

impl IntoResponse for ServeFileResponse {
    fn into_response(self) -> axum::response::Response {
        match self {
            ServeFileResponse::Ok(content, mime) => (
                http::StatusCode::OK,
                [(header::CONTENT_TYPE, mime)],
                content,
            )
                .into_response(),
            ServeFileResponse::NotFound => {
                (http::StatusCode::NOT_FOUND, "File not found").into_response()
            }
        }
    }
}

/// Serve an uploaded file by category and stored name
async fn serve_upload(
    State(state): State<ServerState>,
    Path((category, filename)): Path<(String, String)>,
) -> ServeFileResponse {
    // resolve() rejects unknown categories and traversal attempts
    let Some(path) = state.storage.resolve(&category, &filename) else {
        return ServeFileResponse::NotFound;
    };

    match tokio::fs::read(&path).await {
        Ok(content) => {
            let mime = mime_guess::from_path(&filename)
                .first_or_octet_stream()
                .to_string();
            ServeFileResponse::Ok(content, mime)
        }
        Err(e) => {
            tracing::debug!(category = %category, file = %filename, "Upload not found: {}", e);
            ServeFileResponse::NotFound
        }
    }
}
