//! Profile API Module

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

/// Profile router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/profile", routes())
}

fn routes() -> Router<ServerState> {
    // Ownership and admin checks live in the handlers: most routes are
    // owner-or-admin, which a route layer cannot decide.
    Router::new()
        .route("/me", get(handler::my_profile))
        .route("/all", get(handler::all_employees))
        .route(
            "/{employee_id}",
            get(handler::get_profile).put(handler::update_profile),
        )
        .route(
            "/{employee_id}/upload-picture",
            post(handler::upload_picture),
        )
        .route(
            "/{employee_id}/upload-document",
            post(handler::upload_document),
        )
        .route(
            "/{employee_id}/document/{document_id}",
            delete(handler::delete_document),
        )
}
