//! Leave API Module

mod handler;

pub(crate) use handler::{LeaveBalance, balance_rows};

use axum::{
    Router,
    middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Leave router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/leave", routes())
}

fn routes() -> Router<ServerState> {
    // Employee routes: apply, track, cancel own requests.
    let employee_routes = Router::new()
        .route("/apply", post(handler::apply))
        .route("/my-leaves", get(handler::my_leaves))
        .route("/my-balance", get(handler::my_balance))
        .route("/types", get(handler::list_types))
        .route("/{id}", delete(handler::cancel));

    // Management routes: ADMIN/HR only.
    let admin_routes = Router::new()
        .route("/all", get(handler::all_requests))
        .route("/statistics", get(handler::statistics))
        .route("/types", post(handler::create_type))
        .route("/{id}/status", put(handler::update_status))
        .layer(middleware::from_fn(require_admin));

    employee_routes.merge(admin_routes)
}
