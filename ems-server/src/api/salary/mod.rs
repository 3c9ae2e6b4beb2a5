//! Salary API Module

mod handler;

use axum::{
    Router,
    middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Salary router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/salary", routes())
}

fn routes() -> Router<ServerState> {
    // Employee routes: own breakdown and history.
    let employee_routes = Router::new()
        .route("/my-salary", get(handler::my_salary))
        .route("/my-history", get(handler::my_history));

    // Management routes: ADMIN/HR only.
    let admin_routes = Router::new()
        .route("/all", get(handler::all_salaries))
        .route("/statistics", get(handler::statistics))
        .route("/{employee_id}", put(handler::update_salary))
        .layer(middleware::from_fn(require_admin));

    employee_routes.merge(admin_routes)
}
