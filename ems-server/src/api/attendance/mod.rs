//! Attendance API Module

mod handler;

use axum::{
    Router,
    middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Attendance router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/attendance", routes())
}

fn routes() -> Router<ServerState> {
    // Employee routes: everyone manages their own day.
    let employee_routes = Router::new()
        .route("/check-in", post(handler::check_in))
        .route("/check-out", post(handler::check_out))
        .route("/today", get(handler::today))
        .route("/my-attendance", get(handler::my_attendance));

    // Management routes: ADMIN/HR only.
    let admin_routes = Router::new()
        .route("/all", get(handler::all_attendance))
        .route("/summary", get(handler::summary))
        .route("/export/excel", get(handler::export_attendance_csv))
        .route("/export/employees", get(handler::export_employees_csv))
        .route("/mark", post(handler::mark))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_admin));

    employee_routes.merge(admin_routes)
}
