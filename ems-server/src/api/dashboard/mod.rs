//! Dashboard API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Dashboard router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/dashboard", routes())
}

fn routes() -> Router<ServerState> {
    let employee_routes = Router::new().route("/employee-stats", get(handler::employee_stats));

    let admin_routes = Router::new()
        .route("/admin-stats", get(handler::admin_stats))
        .layer(middleware::from_fn(require_admin));

    employee_routes.merge(admin_routes)
}
