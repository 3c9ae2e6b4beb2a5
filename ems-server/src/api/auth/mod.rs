//! Authentication API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Authentication router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    // signup/signin/verify-email/resend-verification are on the
    // middleware's public path list; logout and me run behind it.
    Router::new()
        .route("/signup", post(handler::signup))
        .route("/signin", post(handler::signin))
        .route("/verify-email", post(handler::verify_email))
        .route("/resend-verification", post(handler::resend_verification))
        .route("/logout", post(handler::logout))
        .route("/me", get(handler::me))
}
