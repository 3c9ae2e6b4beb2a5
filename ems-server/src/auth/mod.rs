//! Authentication module
//!
//! JWT session handling and route guards:
//! - [`JwtService`] - token issue/validate plus cookie helpers
//! - [`CurrentUser`] - the account behind the request
//! - [`require_auth`] / [`require_admin`] - Axum middleware

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{CurrentUser, require_admin, require_auth};
