//! Authentication middleware.
//!
//! `require_auth` guards everything under `/api/` except the public
//! auth routes. It validates the session token, re-reads the account
//! from the database and injects a [`CurrentUser`] into the request.
//! `require_admin` narrows a route tree to management roles.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::auth::jwt::{self, JwtError, JwtService};
use crate::core::ServerState;
use crate::db::models::{CompanyId, Role, User, UserId};
use crate::db::repository::UserRepository;
use crate::security_log;
use shared::error::{AppError, ErrorCode};

/// The authenticated account behind the current request, rebuilt from
/// the database on every request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    pub company: CompanyId,
}

impl CurrentUser {
    pub fn from_user(user: &User) -> Result<Self, AppError> {
        let id = user
            .id
            .clone()
            .ok_or_else(|| AppError::internal("User record missing id"))?;
        Ok(Self {
            id,
            email: user.email.clone(),
            role: user.role.clone(),
            company: user.company.clone(),
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(AppError::unauthorized)
    }
}

/// Routes reachable without a session.
fn is_public_api_route(path: &str) -> bool {
    matches!(
        path,
        "/api/health"
            | "/api/auth/signup"
            | "/api/auth/signin"
            | "/api/auth/verify-email"
            | "/api/auth/resend-verification"
    )
}

/// Pull the session token out of the cookie, falling back to a Bearer
/// header for non-browser clients.
fn token_from_request(req: &Request) -> Option<&str> {
    let from_cookie = req
        .headers()
        .get(http::header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(jwt::token_from_cookies);
    if from_cookie.is_some() {
        return from_cookie;
    }

    req.headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header)
}

/// Authentication middleware over the whole `/api` tree.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // CORS preflight passes through untouched.
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Non-API paths (uploads, 404s) are not session-guarded.
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_api_route(path) {
        return Ok(next.run(req).await);
    }

    let token = match token_from_request(&req) {
        Some(token) => token.to_string(),
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::with_message(
                ErrorCode::NotAuthenticated,
                "Please log in to access this resource",
            ));
        }
    };

    let claims = match state.jwt_service.validate_token(&token) {
        Ok(claims) => claims,
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );
            return Err(match e {
                JwtError::ExpiredToken => AppError::with_message(
                    ErrorCode::TokenExpired,
                    "Token expired. Please log in again",
                ),
                _ => AppError::with_message(
                    ErrorCode::TokenInvalid,
                    "Invalid token. Please log in again",
                ),
            });
        }
    };

    // The token only names the account; role and active state come from
    // the database so revocations apply immediately.
    let users = UserRepository::new(state.db.clone());
    let user = users
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::NotAuthenticated,
                "User not found. Please log in again",
            )
        })?;

    if !user.is_active {
        security_log!("WARN", "auth_deactivated", user_id = claims.sub.clone());
        return Err(AppError::with_message(
            ErrorCode::AccountDisabled,
            "Your account has been deactivated",
        ));
    }

    let current = CurrentUser::from_user(&user)?;
    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

/// Management-role middleware. Attach inside `require_auth` so the
/// extension is already populated.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::unauthorized)?;

    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id.to_string(),
            user_role = user.role.as_str()
        );
        return Err(AppError::with_message(
            ErrorCode::AdminRequired,
            format!(
                "Role '{}' is not authorized to access this resource",
                user.role.as_str()
            ),
        ));
    }

    Ok(next.run(req).await)
}
