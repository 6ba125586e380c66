//! Bearer token authentication middleware

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::domain::entities::User;
use crate::error::AppError;
use crate::AppState;

/// Extract the token from the Authorization header
fn extract_bearer(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authentication middleware
///
/// Resolves the token to a user and injects the `User` into request
/// extensions. Banned accounts are refused even with a valid token.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer(&request).ok_or(AppError::Unauthorized)?;

    let user = state
        .user_service
        .authenticate(token)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !user.is_active() {
        tracing::debug!(user_id = %user.id, "Rejected banned user");
        return Err(AppError::Forbidden);
    }

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Admin gate; must run after `auth_middleware`
pub async fn require_admin(request: Request<Body>, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<User>()
        .ok_or(AppError::Unauthorized)?;

    if !user.is_admin() {
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}
