//! Auth handlers
//!
//! Registration and login. Both hand back a bearer token that is only shown
//! once; login replaces any token issued before.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::app::Registration;
use crate::domain::entities::User;
use crate::error::AppError;
use crate::AppState;

/// Request body for registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub phone: String,
    pub email: Option<String>,
    pub real_name: Option<String>,
}

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Issued credentials plus the account they belong to
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    /// Send as `Authorization: Bearer <token>`
    pub token: String,
    pub token_type: &'static str,
}

impl AuthResponse {
    fn new(user: User, token: String) -> Self {
        Self {
            user,
            token,
            token_type: "Bearer",
        }
    }
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let (user, token) = state
        .user_service
        .register(Registration {
            username: request.username,
            password: request.password,
            phone: request.phone,
            email: request.email,
            real_name: request.real_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse::new(user, token))))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (user, token) = state
        .user_service
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(AuthResponse::new(user, token)))
}
