//! Profile handlers

use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use crate::domain::entities::{Caller, ProfileUpdate, User};
use crate::error::AppError;
use crate::AppState;

/// Request body for profile changes; omitted fields are left alone
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub real_name: Option<String>,
    pub avatar: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(request: UpdateProfileRequest) -> Self {
        ProfileUpdate {
            phone: request.phone,
            email: request.email,
            real_name: request.real_name,
            avatar: request.avatar,
        }
    }
}

/// GET /user/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<User>, AppError> {
    let profile = state.user_service.get_profile(&Caller::from(&user)).await?;
    Ok(Json(profile))
}

/// PUT /user/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    let profile = state
        .user_service
        .update_profile(&Caller::from(&user), request.into())
        .await?;
    Ok(Json(profile))
}
