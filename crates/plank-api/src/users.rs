use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use plank_core::access::authorize_self;
use plank_core::outcome::ResourceKind;
use plank_types::api::{Claims, MessageResponse, UpdateUserRequest};

use crate::auth::{AppState, hash_password};
use crate::error::{ApiError, require};

pub async fn find_by_id(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .db
        .get_user_by_id(&user_id.to_string())?
        .ok_or_else(|| ApiError::NotFound(ResourceKind::User.not_found_message()))?;

    Ok(Json(row.into_model()?))
}

/// Self-only: the access-rights check runs before existence, matching the
/// guard-before-lookup order of the rest of the API.
pub async fn update(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require(authorize_self(claims.sub, user_id))?;

    if let Some(username) = req.username.as_deref() {
        if username.len() < 3 || username.len() > 32 {
            return Err(ApiError::BadRequest(
                "username must be 3-32 characters".into(),
            ));
        }
        if let Some(existing) = state.db.get_user_by_username(username)? {
            if existing.id != user_id.to_string() {
                return Err(ApiError::Conflict("username already taken".into()));
            }
        }
    }
    if req.password.as_deref().is_some_and(|p| p.len() < 8) {
        return Err(ApiError::BadRequest(
            "password must be at least 8 characters".into(),
        ));
    }

    let password_hash = req.password.as_deref().map(hash_password).transpose()?;

    let changed = state.db.update_user(
        &user_id.to_string(),
        req.username.as_deref(),
        password_hash.as_deref(),
    )?;
    if changed == 0 {
        return Err(ApiError::NotFound(ResourceKind::User.not_found_message()));
    }

    let row = state
        .db
        .get_user_by_id(&user_id.to_string())?
        .ok_or_else(|| ApiError::NotFound(ResourceKind::User.not_found_message()))?;

    Ok(Json(row.into_model()?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    require(authorize_self(claims.sub, user_id))?;

    let removed = state.db.delete_user(&user_id.to_string())?;
    if removed == 0 {
        return Err(ApiError::NotFound(ResourceKind::User.not_found_message()));
    }

    Ok(Json(MessageResponse {
        message: "the user has been deleted".into(),
    }))
}
