use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use plank_core::outcome::ResourceKind;
use plank_core::resolve_access;
use plank_types::api::{Claims, MessageResponse, UpdateLabelRequest};
use plank_types::models::{Label, Role};

use crate::auth::AppState;
use crate::error::{ApiError, require};

pub async fn find(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let access = resolve_access(
        &state.db,
        ResourceKind::Board,
        board_id,
        claims.sub,
        Role::Member,
    )?;
    require(access)?;

    let rows = state.db.find_board_labels(&board_id.to_string())?;
    let labels = rows
        .into_iter()
        .map(|row| row.into_model())
        .collect::<anyhow::Result<Vec<Label>>>()?;

    Ok(Json(labels))
}

pub async fn update(
    State(state): State<AppState>,
    Path((board_id, label_id)): Path<(Uuid, Uuid)>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateLabelRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(title) = req.title.as_deref() {
        if title.is_empty() || title.len() > 30 {
            return Err(ApiError::BadRequest("title must be 1-30 characters".into()));
        }
    }

    let access = resolve_access(
        &state.db,
        ResourceKind::Board,
        board_id,
        claims.sub,
        Role::Member,
    )?;
    require(access)?;

    let row = state
        .db
        .get_label(&label_id.to_string())?
        .ok_or_else(|| ApiError::NotFound(ResourceKind::Label.not_found_message()))?;
    if row.board_id != board_id.to_string() {
        return Err(ApiError::NotFound(ResourceKind::Label.not_found_message()));
    }

    state.db.update_label(
        &label_id.to_string(),
        req.title.as_deref(),
        req.color.map(|c| c.as_str()),
    )?;

    let row = state
        .db
        .get_label(&label_id.to_string())?
        .ok_or_else(|| ApiError::NotFound(ResourceKind::Label.not_found_message()))?;

    Ok(Json(row.into_model()?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((board_id, label_id)): Path<(Uuid, Uuid)>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let access = resolve_access(
        &state.db,
        ResourceKind::Board,
        board_id,
        claims.sub,
        Role::Member,
    )?;
    require(access)?;

    let row = state
        .db
        .get_label(&label_id.to_string())?
        .ok_or_else(|| ApiError::NotFound(ResourceKind::Label.not_found_message()))?;
    if row.board_id != board_id.to_string() {
        return Err(ApiError::NotFound(ResourceKind::Label.not_found_message()));
    }

    state.db.delete_label(&label_id.to_string())?;

    Ok(Json(MessageResponse {
        message: "the label has been deleted".into(),
    }))
}
