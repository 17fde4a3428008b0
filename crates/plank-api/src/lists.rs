use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;
use uuid::Uuid;

use plank_core::outcome::ResourceKind;
use plank_core::resolve_access;
use plank_types::api::{Claims, CreateListRequest, MessageResponse, UpdateListRequest};
use plank_types::models::{List, Role};

use crate::auth::AppState;
use crate::error::{ApiError, require};

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.is_empty() || title.len() > 30 {
        return Err(ApiError::BadRequest("title must be 1-30 characters".into()));
    }
    Ok(())
}

pub async fn create(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateListRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_title(&req.title)?;

    let access = resolve_access(
        &state.db,
        ResourceKind::Board,
        board_id,
        claims.sub,
        Role::Member,
    )?;
    require(access)?;

    let id = Uuid::new_v4();
    let position = state
        .db
        .create_list(&id.to_string(), &board_id.to_string(), &req.title)?;

    Ok((
        StatusCode::CREATED,
        Json(List {
            id,
            board_id,
            title: req.title,
            position,
            created_at: chrono::Utc::now(),
        }),
    ))
}

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

    let rows = state.db.find_board_lists(&board_id.to_string())?;
    let lists = rows
        .into_iter()
        .map(|row| row.into_model())
        .collect::<anyhow::Result<Vec<List>>>()?;

    Ok(Json(lists))
}

pub async fn update(
    State(state): State<AppState>,
    Path((board_id, list_id)): Path<(Uuid, Uuid)>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateListRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(title) = req.title.as_deref() {
        validate_title(title)?;
    }
    if let Some(position) = req.position {
        if position < 0 {
            return Err(ApiError::BadRequest("position must be non-negative".into()));
        }
    }

    let access = resolve_access(
        &state.db,
        ResourceKind::List,
        list_id,
        claims.sub,
        Role::Member,
    )?;
    let ctx = require(access)?;
    // The caller named this list via a board path; a list on some other
    // board is not theirs to see.
    if ctx.board.id != board_id {
        return Err(ApiError::NotFound(ResourceKind::List.not_found_message()));
    }

    if let Some(title) = req.title.as_deref() {
        state.db.update_list_title(&list_id.to_string(), title)?;
    }

    if let Some(target) = req.position {
        let db = state.clone();
        let id = list_id.to_string();
        let found = tokio::task::spawn_blocking(move || db.db.reposition_list(&id, target))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                ApiError::Internal(anyhow::anyhow!("worker task failed"))
            })??;
        if !found {
            return Err(ApiError::NotFound(ResourceKind::List.not_found_message()));
        }
    }

    let row = state
        .db
        .get_list(&list_id.to_string())?
        .ok_or_else(|| ApiError::NotFound(ResourceKind::List.not_found_message()))?;

    Ok(Json(row.into_model()?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((board_id, list_id)): Path<(Uuid, Uuid)>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let access = resolve_access(
        &state.db,
        ResourceKind::List,
        list_id,
        claims.sub,
        Role::Member,
    )?;
    let ctx = require(access)?;
    if ctx.board.id != board_id {
        return Err(ApiError::NotFound(ResourceKind::List.not_found_message()));
    }

    // Siblings are not renumbered; append tolerates the gap.
    state.db.delete_list(&list_id.to_string())?;

    Ok(Json(MessageResponse {
        message: "the list has been deleted".into(),
    }))
}
