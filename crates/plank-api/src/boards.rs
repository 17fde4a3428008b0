use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;
use uuid::Uuid;

use plank_core::access::{authorize_board_delete, resolve};
use plank_core::outcome::ResourceKind;
use plank_core::resolve_access;
use plank_types::api::{
    Claims, CreateBoardRequest, FindBoardsQuery, MessageResponse, UpdateBoardRequest,
};
use plank_types::models::{Board, Role, Visibility};

use crate::auth::AppState;
use crate::error::{ApiError, require};

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.is_empty() || title.len() > 50 {
        return Err(ApiError::BadRequest("title must be 1-50 characters".into()));
    }
    Ok(())
}

pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateBoardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_title(&req.title)?;
    let visibility = req.visibility.unwrap_or(Visibility::Public);
    let id = Uuid::new_v4();

    state.db.create_board(
        &id.to_string(),
        &claims.sub.to_string(),
        &req.title,
        req.description.as_deref(),
        visibility.as_str(),
        req.cover_image.as_deref(),
    )?;

    Ok((
        StatusCode::CREATED,
        Json(Board {
            id,
            owner_id: claims.sub,
            title: req.title,
            description: req.description,
            visibility,
            cover_image: req.cover_image,
            created_at: chrono::Utc::now(),
        }),
    ))
}

pub async fn find(
    State(state): State<AppState>,
    Query(query): Query<FindBoardsQuery>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let visibility = query.visibility.unwrap_or(Visibility::Public);
    let take = query.take.unwrap_or(20).min(100);
    let skip = query.skip.unwrap_or(0);

    let db = state.clone();
    let viewer = claims.sub.to_string();
    let owner = query.owner_id.map(|id| id.to_string());

    let rows = tokio::task::spawn_blocking(move || {
        db.db
            .find_boards(visibility.as_str(), &viewer, owner.as_deref(), take, skip)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(anyhow::anyhow!("worker task failed"))
    })??;

    let boards = rows
        .into_iter()
        .map(|row| row.into_model())
        .collect::<anyhow::Result<Vec<Board>>>()?;

    Ok(Json(boards))
}

pub async fn find_by_id(
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

    let row = state
        .db
        .get_board(&board_id.to_string())?
        .ok_or_else(|| ApiError::NotFound(ResourceKind::Board.not_found_message()))?;

    Ok(Json(row.into_model()?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateBoardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(title) = req.title.as_deref() {
        validate_title(title)?;
    }

    let access = resolve_access(
        &state.db,
        ResourceKind::Board,
        board_id,
        claims.sub,
        Role::Admin,
    )?;
    require(access)?;

    state.db.update_board(
        &board_id.to_string(),
        req.title.as_deref(),
        req.description.as_deref(),
        req.visibility.map(|v| v.as_str()),
        req.cover_image.as_deref(),
    )?;

    let row = state
        .db
        .get_board(&board_id.to_string())?
        .ok_or_else(|| ApiError::NotFound(ResourceKind::Board.not_found_message()))?;

    Ok(Json(row.into_model()?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let resolution = resolve(&state.db, ResourceKind::Board, board_id, claims.sub)?;
    require(authorize_board_delete(&resolution, claims.sub))?;

    state.db.delete_board(&board_id.to_string())?;

    Ok(Json(MessageResponse {
        message: "the board has been deleted".into(),
    }))
}
