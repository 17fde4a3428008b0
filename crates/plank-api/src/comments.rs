use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use plank_core::access::{authorize_author, resolve};
use plank_core::outcome::ResourceKind;
use plank_core::resolve_access;
use plank_types::api::{
    Claims, CreateCommentRequest, MessageResponse, PageQuery, UpdateCommentRequest,
};
use plank_types::models::{Comment, Role};

use crate::auth::AppState;
use crate::error::{ApiError, require};

fn validate_content(content: &str) -> Result<(), ApiError> {
    if content.is_empty() || content.len() > 1500 {
        return Err(ApiError::BadRequest(
            "content must be 1-1500 characters".into(),
        ));
    }
    Ok(())
}

pub async fn create(
    State(state): State<AppState>,
    Path(card_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_content(&req.content)?;

    let access = resolve_access(
        &state.db,
        ResourceKind::Card,
        card_id,
        claims.sub,
        Role::Member,
    )?;
    require(access)?;

    let id = Uuid::new_v4();
    state.db.create_comment(
        &id.to_string(),
        &card_id.to_string(),
        &claims.sub.to_string(),
        &req.content,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(Comment {
            id,
            card_id,
            user_id: claims.sub,
            content: req.content,
            created_at: chrono::Utc::now(),
        }),
    ))
}

pub async fn find(
    State(state): State<AppState>,
    Path(card_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let access = resolve_access(
        &state.db,
        ResourceKind::Card,
        card_id,
        claims.sub,
        Role::Member,
    )?;
    require(access)?;

    let rows = state.db.find_card_comments(
        &card_id.to_string(),
        query.take.unwrap_or(50).min(200),
        query.skip.unwrap_or(0),
    )?;
    let comments = rows
        .into_iter()
        .map(|row| row.into_model())
        .collect::<anyhow::Result<Vec<Comment>>>()?;

    Ok(Json(comments))
}

pub async fn update(
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_content(&req.content)?;

    let resolution = resolve(&state.db, ResourceKind::Comment, comment_id, claims.sub)?;
    require(authorize_author(&resolution, claims.sub))?;

    state
        .db
        .update_comment(&comment_id.to_string(), &req.content)?;

    let row = state
        .db
        .get_comment(&comment_id.to_string())?
        .ok_or_else(|| ApiError::NotFound(ResourceKind::Comment.not_found_message()))?;

    Ok(Json(row.into_model()?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let resolution = resolve(&state.db, ResourceKind::Comment, comment_id, claims.sub)?;
    require(authorize_author(&resolution, claims.sub))?;

    state.db.delete_comment(&comment_id.to_string())?;

    Ok(Json(MessageResponse {
        message: "the comment has been deleted".into(),
    }))
}
