use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;
use uuid::Uuid;

use plank_core::outcome::ResourceKind;
use plank_core::resolve_access;
use plank_types::api::{Claims, CreateCardRequest, MessageResponse, PageQuery, UpdateCardRequest};
use plank_types::models::{Card, Role};

use crate::auth::AppState;
use crate::error::{ApiError, require};

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.is_empty() || title.len() > 30 {
        return Err(ApiError::BadRequest("title must be 1-30 characters".into()));
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> Result<(), ApiError> {
    if description.is_some_and(|d| d.len() > 1500) {
        return Err(ApiError::BadRequest(
            "description must be at most 1500 characters".into(),
        ));
    }
    Ok(())
}

pub async fn create(
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateCardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_title(&req.title)?;
    validate_description(req.description.as_deref())?;

    let access = resolve_access(
        &state.db,
        ResourceKind::List,
        list_id,
        claims.sub,
        Role::Member,
    )?;
    require(access)?;

    let id = Uuid::new_v4();
    let position = state.db.create_card(
        &id.to_string(),
        &list_id.to_string(),
        &req.title,
        req.description.as_deref(),
    )?;

    Ok((
        StatusCode::CREATED,
        Json(Card {
            id,
            list_id,
            title: req.title,
            description: req.description,
            position,
            created_at: chrono::Utc::now(),
        }),
    ))
}

pub async fn find(
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let access = resolve_access(
        &state.db,
        ResourceKind::List,
        list_id,
        claims.sub,
        Role::Member,
    )?;
    require(access)?;

    let rows = state.db.find_list_cards(
        &list_id.to_string(),
        query.take.unwrap_or(50).min(200),
        query.skip.unwrap_or(0),
    )?;
    let cards = rows
        .into_iter()
        .map(|row| row.into_model())
        .collect::<anyhow::Result<Vec<Card>>>()?;

    Ok(Json(cards))
}

pub async fn update(
    State(state): State<AppState>,
    Path((list_id, card_id)): Path<(Uuid, Uuid)>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateCardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(title) = req.title.as_deref() {
        validate_title(title)?;
    }
    validate_description(req.description.as_deref())?;
    if let Some(position) = req.position {
        if position < 0 {
            return Err(ApiError::BadRequest("position must be non-negative".into()));
        }
    }

    let access = resolve_access(
        &state.db,
        ResourceKind::Card,
        card_id,
        claims.sub,
        Role::Member,
    )?;
    require(access)?;

    let row = state
        .db
        .get_card(&card_id.to_string())?
        .ok_or_else(|| ApiError::NotFound(ResourceKind::Card.not_found_message()))?;
    if row.list_id != list_id.to_string() {
        return Err(ApiError::NotFound(ResourceKind::Card.not_found_message()));
    }

    if req.title.is_some() || req.description.is_some() {
        state.db.update_card(
            &card_id.to_string(),
            req.title.as_deref(),
            req.description.as_deref(),
        )?;
    }

    if let Some(target) = req.position {
        let db = state.clone();
        let id = card_id.to_string();
        let found = tokio::task::spawn_blocking(move || db.db.reposition_card(&id, target))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                ApiError::Internal(anyhow::anyhow!("worker task failed"))
            })??;
        if !found {
            return Err(ApiError::NotFound(ResourceKind::Card.not_found_message()));
        }
    }

    let row = state
        .db
        .get_card(&card_id.to_string())?
        .ok_or_else(|| ApiError::NotFound(ResourceKind::Card.not_found_message()))?;

    Ok(Json(row.into_model()?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((list_id, card_id)): Path<(Uuid, Uuid)>,
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

    let row = state
        .db
        .get_card(&card_id.to_string())?
        .ok_or_else(|| ApiError::NotFound(ResourceKind::Card.not_found_message()))?;
    if row.list_id != list_id.to_string() {
        return Err(ApiError::NotFound(ResourceKind::Card.not_found_message()));
    }

    state.db.delete_card(&card_id.to_string())?;

    Ok(Json(MessageResponse {
        message: "the card has been deleted".into(),
    }))
}
