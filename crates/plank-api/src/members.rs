use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use plank_core::outcome::ResourceKind;
use plank_core::resolve_access;
use plank_types::api::{Claims, FindMembersQuery, MemberRoleRequest, MessageResponse};
use plank_types::models::{Member, Role};

use crate::auth::AppState;
use crate::error::{ApiError, require};

pub async fn find(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
    Query(query): Query<FindMembersQuery>,
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

    let rows = state.db.find_members(
        &board_id.to_string(),
        query.role.map(|r| r.as_str()),
        query.take.unwrap_or(20).min(100),
        query.skip.unwrap_or(0),
    )?;

    let members = rows
        .into_iter()
        .map(|row| row.into_model())
        .collect::<anyhow::Result<Vec<Member>>>()?;

    Ok(Json(members))
}

/// Adding members is membership management, so it sits behind the ADMIN
/// role gate.
pub async fn add(
    State(state): State<AppState>,
    Path((board_id, user_id)): Path<(Uuid, Uuid)>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<MemberRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let access = resolve_access(
        &state.db,
        ResourceKind::Board,
        board_id,
        claims.sub,
        Role::Admin,
    )?;
    require(access)?;

    if state.db.get_user_by_id(&user_id.to_string())?.is_none() {
        return Err(ApiError::NotFound(
            ResourceKind::User.not_found_message(),
        ));
    }

    if state
        .db
        .get_member(&board_id.to_string(), &user_id.to_string())?
        .is_some()
    {
        return Err(ApiError::BadRequest(
            "this user is already a member of this board".into(),
        ));
    }

    let member_id = Uuid::new_v4();
    state.db.create_member(
        &member_id.to_string(),
        &board_id.to_string(),
        &user_id.to_string(),
        req.role.as_str(),
    )?;

    Ok((
        StatusCode::CREATED,
        Json(Member {
            id: member_id,
            board_id,
            user_id,
            role: req.role,
            created_at: chrono::Utc::now(),
        }),
    ))
}

pub async fn update_role(
    State(state): State<AppState>,
    Path((board_id, user_id)): Path<(Uuid, Uuid)>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<MemberRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let access = resolve_access(
        &state.db,
        ResourceKind::Board,
        board_id,
        claims.sub,
        Role::Admin,
    )?;
    require(access)?;

    let changed = state.db.update_member_role(
        &board_id.to_string(),
        &user_id.to_string(),
        req.role.as_str(),
    )?;
    if changed == 0 {
        return Err(ApiError::BadRequest(
            "this user is not a member of this board".into(),
        ));
    }

    let row = state
        .db
        .get_member(&board_id.to_string(), &user_id.to_string())?
        .ok_or_else(|| anyhow::anyhow!("member row vanished after role update"))?;

    Ok(Json(row.into_model()?))
}

pub async fn remove(
    State(state): State<AppState>,
    Path((board_id, user_id)): Path<(Uuid, Uuid)>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let access = resolve_access(
        &state.db,
        ResourceKind::Board,
        board_id,
        claims.sub,
        Role::Admin,
    )?;
    require(access)?;

    let removed = state
        .db
        .delete_member(&board_id.to_string(), &user_id.to_string())?;
    if removed == 0 {
        return Err(ApiError::BadRequest(
            "this user is not a member of this board".into(),
        ));
    }

    Ok(Json(MessageResponse {
        message: "the member has been removed".into(),
    }))
}
