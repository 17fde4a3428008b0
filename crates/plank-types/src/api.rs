use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{LabelColor, Role, Visibility};

// -- JWT Claims --

/// JWT claims shared between plank-api's middleware and the auth handlers.
/// Canonical definition lives here in plank-types to eliminate duplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

// -- Users --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

// -- Boards --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateBoardRequest {
    pub title: String,
    pub description: Option<String>,
    pub visibility: Option<Visibility>,
    pub cover_image: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateBoardRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub visibility: Option<Visibility>,
    pub cover_image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FindBoardsQuery {
    pub owner_id: Option<Uuid>,
    pub visibility: Option<Visibility>,
    pub take: Option<u32>,
    pub skip: Option<u32>,
}

// -- Members --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberRoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct FindMembersQuery {
    pub role: Option<Role>,
    pub take: Option<u32>,
    pub skip: Option<u32>,
}

// -- Lists --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateListRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateListRequest {
    pub title: Option<String>,
    pub position: Option<i64>,
}

// -- Cards --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCardRequest {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCardRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub position: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub take: Option<u32>,
    pub skip: Option<u32>,
}

// -- Comments --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCommentRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCommentRequest {
    pub content: String,
}

// -- Labels --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateLabelRequest {
    pub title: Option<String>,
    pub color: Option<LabelColor>,
}

// -- Generic responses --

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
