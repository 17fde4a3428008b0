//! Database row structs, string-typed until parsed into domain models.
//! Distinct from plank-types API models to keep the DB layer independent;
//! `into_model` conversions parse ids, enums and timestamps on the way out.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use plank_types::models::{
    Board, Card, Comment, Label, LabelColor, List, Member, Role, User, Visibility,
};

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub created_at: String,
}

pub struct BoardRow {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub visibility: String,
    pub cover_image: Option<String>,
    pub created_at: String,
}

pub struct MemberRow {
    pub id: String,
    pub board_id: String,
    pub user_id: String,
    pub role: String,
    pub created_at: String,
}

pub struct ListRow {
    pub id: String,
    pub board_id: String,
    pub title: String,
    pub position: i64,
    pub created_at: String,
}

pub struct CardRow {
    pub id: String,
    pub list_id: String,
    pub title: String,
    pub description: Option<String>,
    pub position: i64,
    pub created_at: String,
}

pub struct CommentRow {
    pub id: String,
    pub card_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: String,
}

pub struct LabelRow {
    pub id: String,
    pub board_id: String,
    pub color: String,
    pub title: Option<String>,
    pub created_at: String,
}

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
/// Accept RFC 3339 too, then fall back to naive UTC.
pub fn parse_datetime(raw: &str) -> Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .map_err(|e| anyhow!("bad timestamp '{}': {}", raw, e))
}

pub(crate) fn parse_id(raw: &str) -> Result<Uuid> {
    raw.parse().map_err(|e| anyhow!("bad id '{}': {}", raw, e))
}

impl UserRow {
    pub fn into_model(self) -> Result<User> {
        Ok(User {
            id: parse_id(&self.id)?,
            username: self.username,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl BoardRow {
    pub fn into_model(self) -> Result<Board> {
        Ok(Board {
            id: parse_id(&self.id)?,
            owner_id: parse_id(&self.owner_id)?,
            title: self.title,
            description: self.description,
            visibility: Visibility::parse(&self.visibility)
                .ok_or_else(|| anyhow!("bad visibility '{}'", self.visibility))?,
            cover_image: self.cover_image,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl MemberRow {
    pub fn into_model(self) -> Result<Member> {
        Ok(Member {
            id: parse_id(&self.id)?,
            board_id: parse_id(&self.board_id)?,
            user_id: parse_id(&self.user_id)?,
            role: Role::parse(&self.role).ok_or_else(|| anyhow!("bad role '{}'", self.role))?,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl ListRow {
    pub fn into_model(self) -> Result<List> {
        Ok(List {
            id: parse_id(&self.id)?,
            board_id: parse_id(&self.board_id)?,
            title: self.title,
            position: self.position,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl CardRow {
    pub fn into_model(self) -> Result<Card> {
        Ok(Card {
            id: parse_id(&self.id)?,
            list_id: parse_id(&self.list_id)?,
            title: self.title,
            description: self.description,
            position: self.position,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl CommentRow {
    pub fn into_model(self) -> Result<Comment> {
        Ok(Comment {
            id: parse_id(&self.id)?,
            card_id: parse_id(&self.card_id)?,
            user_id: parse_id(&self.user_id)?,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl LabelRow {
    pub fn into_model(self) -> Result<Label> {
        Ok(Label {
            id: parse_id(&self.id)?,
            board_id: parse_id(&self.board_id)?,
            color: LabelColor::parse(&self.color)
                .ok_or_else(|| anyhow!("bad label color '{}'", self.color))?,
            title: self.title,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}
