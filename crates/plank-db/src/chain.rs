//! [`ChainStore`] implementation backed by SQLite, giving the access
//! resolver its one-point-read-per-level walk over the real tables.

use anyhow::Result;
use uuid::Uuid;

use plank_core::access::{BoardRef, CardRef, ChainStore, CommentRef, ListRef, MemberRef};
use plank_types::models::Role;

use crate::Database;
use crate::models::parse_id;

impl ChainStore for Database {
    fn board(&self, id: Uuid) -> Result<Option<BoardRef>> {
        let Some(row) = self.get_board(&id.to_string())? else {
            return Ok(None);
        };
        Ok(Some(BoardRef {
            id: parse_id(&row.id)?,
            owner_id: parse_id(&row.owner_id)?,
        }))
    }

    fn list(&self, id: Uuid) -> Result<Option<ListRef>> {
        let Some(row) = self.get_list(&id.to_string())? else {
            return Ok(None);
        };
        Ok(Some(ListRef {
            id: parse_id(&row.id)?,
            board_id: parse_id(&row.board_id)?,
        }))
    }

    fn card(&self, id: Uuid) -> Result<Option<CardRef>> {
        let Some(row) = self.get_card(&id.to_string())? else {
            return Ok(None);
        };
        Ok(Some(CardRef {
            id: parse_id(&row.id)?,
            list_id: parse_id(&row.list_id)?,
        }))
    }

    fn comment(&self, id: Uuid) -> Result<Option<CommentRef>> {
        let Some(row) = self.get_comment(&id.to_string())? else {
            return Ok(None);
        };
        Ok(Some(CommentRef {
            id: parse_id(&row.id)?,
            card_id: parse_id(&row.card_id)?,
            author_id: parse_id(&row.user_id)?,
        }))
    }

    fn member(&self, board_id: Uuid, user_id: Uuid) -> Result<Option<MemberRef>> {
        let Some(row) = self.get_member(&board_id.to_string(), &user_id.to_string())? else {
            return Ok(None);
        };
        let role = Role::parse(&row.role)
            .ok_or_else(|| anyhow::anyhow!("bad role '{}' on member {}", row.role, row.id))?;
        Ok(Some(MemberRef {
            user_id: parse_id(&row.user_id)?,
            role,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plank_core::access::{Resolution, resolve};
    use plank_core::outcome::{Access, ResourceKind};
    use plank_core::resolve_access;

    #[test]
    fn comment_chain_resolves_through_sqlite() {
        let db = Database::open_in_memory().unwrap();

        let owner = Uuid::new_v4();
        let board = Uuid::new_v4();
        let list = Uuid::new_v4();
        let card = Uuid::new_v4();
        let comment = Uuid::new_v4();

        db.create_user(&owner.to_string(), "owner", "hash").unwrap();
        db.create_board(&board.to_string(), &owner.to_string(), "b", None, "PUBLIC", None)
            .unwrap();
        db.create_list(&list.to_string(), &board.to_string(), "l").unwrap();
        db.create_card(&card.to_string(), &list.to_string(), "c", None)
            .unwrap();
        db.create_comment(&comment.to_string(), &card.to_string(), &owner.to_string(), "hi")
            .unwrap();

        let resolution = resolve(&db, ResourceKind::Comment, comment, owner).unwrap();
        let Resolution::Found(ctx) = resolution else {
            panic!("expected resolved chain");
        };
        assert_eq!(ctx.board.id, board);
        assert_eq!(ctx.board.owner_id, owner);
        assert_eq!(ctx.comment_author, Some(owner));
        assert_eq!(ctx.membership.unwrap().role, Role::Admin);

        // Deleting the list cascades through cards to comments, so the
        // walk reports the comment itself as missing.
        db.delete_list(&list.to_string()).unwrap();
        let resolution = resolve(&db, ResourceKind::Comment, comment, owner).unwrap();
        assert_eq!(resolution, Resolution::Missing(ResourceKind::Comment));
    }

    #[test]
    fn stranger_is_forbidden_through_sqlite() {
        let db = Database::open_in_memory().unwrap();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let board = Uuid::new_v4();

        db.create_user(&owner.to_string(), "owner", "hash").unwrap();
        db.create_user(&stranger.to_string(), "stranger", "hash").unwrap();
        db.create_board(&board.to_string(), &owner.to_string(), "b", None, "PUBLIC", None)
            .unwrap();

        let access = resolve_access(&db, ResourceKind::Board, board, stranger, Role::Member).unwrap();
        assert!(matches!(access, Access::Forbidden(_)));
    }
}
