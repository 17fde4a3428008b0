//! Hierarchical access resolution and the membership/role policy.
//!
//! A nested resource is only reachable through its ownership chain
//! (comment → card → list → board). [`resolve`] walks that chain with one
//! point read per level, and the `authorize_*` functions turn the resolved
//! context into an [`Access`] outcome. The policy functions are pure; all
//! I/O happens in [`resolve`] through the [`ChainStore`] trait.

use anyhow::Result;
use uuid::Uuid;

use plank_types::models::Role;

use crate::outcome::{Access, Rejection, ResourceKind};

/// Minimal projections of the stored entities, just the fields the chain
/// walk and the policy need. plank-db maps its rows onto these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRef {
    pub id: Uuid,
    pub owner_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRef {
    pub id: Uuid,
    pub board_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRef {
    pub id: Uuid,
    pub list_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRef {
    pub id: Uuid,
    pub card_id: Uuid,
    pub author_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRef {
    pub user_id: Uuid,
    pub role: Role,
}

/// Point reads the resolver needs. Each call is a single primary-key (or
/// unique-pair) lookup; the resolver issues at most one per hierarchy level.
pub trait ChainStore {
    fn board(&self, id: Uuid) -> Result<Option<BoardRef>>;
    fn list(&self, id: Uuid) -> Result<Option<ListRef>>;
    fn card(&self, id: Uuid) -> Result<Option<CardRef>>;
    fn comment(&self, id: Uuid) -> Result<Option<CommentRef>>;
    fn member(&self, board_id: Uuid, user_id: Uuid) -> Result<Option<MemberRef>>;
}

/// The fully walked chain for a present resource: its owning board, the
/// actor's membership row on that board (if any), and, when the target was
/// a comment, the comment's author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContext {
    pub board: BoardRef,
    pub membership: Option<MemberRef>,
    pub comment_author: Option<Uuid>,
}

/// Result of walking the chain. `Missing` names the deepest resolvable
/// ancestor that was absent, so "card not found" stays distinguishable
/// from "board not found".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(ResolvedContext),
    Missing(ResourceKind),
}

/// Walk the ownership chain from `(kind, id)` up to its board and fetch the
/// actor's membership. Read-only; no authorization happens here.
pub fn resolve(
    store: &impl ChainStore,
    kind: ResourceKind,
    id: Uuid,
    actor_id: Uuid,
) -> Result<Resolution> {
    let mut comment_author = None;

    let card_id = match kind {
        ResourceKind::Comment => {
            let Some(comment) = store.comment(id)? else {
                return Ok(Resolution::Missing(ResourceKind::Comment));
            };
            comment_author = Some(comment.author_id);
            Some(comment.card_id)
        }
        ResourceKind::Card => Some(id),
        _ => None,
    };

    let list_id = match (kind, card_id) {
        (_, Some(card_id)) => {
            let Some(card) = store.card(card_id)? else {
                return Ok(Resolution::Missing(ResourceKind::Card));
            };
            Some(card.list_id)
        }
        (ResourceKind::List, None) => Some(id),
        _ => None,
    };

    let board_id = match (kind, list_id) {
        (_, Some(list_id)) => {
            let Some(list) = store.list(list_id)? else {
                return Ok(Resolution::Missing(ResourceKind::List));
            };
            list.board_id
        }
        _ => id,
    };

    let Some(board) = store.board(board_id)? else {
        return Ok(Resolution::Missing(ResourceKind::Board));
    };

    let membership = store.member(board.id, actor_id)?;

    Ok(Resolution::Found(ResolvedContext {
        board,
        membership,
        comment_author,
    }))
}

/// The membership/role decision tree. Terminal on first match: existence,
/// then membership, then role. Never merges two missing preconditions into
/// one outcome.
pub fn authorize(resolution: &Resolution, required: Role) -> Access {
    let ctx = match resolution {
        Resolution::Missing(kind) => return Access::NotFound(*kind),
        Resolution::Found(ctx) => ctx,
    };

    let Some(membership) = &ctx.membership else {
        return Access::Forbidden(Rejection::NotAMember);
    };

    if required == Role::Admin && membership.role != Role::Admin {
        return Access::Forbidden(Rejection::NotAnAdmin);
    }

    Access::Allow(ctx.clone())
}

/// Author-only gate for comment mutations. Membership is checked first;
/// the authorship check never replaces it.
pub fn authorize_author(resolution: &Resolution, actor_id: Uuid) -> Access {
    let access = authorize(resolution, Role::Member);
    let Access::Allow(ctx) = &access else {
        return access;
    };

    if ctx.comment_author != Some(actor_id) {
        return Access::Forbidden(Rejection::NotCommentAuthor);
    }

    access
}

/// Board deletion is allowed for the board's owner even without a
/// membership row, and otherwise requires an ADMIN membership.
pub fn authorize_board_delete(resolution: &Resolution, actor_id: Uuid) -> Access {
    if let Resolution::Found(ctx) = resolution {
        if ctx.board.owner_id == actor_id {
            return Access::Allow(ctx.clone());
        }
    }

    authorize(resolution, Role::Admin)
}

impl ResolvedContext {
    /// Context for operations that live outside any board chain (self-only
    /// user mutations). The board slot is a nil placeholder.
    pub fn outside_board(actor_id: Uuid) -> Self {
        ResolvedContext {
            board: BoardRef {
                id: Uuid::nil(),
                owner_id: actor_id,
            },
            membership: None,
            comment_author: None,
        }
    }
}

/// Self-only gate for user mutations; bypasses the board chain entirely.
pub fn authorize_self(actor_id: Uuid, target_user_id: Uuid) -> Access {
    if actor_id != target_user_id {
        return Access::Forbidden(Rejection::NoAccessRights);
    }

    Access::Allow(ResolvedContext::outside_board(actor_id))
}

/// Resolve + authorize in one step. This is the entry point the resource
/// services use for membership/role-gated operations.
pub fn resolve_access(
    store: &impl ChainStore,
    kind: ResourceKind,
    id: Uuid,
    actor_id: Uuid,
    required: Role,
) -> Result<Access> {
    let resolution = resolve(store, kind, id, actor_id)?;
    Ok(authorize(&resolution, required))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory chain for policy tests. Keys are plain maps; `reads` counts
    /// store hits so tests can assert one lookup per level.
    #[derive(Default)]
    struct FakeStore {
        boards: HashMap<Uuid, BoardRef>,
        lists: HashMap<Uuid, ListRef>,
        cards: HashMap<Uuid, CardRef>,
        comments: HashMap<Uuid, CommentRef>,
        members: HashMap<(Uuid, Uuid), MemberRef>,
        reads: std::cell::Cell<usize>,
    }

    impl FakeStore {
        fn tick(&self) {
            self.reads.set(self.reads.get() + 1);
        }
    }

    impl ChainStore for FakeStore {
        fn board(&self, id: Uuid) -> Result<Option<BoardRef>> {
            self.tick();
            Ok(self.boards.get(&id).cloned())
        }
        fn list(&self, id: Uuid) -> Result<Option<ListRef>> {
            self.tick();
            Ok(self.lists.get(&id).cloned())
        }
        fn card(&self, id: Uuid) -> Result<Option<CardRef>> {
            self.tick();
            Ok(self.cards.get(&id).cloned())
        }
        fn comment(&self, id: Uuid) -> Result<Option<CommentRef>> {
            self.tick();
            Ok(self.comments.get(&id).cloned())
        }
        fn member(&self, board_id: Uuid, user_id: Uuid) -> Result<Option<MemberRef>> {
            self.tick();
            Ok(self.members.get(&(board_id, user_id)).cloned())
        }
    }

    struct Fixture {
        store: FakeStore,
        board_id: Uuid,
        list_id: Uuid,
        card_id: Uuid,
        comment_id: Uuid,
        owner: Uuid,
        member: Uuid,
        stranger: Uuid,
    }

    /// One board owned by `owner` (ADMIN member), with `member` as a
    /// MEMBER-role member, one list, one card, one comment authored by
    /// `member`.
    fn fixture() -> Fixture {
        let mut store = FakeStore::default();
        let board_id = Uuid::new_v4();
        let list_id = Uuid::new_v4();
        let card_id = Uuid::new_v4();
        let comment_id = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let member = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        store.boards.insert(
            board_id,
            BoardRef {
                id: board_id,
                owner_id: owner,
            },
        );
        store.lists.insert(
            list_id,
            ListRef {
                id: list_id,
                board_id,
            },
        );
        store.cards.insert(
            card_id,
            CardRef {
                id: card_id,
                list_id,
            },
        );
        store.comments.insert(
            comment_id,
            CommentRef {
                id: comment_id,
                card_id,
                author_id: member,
            },
        );
        store.members.insert(
            (board_id, owner),
            MemberRef {
                user_id: owner,
                role: Role::Admin,
            },
        );
        store.members.insert(
            (board_id, member),
            MemberRef {
                user_id: member,
                role: Role::Member,
            },
        );

        Fixture {
            store,
            board_id,
            list_id,
            card_id,
            comment_id,
            owner,
            member,
            stranger,
        }
    }

    #[test]
    fn resolves_comment_chain_to_board() {
        let f = fixture();
        let resolution =
            resolve(&f.store, ResourceKind::Comment, f.comment_id, f.member).unwrap();

        let Resolution::Found(ctx) = resolution else {
            panic!("expected Found, got {resolution:?}");
        };
        assert_eq!(ctx.board.id, f.board_id);
        assert_eq!(ctx.comment_author, Some(f.member));
        assert_eq!(ctx.membership.unwrap().role, Role::Member);
        // comment + card + list + board + member: one read per level
        assert_eq!(f.store.reads.get(), 5);
    }

    #[test]
    fn resolves_board_with_single_read_plus_membership() {
        let f = fixture();
        let resolution = resolve(&f.store, ResourceKind::Board, f.board_id, f.member).unwrap();
        assert!(matches!(resolution, Resolution::Found(_)));
        assert_eq!(f.store.reads.get(), 2);
    }

    #[test]
    fn missing_comment_reports_comment() {
        let f = fixture();
        let resolution =
            resolve(&f.store, ResourceKind::Comment, Uuid::new_v4(), f.member).unwrap();
        assert_eq!(resolution, Resolution::Missing(ResourceKind::Comment));
    }

    #[test]
    fn broken_chain_reports_deepest_missing_ancestor() {
        let mut f = fixture();

        // Delete the card out from under the comment: the comment resolves
        // but the walk stops at the card.
        f.store.cards.remove(&f.card_id);
        let resolution =
            resolve(&f.store, ResourceKind::Comment, f.comment_id, f.member).unwrap();
        assert_eq!(resolution, Resolution::Missing(ResourceKind::Card));

        // Fresh chain, delete the list: the absence moves one level up.
        let mut f = fixture();
        f.store.lists.remove(&f.list_id);
        let resolution =
            resolve(&f.store, ResourceKind::Comment, f.comment_id, f.member).unwrap();
        assert_eq!(resolution, Resolution::Missing(ResourceKind::List));

        let mut f = fixture();
        f.store.boards.remove(&f.board_id);
        let resolution =
            resolve(&f.store, ResourceKind::Comment, f.comment_id, f.member).unwrap();
        assert_eq!(resolution, Resolution::Missing(ResourceKind::Board));
    }

    #[test]
    fn missing_board_wins_over_actor_and_role() {
        // A dead board is NotFound for every actor and required role.
        let f = fixture();
        let gone = Uuid::new_v4();
        for actor in [f.owner, f.member, f.stranger] {
            for required in [Role::Member, Role::Admin] {
                let access =
                    resolve_access(&f.store, ResourceKind::Board, gone, actor, required).unwrap();
                assert_eq!(access, Access::NotFound(ResourceKind::Board));
            }
        }
    }

    #[test]
    fn non_member_is_forbidden_before_role_is_considered() {
        // Membership is checked before role, so the message is always
        // "not a member" for a stranger.
        let f = fixture();
        for required in [Role::Member, Role::Admin] {
            let access =
                resolve_access(&f.store, ResourceKind::Board, f.board_id, f.stranger, required)
                    .unwrap();
            assert_eq!(access, Access::Forbidden(Rejection::NotAMember));
        }
    }

    #[test]
    fn member_role_gate() {
        // Same resolved context, different required role.
        let f = fixture();
        let resolution = resolve(&f.store, ResourceKind::Board, f.board_id, f.member).unwrap();

        assert!(authorize(&resolution, Role::Member).is_allowed());
        assert_eq!(
            authorize(&resolution, Role::Admin),
            Access::Forbidden(Rejection::NotAnAdmin)
        );
    }

    #[test]
    fn admin_passes_both_role_gates() {
        let f = fixture();
        let resolution = resolve(&f.store, ResourceKind::Board, f.board_id, f.owner).unwrap();
        assert!(authorize(&resolution, Role::Member).is_allowed());
        assert!(authorize(&resolution, Role::Admin).is_allowed());
    }

    #[test]
    fn board_delete_owner_and_admin_rules() {
        // The sole-admin owner may delete; a MEMBER-role member may not.
        let f = fixture();
        let resolution = resolve(&f.store, ResourceKind::Board, f.board_id, f.owner).unwrap();
        assert!(authorize_board_delete(&resolution, f.owner).is_allowed());

        let resolution = resolve(&f.store, ResourceKind::Board, f.board_id, f.member).unwrap();
        assert_eq!(
            authorize_board_delete(&resolution, f.member),
            Access::Forbidden(Rejection::NotAnAdmin)
        );
    }

    #[test]
    fn owner_without_membership_row_may_still_delete() {
        let mut f = fixture();
        f.store.members.remove(&(f.board_id, f.owner));
        let resolution = resolve(&f.store, ResourceKind::Board, f.board_id, f.owner).unwrap();
        assert!(authorize_board_delete(&resolution, f.owner).is_allowed());
    }

    #[test]
    fn comment_mutation_restricted_to_author() {
        // A same-board member is rejected with the authorship
        // message, author A is allowed.
        let f = fixture();
        let resolution =
            resolve(&f.store, ResourceKind::Comment, f.comment_id, f.owner).unwrap();
        assert_eq!(
            authorize_author(&resolution, f.owner),
            Access::Forbidden(Rejection::NotCommentAuthor)
        );

        let resolution =
            resolve(&f.store, ResourceKind::Comment, f.comment_id, f.member).unwrap();
        assert!(authorize_author(&resolution, f.member).is_allowed());
    }

    #[test]
    fn authorship_never_bypasses_membership() {
        // An author whose membership was revoked gets the membership error,
        // not the authorship one.
        let mut f = fixture();
        f.store.members.remove(&(f.board_id, f.member));
        let resolution =
            resolve(&f.store, ResourceKind::Comment, f.comment_id, f.member).unwrap();
        assert_eq!(
            authorize_author(&resolution, f.member),
            Access::Forbidden(Rejection::NotAMember)
        );
    }

    #[test]
    fn self_only_gate() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(authorize_self(me, me).is_allowed());
        assert_eq!(
            authorize_self(me, other),
            Access::Forbidden(Rejection::NoAccessRights)
        );
    }

    #[test]
    fn rejection_messages_are_fixed() {
        assert_eq!(
            Rejection::NotAMember.message(),
            "you are not a member of this board"
        );
        assert_eq!(
            Rejection::NotAnAdmin.message(),
            "you are not an administrator of this board"
        );
        assert_eq!(
            Rejection::NotCommentAuthor.message(),
            "you are not the comment author"
        );
        assert_eq!(Rejection::NoAccessRights.message(), "you don't have access rights");
        assert_eq!(ResourceKind::Card.not_found_message(), "card not found");
    }
}
