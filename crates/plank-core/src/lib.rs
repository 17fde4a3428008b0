//! The decision core of plank: hierarchical access resolution and the
//! positional ordering engine. Everything here is synchronous and pure
//! apart from the point reads issued through [`access::ChainStore`];
//! persistence and HTTP live in plank-db and plank-api.

pub mod access;
pub mod outcome;
pub mod position;

pub use access::{
    BoardRef, CardRef, ChainStore, CommentRef, ListRef, MemberRef, Resolution, ResolvedContext,
    authorize, authorize_author, authorize_board_delete, authorize_self, resolve, resolve_access,
};
pub use outcome::{Access, Rejection, ResourceKind};
pub use position::{PositionUpdate, Slot, next_position, plan_reposition};
