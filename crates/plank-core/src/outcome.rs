use std::fmt;

use crate::access::ResolvedContext;

/// The kind of resource an access check was asked about. Determines which
/// "<resource> not found" message the caller surfaces: the name of the
/// resource the caller referenced, or the deepest missing ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Board,
    List,
    Card,
    Comment,
    User,
    Label,
}

impl ResourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Board => "board",
            ResourceKind::List => "list",
            ResourceKind::Card => "card",
            ResourceKind::Comment => "comment",
            ResourceKind::User => "user",
            ResourceKind::Label => "label",
        }
    }

    /// The fixed caller-facing message for a missing resource of this kind.
    pub fn not_found_message(&self) -> String {
        format!("{} not found", self.name())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why an existing resource was refused. Each reason carries its own fixed
/// message; callers must never collapse them into a generic 403.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotAMember,
    NotAnAdmin,
    NotCommentAuthor,
    NoAccessRights,
}

impl Rejection {
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::NotAMember => "you are not a member of this board",
            Rejection::NotAnAdmin => "you are not an administrator of this board",
            Rejection::NotCommentAuthor => "you are not the comment author",
            Rejection::NoAccessRights => "you don't have access rights",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of an access check. A discriminated value, not an exception:
/// callers pattern-match and translate NotFound/Forbidden to 404/403.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// The operation may proceed; carries the resolved ownership chain so
    /// callers don't re-read it.
    Allow(ResolvedContext),
    NotFound(ResourceKind),
    Forbidden(Rejection),
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allow(_))
    }
}
