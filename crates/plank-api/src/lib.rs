pub mod auth;
pub mod boards;
pub mod cards;
pub mod comments;
pub mod error;
pub mod labels;
pub mod lists;
pub mod members;
pub mod middleware;
pub mod users;
