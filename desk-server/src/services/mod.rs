//! Business operations behind the HTTP handlers
//!
//! Handlers build an [`AuthContext`](crate::auth::AuthContext) and pass it in;
//! services never read the session themselves.

pub mod complaints;
pub mod maintenance;
pub mod staff;
