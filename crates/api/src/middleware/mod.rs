//! Request extractors for session authentication and level checks.

pub mod auth;
pub mod rbac;
