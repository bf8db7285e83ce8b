//! Well-known user access level constants.
//!
//! These must match the seed data in `0001_initial_schema.sql`.

pub const LEVEL_ADMIN: &str = "admin";
pub const LEVEL_DEV: &str = "dev";
pub const LEVEL_SUPERUSER: &str = "superuser";
pub const LEVEL_USER: &str = "user";
pub const LEVEL_UNVERIFIED: &str = "unverified";
pub const LEVEL_GUEST: &str = "guest";
