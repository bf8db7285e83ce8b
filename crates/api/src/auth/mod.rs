//! Session token validation.
//!
//! Sessions are issued by the login service; this server only verifies the
//! bearer tokens it hands out.

pub mod jwt;
