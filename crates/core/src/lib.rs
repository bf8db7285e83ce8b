//! Domain logic for the Qiita study portal.
//!
//! Everything here is free of database and HTTP concerns: the API crate
//! composes these pieces with the catalog and job services.

pub mod access;
pub mod contact;
pub mod demux;
pub mod error;
pub mod levels;
pub mod linkify;
pub mod stats;
pub mod study;
pub mod template;
pub mod types;
