//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - The entity struct returned by the [`Catalog`](crate::Catalog)
//! - Where the PostgreSQL row shape differs, a `FromRow` row struct
//! - Create DTOs for inserts

pub mod lookup;
pub mod preprocessed_data;
pub mod raw_data;
pub mod study;
pub mod study_person;
pub mod template;
pub mod user;
