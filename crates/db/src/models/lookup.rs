//! Controlled-vocabulary lookup rows (data types, filetypes, filepath types).

use serde::Serialize;
use sqlx::FromRow;
use qiita_core::types::DbId;

/// An `(id, name)` row from a lookup table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Lookup {
    pub id: DbId,
    pub name: String,
}

/// Filepath type attached to the demultiplexed output of preprocessing.
pub const FILEPATH_TYPE_PREPROCESSED_DEMUX: &str = "preprocessed_demux";

/// Prefix shared by all raw filepath types.
pub const RAW_FILEPATH_TYPE_PREFIX: &str = "raw_";
