//! Preprocessed data model.

use serde::Serialize;
use sqlx::FromRow;
use qiita_core::types::DbId;

/// A file produced by preprocessing and its filepath type name.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Filepath {
    pub filepath: String,
    pub filepath_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreprocessedData {
    pub id: DbId,
    pub study_id: DbId,
    pub filepaths: Vec<Filepath>,
}

impl PreprocessedData {
    /// Paths of every file of the given filepath type.
    pub fn filepaths_of_type<'a>(&'a self, filepath_type: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.filepaths
            .iter()
            .filter(move |f| f.filepath_type == filepath_type)
            .map(|f| f.filepath.as_str())
    }
}
