//! Raw data model.

use serde::Serialize;
use qiita_core::types::DbId;

/// A raw data object and the entities linked to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawData {
    pub id: DbId,
    pub filetype_id: DbId,
    /// Prep templates created against this raw data, ascending.
    pub prep_template_ids: Vec<DbId>,
    /// Studies this raw data belongs to, in the order they were linked.
    pub study_ids: Vec<DbId>,
}
