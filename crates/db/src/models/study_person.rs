//! Study contact (PI / lab person) model.

use serde::Serialize;
use sqlx::FromRow;
use qiita_core::types::DbId;

/// A row from the `study_people` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct StudyPerson {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub affiliation: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}
