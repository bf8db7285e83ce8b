//! Portal user model.

use serde::Serialize;
use qiita_core::types::DbId;

/// A portal user together with the studies they own and have been shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub email: String,
    pub name: Option<String>,
    pub level: String,
    /// Ids of studies owned by this user, ascending.
    pub private_studies: Vec<DbId>,
    /// Ids of studies other users shared with this user, ascending.
    pub shared_studies: Vec<DbId>,
}

impl User {
    /// Name to show in links; falls back to the email address.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}
