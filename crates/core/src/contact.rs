//! Contact (study person) selection for the study creation form.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Field values for a contact that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub affiliation: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl NewContact {
    /// Check required fields and collapse blank optional fields to `None`.
    pub fn normalized(mut self) -> Result<Self, CoreError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("affiliation", &self.affiliation),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::Validation(format!(
                    "New contact is missing required field '{field}'"
                )));
            }
        }
        self.phone = self.phone.filter(|p| !p.trim().is_empty());
        self.address = self.address.filter(|a| !a.trim().is_empty());
        Ok(self)
    }
}

/// A PI or lab-person selection: either an existing contact or one to create.
///
/// Serialized as `{"existing": 3}` or `{"new": {"name": ..., ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactSelection {
    Existing(DbId),
    New(NewContact),
}
