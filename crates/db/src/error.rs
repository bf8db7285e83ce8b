/// Errors returned by [`Catalog`](crate::Catalog) implementations.
///
/// `Duplicate`, `Column` and `Execution` are the constraint-style failures a
/// metadata upload can trigger; handlers report them to the user instead of
/// failing the request.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: String },

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Column error: {0}")]
    Column(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl CatalogError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// `true` for failures caused by the submitted data rather than the service.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Duplicate(_) | Self::Column(_) | Self::Execution(_)
        )
    }
}

impl From<sqlx::Error> for CatalogError {
    /// Classify PostgreSQL errors by SQLSTATE.
    ///
    /// - `23505` unique violation -> `Duplicate`
    /// - `42703` undefined column -> `Column`
    /// - `23503` / `23502` / `23514` FK, not-null, check violations -> `Execution`
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some("23505") => return Self::Duplicate(db_err.message().to_string()),
                Some("42703") => return Self::Column(db_err.message().to_string()),
                Some("23503" | "23502" | "23514") => {
                    return Self::Execution(db_err.message().to_string())
                }
                _ => {}
            }
        }
        Self::Database(err)
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
