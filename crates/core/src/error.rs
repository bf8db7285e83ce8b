use crate::types::DbId;

/// Failures of the portal's own rules, independent of storage.
///
/// The message of every variant except `NotFound` is shown to the user as is.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: DbId },

    /// A form or upload action the portal cannot carry out.
    #[error("{0}")]
    Validation(String),

    /// No session, or one that could not be verified.
    #[error("{0}")]
    Unauthorized(String),

    /// The session user may not act on the resource.
    #[error("{0}")]
    Forbidden(String),
}
