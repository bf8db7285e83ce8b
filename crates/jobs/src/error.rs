use qiita_db::CatalogError;

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Job store error: {0}")]
    Store(#[from] redis::RedisError),

    #[error("Malformed job record under '{key}': {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No job descriptor stored under '{0}'")]
    MissingDescriptor(String),

    #[error("No job status record stored under '{0}'")]
    MissingRecord(String),

    #[error("Job dispatch failed: {0}")]
    Dispatch(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
