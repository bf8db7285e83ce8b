use axum::Json;
use serde::Serialize;

/// Success body of every `/api/v1` endpoint: `{ "data": ... }`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    /// Wrap `data` in the envelope, ready to return from a handler.
    pub fn json(data: T) -> Json<Self> {
        Json(Self { data })
    }
}
