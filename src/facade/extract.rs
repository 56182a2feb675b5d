//! Custom extractors that route request-parsing failures through the
//! canonical error body instead of axum's default rejection response.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::{EngineError, ValidationKind};

/// Like `axum::Json`, but a malformed body, an unknown `gameType`, or any
/// other JSON deserialization failure becomes `EngineError::Validation`
/// (and so the canonical `{message, details?}` error body) rather than
/// axum's default plain-text rejection.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = EngineError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            EngineError::validation(
                ValidationKind::InvalidBody,
                format!("invalid request body: {rejection}"),
            )
        })?;
        Ok(Self(value))
    }
}
