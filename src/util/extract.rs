use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};

use crate::util::error::{HandlerError, HandlerErrorKind};

/// JSON body extractor that keeps deserialization failures inside the API
/// envelope. A missing or malformed field surfaces as a 400 with
/// `{success: false, message}` instead of axum's plain-text 422.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = HandlerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                HandlerError::new(HandlerErrorKind::Validation, rejection.body_text())
            })?;
        Ok(ApiJson(value))
    }
}
