use crate::types::{AppError, Validate};
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

/// JSON body that has been deserialized and passed [`Validate`].
///
/// Malformed JSON, missing fields and blank text all become
/// `422 {"detail": ...}` instead of axum's plain-text rejection. A body that
/// cannot be read (too large, wrong content type) keeps axum's status.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_error)?;
        value.validate()?;
        Ok(ValidJson(value))
    }
}

fn rejection_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
            AppError::Validation(rejection.body_text())
        }
        _ => AppError::Rejected {
            status: rejection.status().as_u16(),
            message: rejection.body_text(),
        },
    }
}
