use crate::types::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Header carrying the shared API key
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// Reject requests whose `X-API-KEY` header does not match the configured key
pub async fn api_key_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok());

    match provided {
        Some(key) if key == state.config.auth.api_key => Ok(next.run(req).await),
        Some(_) => {
            tracing::warn!(path = %req.uri().path(), "rejected request with wrong API key");
            Err(AppError::Auth("invalid API key".to_string()))
        }
        None => {
            tracing::warn!(path = %req.uri().path(), "rejected request without API key");
            Err(AppError::Auth("missing API key".to_string()))
        }
    }
}
