//! API key authentication
//!
//! Every route except `/` and `/health` sits behind [`middleware::api_key_middleware`],
//! which compares the `X-API-KEY` header with the `API_KEY` environment variable.
//! A missing or wrong key yields `401 {"detail": "Unauthorized"}`.
//!
//! ```ignore
//! let protected = Router::new()
//!     .route("/agent/hello", post(hello))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), api_key_middleware));
//! ```

/// Axum middleware checking the `X-API-KEY` header.
pub mod middleware;
