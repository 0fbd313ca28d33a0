//! Public (unauthenticated) submission routes.

use axum::routing::post;
use axum::Router;

use crate::handlers::{custom_quote, quote};
use crate::state::AppState;

/// Routes mounted at the API root.
///
/// ```text
/// POST /quotes          -> quote::submit
/// POST /quote-requests  -> custom_quote::submit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quotes", post(quote::submit))
        .route("/quote-requests", post(custom_quote::submit))
}
