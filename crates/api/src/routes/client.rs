//! Route definitions for the client portal (`/client/...`).
//!
//! All endpoints require authentication; resources are scoped to the
//! authenticated customer.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{auth, invoice, message, project, quote};
use crate::state::AppState;

/// Routes mounted at `/client`.
///
/// ```text
/// GET  /profile                   -> auth::get_profile
/// PUT  /profile                   -> auth::update_profile
/// GET  /quotes                    -> quote::list_mine
/// GET  /projects                  -> project::list_mine
/// GET  /invoices                  -> invoice::list_mine
/// GET  /invoices/next-payable     -> invoice::next_payable
/// GET  /messages                  -> message::list_mine
/// POST /messages                  -> message::send
/// POST /messages/read-all         -> message::mark_all_read
/// GET  /messages/unread-count     -> message::unread_count
/// POST /messages/{id}/read        -> message::mark_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(auth::get_profile).put(auth::update_profile),
        )
        .route("/quotes", get(quote::list_mine))
        .route("/projects", get(project::list_mine))
        .route("/invoices", get(invoice::list_mine))
        .route("/invoices/next-payable", get(invoice::next_payable))
        .route("/messages", get(message::list_mine).post(message::send))
        .route("/messages/read-all", post(message::mark_all_read))
        .route("/messages/unread-count", get(message::unread_count))
        .route("/messages/{id}/read", post(message::mark_read))
}
