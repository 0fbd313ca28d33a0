//! Route definitions for the admin back office (`/admin/...`).
//!
//! Every handler behind this router uses the `RequireAdmin` extractor.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{
    custom_quote, customer, invoice, maintenance, message, notification, payment, project, quote,
};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /quotes                              -> quote::list
/// GET    /quotes/{id}                         -> quote::get_by_id
/// PATCH  /quotes/{id}                         -> quote::update_status
///
/// GET    /quote-requests                      -> custom_quote::list
/// PATCH  /quote-requests/{id}                 -> custom_quote::update_status
///
/// GET    /projects                            -> project::list
/// POST   /projects                            -> project::create
/// GET    /projects/{id}                       -> project::get_by_id
/// PUT    /projects/{id}                       -> project::update
/// DELETE /projects/{id}                       -> project::delete
///
/// GET    /invoices                            -> invoice::list
/// POST   /invoices                            -> invoice::create
/// GET    /invoices/{id}                       -> invoice::get_by_id
/// GET    /invoices/{id}/payments              -> invoice::list_payments
/// POST   /payments                            -> payment::record
///
/// GET    /customers/{id}                      -> customer::get_by_id
/// DELETE /customers/{id}                      -> customer::delete
/// GET    /customers/{id}/messages             -> message::list_for_customer
/// POST   /customers/{id}/messages             -> message::send_to_customer
/// POST   /customers/{id}/notifications        -> notification::create_for_customer
///
/// POST   /maintenance/reconcile-files         -> maintenance::reconcile_files
/// POST   /maintenance/sweep-overdue           -> maintenance::sweep_overdue
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quotes", get(quote::list))
        .route(
            "/quotes/{id}",
            get(quote::get_by_id).patch(quote::update_status),
        )
        .route("/quote-requests", get(custom_quote::list))
        .route("/quote-requests/{id}", patch(custom_quote::update_status))
        .route("/projects", get(project::list).post(project::create))
        .route(
            "/projects/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/invoices", get(invoice::list).post(invoice::create))
        .route("/invoices/{id}", get(invoice::get_by_id))
        .route("/invoices/{id}/payments", get(invoice::list_payments))
        .route("/payments", post(payment::record))
        .route(
            "/customers/{id}",
            get(customer::get_by_id).delete(customer::delete),
        )
        .route(
            "/customers/{id}/messages",
            get(message::list_for_customer).post(message::send_to_customer),
        )
        .route(
            "/customers/{id}/notifications",
            post(notification::create_for_customer),
        )
        .route(
            "/maintenance/reconcile-files",
            post(maintenance::reconcile_files),
        )
        .route("/maintenance/sweep-overdue", post(maintenance::sweep_overdue))
}
