//! Route definitions.

pub mod admin;
pub mod auth;
pub mod client;
pub mod health;
pub mod notification;
pub mod project_files;
pub mod public;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                    login (public)
/// /quotes                                        public quote submission
/// /quote-requests                                public custom quote request
///
/// /client/profile                                get, update (auth)
/// /client/quotes                                 list own quotes
/// /client/projects                               list own projects
/// /client/invoices                               list own invoices
/// /client/invoices/next-payable                  oldest payable invoice
/// /client/messages                               list, send
/// /client/messages/read-all                      mark admin messages read
/// /client/messages/unread-count                  unread admin messages
/// /client/messages/{id}/read                     mark one read
///
/// /notifications                                 list (auth)
/// /notifications/read-all                        mark all read
/// /notifications/unread-count                    unread count
/// /notifications/{id}/read                       mark one read
///
/// /projects/{id}/upload                          multipart upload (auth)
/// /projects/{id}/files                           list files (auth)
///
/// /admin/quotes                                  list (admin)
/// /admin/quotes/{id}                             get, status PATCH (approval fan-out)
/// /admin/quote-requests                          list (admin)
/// /admin/quote-requests/{id}                     status PATCH (atomic approval)
/// /admin/projects                                list, create
/// /admin/projects/{id}                           get, update, delete
/// /admin/invoices                                list, create
/// /admin/invoices/{id}                           get
/// /admin/invoices/{id}/payments                  payment history
/// /admin/payments                                record simulated payment
/// /admin/customers/{id}                          get, delete
/// /admin/customers/{id}/messages                 list, send (with notification)
/// /admin/customers/{id}/notifications            create
/// /admin/maintenance/reconcile-files             orphan file backfill
/// /admin/maintenance/sweep-overdue               overdue invoice sweep
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(public::router())
        .nest("/auth", auth::router())
        .nest("/client", client::router())
        .nest("/notifications", notification::router())
        .merge(project_files::router())
        .nest("/admin", admin::router())
}
