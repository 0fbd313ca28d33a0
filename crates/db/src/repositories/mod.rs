//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-table invariants
//! (quote approval fan-out, payment recording) run inside a single
//! transaction within one repository method.

pub mod custom_quote_request_repo;
pub mod customer_repo;
pub mod invoice_repo;
pub mod message_repo;
pub mod notification_repo;
pub mod payment_repo;
pub mod project_file_repo;
pub mod project_repo;
pub mod quote_repo;

pub use custom_quote_request_repo::{CustomApprovalOutcome, CustomQuoteRequestRepo};
pub use customer_repo::CustomerRepo;
pub use invoice_repo::InvoiceRepo;
pub use message_repo::MessageRepo;
pub use notification_repo::NotificationRepo;
pub use payment_repo::{PaymentRejection, PaymentRepo, RecordOutcome};
pub use project_file_repo::{ProjectFileRepo, ReconcileOutcome};
pub use project_repo::ProjectRepo;
pub use quote_repo::{ApprovalOutcome, QuoteRepo};
