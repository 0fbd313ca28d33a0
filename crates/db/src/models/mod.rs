//! Entity models: `FromRow` row structs plus `Create*`/`Update*` DTOs.

pub mod custom_quote_request;
pub mod customer;
pub mod invoice;
pub mod message;
pub mod notification;
pub mod payment;
pub mod project;
pub mod project_file;
pub mod quote;
