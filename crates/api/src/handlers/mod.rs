//! HTTP request handlers, one module per resource.

pub mod auth;
pub mod custom_quote;
pub mod customer;
pub mod file;
pub mod invoice;
pub mod maintenance;
pub mod message;
pub mod notification;
pub mod payment;
pub mod project;
pub mod quote;
