//! Request middleware: authentication and authorization extractors.

pub mod auth;
