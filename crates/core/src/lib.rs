//! Bureau domain core.
//!
//! Pure domain logic shared by the database and API crates: identifier and
//! timestamp types, the error taxonomy, status vocabularies and the quote
//! state machine, billing math, upload naming conventions, and the orphan
//! file reconciliation planner. Nothing in this crate performs I/O.

pub mod billing;
pub mod error;
pub mod naming;
pub mod reconcile;
pub mod roles;
pub mod status;
pub mod types;
