//! Customer entity model and DTOs.

use bureau_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A customer row from the `customers` table.
///
/// `password_hash` is deliberately not serialized.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Customer {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new customer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Already-hashed password (hashing happens in the API layer).
    pub password_hash: String,
    pub company: Option<String>,
    pub phone: Option<String>,
}

/// DTO for a partial profile update. All fields are optional; absent fields
/// leave the stored value unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCustomer {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
}
