//! Project entity model and DTOs.

use bureau_core::status::StatusId;
use bureau_core::types::{DbId, Money, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub customer_id: DbId,
    /// The originating quote's primary key (the only representation used).
    pub quote_id: Option<DbId>,
    pub name: String,
    /// Display name snapshot of the client at creation time.
    pub client: String,
    pub status_id: StatusId,
    /// Completion percentage, 0-100.
    pub progress: i16,
    pub budget: Option<Money>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Zero-padded upload folder name, assigned once at creation.
    pub folder_number: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub customer_id: DbId,
    pub quote_id: Option<DbId>,
    pub name: String,
    pub client: String,
    /// Defaults to 1 (Pending) if omitted.
    pub status_id: Option<StatusId>,
    pub budget: Option<Money>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub status_id: Option<StatusId>,
    pub progress: Option<i16>,
    pub budget: Option<Money>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
