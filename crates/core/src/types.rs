/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// All monetary amounts are fixed-point decimals (NUMERIC(12,2) in the database).
pub type Money = rust_decimal::Decimal;
