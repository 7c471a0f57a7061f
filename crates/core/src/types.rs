/// All database surrogate keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Accounts are keyed by the identity provider's UUID subject.
pub type AccountId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
