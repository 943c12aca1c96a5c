//! Student persistence.
//!
//! The `StudentStore` trait is the only way handlers reach stored data. Two
//! backends implement it: [`PgStudentStore`] over a sqlx PostgreSQL pool, and
//! [`MemoryStudentStore`] for local development and tests. Uniqueness of
//! student names is enforced inside each backend, never by callers.

mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, SubsecRound, Utc};
use serde::{Serialize, Serializer};

use crate::config::{AppConfig, MEMORY_DATABASE_SCHEME};

pub use memory::MemoryStudentStore;
pub use postgres::PgStudentStore;

/// A stored student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub age: i32,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(serialize_with = "serialize_timestamp")]
    pub updated_at: NaiveDateTime,
}

/// Validated input for a new student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub age: i32,
}

/// Wire format for timestamps: ISO-8601, no offset, always six fractional digits.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Current time as stored in timestamp columns (UTC, no offset).
///
/// Truncated to microseconds, the resolution of PostgreSQL `TIMESTAMP`, so
/// every backend hands out the same values it later reads back.
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(6)
}

/// `serialize_with` helper rendering a timestamp in [`TIMESTAMP_FORMAT`].
pub fn serialize_timestamp<S>(at: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&at.format(TIMESTAMP_FORMAT))
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Student already exists: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Storage operations over student records.
///
/// Every mutating call is a single atomic statement that commits before it
/// returns.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Ensure the student table exists. Safe to call on every startup.
    async fn init_schema(&self) -> Result<(), StoreError>;

    /// Trivial connectivity check that touches no table.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Insert a student, failing with [`StoreError::Duplicate`] if the name is taken.
    async fn create(&self, student: NewStudent) -> Result<Student, StoreError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Student>, StoreError>;

    /// All students in insertion order.
    async fn find_all(&self) -> Result<Vec<Student>, StoreError>;

    /// Remove the named student in one statement, returning the removed row.
    ///
    /// `None` means no row matched, including when a concurrent caller
    /// removed it first.
    async fn delete_by_name(&self, name: &str) -> Result<Option<Student>, StoreError>;

    async fn exists(&self, name: &str) -> Result<bool, StoreError>;
}

/// Open the store named by `database_url`.
///
/// PostgreSQL pools connect lazily, so an unreachable database does not stop
/// startup; it surfaces through the health endpoint instead.
pub fn connect(config: &AppConfig) -> Result<Arc<dyn StudentStore>, StoreError> {
    if config.database_url.starts_with(MEMORY_DATABASE_SCHEME) {
        tracing::warn!("Using in-memory student store; data is lost on restart");
        return Ok(Arc::new(MemoryStudentStore::new()));
    }

    Ok(Arc::new(PgStudentStore::connect_lazy(&config.database_url)?))
}
