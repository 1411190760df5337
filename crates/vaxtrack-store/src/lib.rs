//! Relational storage layer for vaxtrack.
//!
//! This crate persists users, vaccination records, history entries, and
//! schedules in `SQLite`, accessed exclusively through the named
//! parameterized statement set in [`sql`]. It provides:
//!
//! - [`ConnectionProvider`]: one connection per logical operation,
//!   released on every exit path by ownership
//! - [`Store`]: the operation set, one group per entity
//! - [`SqlStore`]: the `SQLite` implementation with by-name row mapping
//!
//! Write operations report an affected-row boolean: `true` means at least
//! one row was created, changed, or removed. Deleting an absent key yields
//! `false`, which is a valid outcome, not an error.
//!
//! The store is stateless between calls; the database is the sole source of
//! truth and the sole enforcer of referential integrity.
//!
//! # Example
//!
//! ```no_run
//! use vaxtrack_core::UserId;
//! use vaxtrack_store::{SqlStore, SqliteProvider, Store};
//!
//! # fn example() -> vaxtrack_store::Result<()> {
//! let store = SqlStore::open(SqliteProvider::new("/var/lib/vaxtrack/records.db"))?;
//!
//! let user_id = UserId::new("u1").expect("non-blank id");
//! let history = store.history_for_user(&user_id)?;
//! println!("{} history entries", history.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod provider;
pub mod sql;
pub mod sqlite;
pub mod types;

pub use error::{ConnectionError, Result, StoreError};
pub use provider::{ConnectionProvider, SqliteProvider, DEFAULT_BUSY_TIMEOUT};
pub use sqlite::SqlStore;
pub use types::{HistoryRecord, Schedule, UpsertOutcome, User, VaccinationRecord};

use chrono::NaiveDate;
use vaxtrack_core::{HistoryId, ScheduleId, UserId, VaccinationId};

/// The storage trait defining all database operations.
///
/// One operation group per entity; operations are independent (no
/// cross-entity transactions). The create-or-update operations are the only
/// compound ones: each runs its existence check and write inside a single
/// store-side transaction.
pub trait Store: Send + Sync {
    // =========================================================================
    // User Operations
    // =========================================================================

    /// Insert a user row.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails (including key or email
    /// uniqueness violations).
    fn add_user(&self, user: &User) -> Result<bool>;

    /// Replace a user's name, email, and password digest.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn update_user(&self, user: &User) -> Result<bool>;

    /// Delete a user by key. Absent keys yield `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn delete_user(&self, user_id: &UserId) -> Result<bool>;

    // =========================================================================
    // Vaccination Operations
    // =========================================================================

    /// Insert a vaccination record.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn add_vaccination(&self, record: &VaccinationRecord) -> Result<bool>;

    /// Replace a vaccination record's fields. Ownership is fixed at insert
    /// and is not part of the update.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn update_vaccination(
        &self,
        vaccination_id: VaccinationId,
        vaccine_name: &str,
        date_administered: NaiveDate,
        next_dose_date: NaiveDate,
    ) -> Result<bool>;

    /// Delete a vaccination record by key. Absent keys yield `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn delete_vaccination(&self, vaccination_id: VaccinationId) -> Result<bool>;

    /// Whether a vaccination record with the key exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the count query fails.
    fn vaccination_exists(&self, vaccination_id: VaccinationId) -> Result<bool>;

    /// Create the record or, if the key already exists, replace its fields.
    ///
    /// The existence check and the write run in one transaction; concurrent
    /// upserts for the same key serialize at the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    fn upsert_vaccination(&self, record: &VaccinationRecord) -> Result<UpsertOutcome>;

    // =========================================================================
    // History Operations
    // =========================================================================

    /// Insert a history entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn add_history(&self, record: &HistoryRecord) -> Result<bool>;

    /// Replace a history entry's fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn update_history(&self, record: &HistoryRecord) -> Result<bool>;

    /// Delete a history entry by key. Absent keys yield `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn delete_history(&self, history_id: HistoryId) -> Result<bool>;

    /// Whether a history entry with the key exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the count query fails.
    fn history_exists(&self, history_id: HistoryId) -> Result<bool>;

    /// Create the entry or, if the key already exists, replace its fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    fn upsert_history(&self, record: &HistoryRecord) -> Result<UpsertOutcome>;

    /// All history entries for one user, freshly queried. An empty result
    /// is a valid outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be mapped.
    fn history_for_user(&self, user_id: &UserId) -> Result<Vec<HistoryRecord>>;

    // =========================================================================
    // Schedule Operations
    // =========================================================================

    /// Insert an appointment for a vaccination record. The schedule key is
    /// assigned by the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn add_schedule(
        &self,
        vaccination_id: VaccinationId,
        scheduled_date: NaiveDate,
    ) -> Result<bool>;

    /// Move an appointment to a new date. Absent keys yield `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn update_schedule(&self, schedule_id: ScheduleId, scheduled_date: NaiveDate)
        -> Result<bool>;

    /// Delete an appointment by key. Absent keys yield `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn delete_schedule(&self, schedule_id: ScheduleId) -> Result<bool>;

    /// All appointments for one user, joined through the owning
    /// vaccination records.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be mapped.
    fn schedules_for_user(&self, user_id: &UserId) -> Result<Vec<Schedule>>;
}
