//! Record lifecycle service for vaxtrack.
//!
//! This crate owns the policy shared by every record-editing flow:
//!
//! 1. Parse the caller-asserted integer key; reject non-integers before any
//!    store access.
//! 2. Reject blank required fields.
//! 3. Parse calendar dates; vaccination records additionally enforce
//!    `date_administered` ≤ today ≤ `next_dose_date`.
//! 4. Hand the typed record to the store's atomic create-or-update and
//!    report which branch applied.
//!
//! Deletions distinguish [`DeleteOutcome::Deleted`] from
//! [`DeleteOutcome::NotFound`]; both are successes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod service;
pub mod types;
pub mod validate;

pub use error::{RecordsError, Result};
pub use service::{RecordService, Records};
pub use types::DeleteOutcome;
pub use validate::{validate_user, HistoryDraft, VaccinationDraft, ValidationError};

// Re-exported so callers can name the save outcome without depending on the
// storage crate directly.
pub use vaxtrack_store::UpsertOutcome;
