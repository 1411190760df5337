//! Domain records persisted in the store.
//!
//! Calendar dates are typed ([`NaiveDate`]); they travel as ISO `YYYY-MM-DD`
//! strings on the wire and in the store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use vaxtrack_core::{HistoryId, ScheduleId, UserId, VaccinationId};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identity-provider-issued key; unique and immutable.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Contact email; unique across users.
    pub email: String,
    /// Salted password digest in `salt$digest` form. Plaintext passwords
    /// are never persisted.
    pub password_hash: String,
}

/// A vaccination record with its upcoming dose.
///
/// At creation and update time, `date_administered` must not be in the
/// future and `next_dose_date` must not be in the past.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccinationRecord {
    /// Caller-supplied primary key.
    pub vaccination_id: VaccinationId,
    /// Owning user.
    pub user_id: UserId,
    /// Name of the administered vaccine.
    pub vaccine_name: String,
    /// Day the dose was administered.
    pub date_administered: NaiveDate,
    /// Day the next dose is due.
    pub next_dose_date: NaiveDate,
}

/// A retrospective vaccination history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Caller-supplied primary key.
    pub history_id: HistoryId,
    /// Owning user.
    pub user_id: UserId,
    /// Name of the administered vaccine.
    pub vaccine_name: String,
    /// Day the vaccine course was started.
    pub date_administered: NaiveDate,
    /// Day of the recorded dose.
    pub date_of_dose: NaiveDate,
}

/// A scheduled vaccination appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Store-assigned primary key.
    pub schedule_id: ScheduleId,
    /// The vaccination record this appointment belongs to.
    pub vaccination_id: VaccinationId,
    /// Day of the appointment.
    pub scheduled_date: NaiveDate,
}

/// Which branch an atomic create-or-update took.
///
/// Both branches are successes; the caller only learns which one applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    /// No row with the key existed; one was inserted.
    Created,
    /// A row with the key existed; its fields were replaced.
    Updated,
}
