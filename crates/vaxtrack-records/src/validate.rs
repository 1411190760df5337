//! Field validation for record drafts.
//!
//! The vaccination and history flows are two instantiations of one
//! validation vocabulary: parse the caller-asserted key, reject blank
//! required fields, parse calendar dates, and — for vaccinations only —
//! enforce the dose-date window against today. A draft that fails any step
//! is rejected before the store is touched.
//!
//! History entries are retrospective imports: their dates must parse, but
//! they carry no today-relative constraint.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vaxtrack_core::{IdError, UserId};
use vaxtrack_store::{HistoryRecord, User, VaccinationRecord};

/// Wire format for calendar dates in draft fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors produced while validating a draft.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The record key is absent or not an integer.
    #[error("invalid id: {value:?}")]
    InvalidId {
        /// The raw key input.
        value: String,
    },

    /// A required field is empty or blank.
    #[error("missing field: {field}")]
    MissingField {
        /// The name of the blank field.
        field: &'static str,
    },

    /// A date field does not parse as a calendar date.
    #[error("invalid date: {field} is {value:?}")]
    InvalidDate {
        /// The name of the offending field.
        field: &'static str,
        /// The raw input.
        value: String,
    },

    /// The dose dates fall outside the allowed window.
    #[error(
        "date out of range: date administered must be today or earlier \
         and next dose date must be today or later"
    )]
    DateOutOfRange,
}

/// Raw fields for a vaccination record, as collected from a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaccinationDraft {
    /// Caller-asserted record key.
    pub vaccination_id: String,
    /// Owning user.
    pub user_id: String,
    /// Vaccine name.
    pub vaccine_name: String,
    /// Day the dose was administered, `YYYY-MM-DD`.
    pub date_administered: String,
    /// Day the next dose is due, `YYYY-MM-DD`.
    pub next_dose_date: String,
}

impl VaccinationDraft {
    /// Validate the draft against `today`, producing a typed record.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first failing step: key
    /// parse, blank field, date parse, or the dose-date window.
    pub fn validate(&self, today: NaiveDate) -> Result<VaccinationRecord, ValidationError> {
        let vaccination_id = parse_key(&self.vaccination_id)?;
        let user_id = required_user_id(&self.user_id)?;
        let vaccine_name = required("vaccine_name", &self.vaccine_name)?;
        required("date_administered", &self.date_administered)?;
        required("next_dose_date", &self.next_dose_date)?;

        let date_administered = parse_date("date_administered", &self.date_administered)?;
        let next_dose_date = parse_date("next_dose_date", &self.next_dose_date)?;
        if date_administered > today || next_dose_date < today {
            return Err(ValidationError::DateOutOfRange);
        }

        Ok(VaccinationRecord {
            vaccination_id,
            user_id,
            vaccine_name,
            date_administered,
            next_dose_date,
        })
    }
}

/// Raw fields for a history entry, as collected from a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryDraft {
    /// Caller-asserted record key.
    pub history_id: String,
    /// Owning user.
    pub user_id: String,
    /// Vaccine name.
    pub vaccine_name: String,
    /// Day the vaccine course was started, `YYYY-MM-DD`.
    pub date_administered: String,
    /// Day of the recorded dose, `YYYY-MM-DD`.
    pub date_of_dose: String,
}

impl HistoryDraft {
    /// Validate the draft, producing a typed record.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a bad key, a blank field, or an
    /// unparseable date.
    pub fn validate(&self) -> Result<HistoryRecord, ValidationError> {
        let history_id = parse_key(&self.history_id)?;
        let user_id = required_user_id(&self.user_id)?;
        let vaccine_name = required("vaccine_name", &self.vaccine_name)?;
        required("date_administered", &self.date_administered)?;
        required("date_of_dose", &self.date_of_dose)?;

        Ok(HistoryRecord {
            history_id,
            user_id,
            vaccine_name,
            date_administered: parse_date("date_administered", &self.date_administered)?,
            date_of_dose: parse_date("date_of_dose", &self.date_of_dose)?,
        })
    }
}

/// Reject user rows with blank fields before they reach the store.
///
/// The user key itself is typed and cannot be blank; only the mutable
/// fields need checking. The password field holds a salted digest by the
/// time it arrives here.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] naming the first blank field.
pub fn validate_user(user: &User) -> Result<(), ValidationError> {
    required("name", &user.name)?;
    required("email", &user.email)?;
    required("password", &user.password_hash)?;
    Ok(())
}

/// Parse a caller-asserted integer key.
pub(crate) fn parse_key<K>(raw: &str) -> Result<K, ValidationError>
where
    K: FromStr<Err = IdError>,
{
    raw.parse().map_err(|_| ValidationError::InvalidId {
        value: raw.to_string(),
    })
}

/// Reject blank required fields.
fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(value.to_string())
}

fn required_user_id(value: &str) -> Result<UserId, ValidationError> {
    UserId::new(required("user_id", value)?)
        .map_err(|_| ValidationError::MissingField { field: "user_id" })
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaxtrack_core::VaccinationId;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    fn valid_draft() -> VaccinationDraft {
        VaccinationDraft {
            vaccination_id: "12".to_string(),
            user_id: "u1".to_string(),
            vaccine_name: "MMR".to_string(),
            date_administered: "2024-05-15".to_string(),
            next_dose_date: "2024-06-14".to_string(),
        }
    }

    #[test]
    fn valid_vaccination_draft_passes() {
        let record = valid_draft().validate(today()).unwrap();
        assert_eq!(record.vaccination_id, VaccinationId::new(12));
        assert_eq!(record.vaccine_name, "MMR");
        assert_eq!(
            record.next_dose_date,
            NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
        );
    }

    #[test]
    fn non_numeric_key_is_rejected_first() {
        let mut draft = valid_draft();
        draft.vaccination_id = "abc".to_string();
        // Even with other fields broken, the key failure wins.
        draft.vaccine_name = String::new();

        let err = draft.validate(today()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidId { .. }));
    }

    #[test]
    fn blank_fields_are_rejected() {
        for field in ["user_id", "vaccine_name", "date_administered", "next_dose_date"] {
            let mut draft = valid_draft();
            match field {
                "user_id" => draft.user_id = "  ".to_string(),
                "vaccine_name" => draft.vaccine_name = String::new(),
                "date_administered" => draft.date_administered = String::new(),
                _ => draft.next_dose_date = "   ".to_string(),
            }
            let err = draft.validate(today()).unwrap_err();
            assert!(
                matches!(err, ValidationError::MissingField { .. }),
                "expected missing-field error for {field}, got {err:?}"
            );
        }
    }

    #[test]
    fn malformed_date_is_rejected() {
        let mut draft = valid_draft();
        draft.date_administered = "15/05/2024".to_string();
        let err = draft.validate(today()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidDate {
                field: "date_administered",
                value: "15/05/2024".to_string(),
            }
        );
    }

    #[test]
    fn future_administered_date_is_out_of_range() {
        let mut draft = valid_draft();
        draft.date_administered = "2024-05-16".to_string();
        assert_eq!(
            draft.validate(today()).unwrap_err(),
            ValidationError::DateOutOfRange
        );
    }

    #[test]
    fn past_next_dose_date_is_out_of_range() {
        let mut draft = valid_draft();
        draft.next_dose_date = "2024-05-14".to_string();
        assert_eq!(
            draft.validate(today()).unwrap_err(),
            ValidationError::DateOutOfRange
        );
    }

    #[test]
    fn today_is_allowed_on_both_bounds() {
        let mut draft = valid_draft();
        draft.date_administered = "2024-05-15".to_string();
        draft.next_dose_date = "2024-05-15".to_string();
        assert!(draft.validate(today()).is_ok());
    }

    #[test]
    fn history_draft_has_no_date_window() {
        // Both dates far in the past, one far in the future: all accepted.
        let draft = HistoryDraft {
            history_id: "7".to_string(),
            user_id: "u1".to_string(),
            vaccine_name: "Tetanus".to_string(),
            date_administered: "1999-01-01".to_string(),
            date_of_dose: "2099-01-01".to_string(),
        };
        let record = draft.validate().unwrap();
        assert_eq!(record.vaccine_name, "Tetanus");
    }

    #[test]
    fn history_dates_must_still_parse() {
        let draft = HistoryDraft {
            history_id: "7".to_string(),
            user_id: "u1".to_string(),
            vaccine_name: "Tetanus".to_string(),
            date_administered: "not-a-date".to_string(),
            date_of_dose: "2019-04-11".to_string(),
        };
        assert!(matches!(
            draft.validate().unwrap_err(),
            ValidationError::InvalidDate { .. }
        ));
    }

    #[test]
    fn user_rows_reject_blank_fields() {
        let mut user = User {
            user_id: UserId::new("u1").unwrap(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "73616c74$digest".to_string(),
        };
        assert!(validate_user(&user).is_ok());

        user.email = "   ".to_string();
        assert_eq!(
            validate_user(&user).unwrap_err(),
            ValidationError::MissingField { field: "email" }
        );
    }

    #[test]
    fn history_key_parse_failure() {
        let draft = HistoryDraft {
            history_id: String::new(),
            user_id: "u1".to_string(),
            vaccine_name: "Tetanus".to_string(),
            date_administered: "2019-03-14".to_string(),
            date_of_dose: "2019-04-11".to_string(),
        };
        assert!(matches!(
            draft.validate().unwrap_err(),
            ValidationError::InvalidId { .. }
        ));
    }
}
