//! Identifier types for users and records.
//!
//! User identifiers are opaque strings issued by the external identity
//! provider and are never interpreted locally. Record identifiers are
//! integers supplied by callers (vaccinations, history entries) or assigned
//! by the store (schedules).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An opaque user identifier issued by the identity provider.
///
/// The value is unique and immutable for the lifetime of the account. It is
/// treated as an uninterpreted string everywhere in the system.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a `UserId` from a provider-issued string.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::BlankUserId`] if the string is empty or whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(IdError::BlankUserId);
        }
        Ok(Self(value))
    }

    /// Return the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the identifier, returning the underlying string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for UserId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A caller-supplied vaccination record key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VaccinationId(i64);

impl VaccinationId {
    /// Create a `VaccinationId` from a raw integer.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Return the underlying integer.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl FromStr for VaccinationId {
    type Err = IdError;

    /// Parse a `VaccinationId` from the raw string a caller typed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_record_key(s).map(Self)
    }
}

impl fmt::Display for VaccinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A caller-supplied history record key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryId(i64);

impl HistoryId {
    /// Create a `HistoryId` from a raw integer.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Return the underlying integer.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl FromStr for HistoryId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_record_key(s).map(Self)
    }
}

impl fmt::Display for HistoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A store-assigned schedule key.
///
/// Unlike the other record keys, schedule identifiers are generated by the
/// store when a schedule is created; callers only ever see them in listings
/// and pass them back for updates and deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleId(i64);

impl ScheduleId {
    /// Create a `ScheduleId` from a raw integer.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Return the underlying integer.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl FromStr for ScheduleId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_record_key(s).map(Self)
    }
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse an integer record key from raw caller input.
fn parse_record_key(s: &str) -> Result<i64, IdError> {
    s.parse::<i64>().map_err(|_| IdError::NotAnInteger {
        value: s.to_string(),
    })
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// A user identifier was empty or whitespace-only.
    #[error("user id must not be blank")]
    BlankUserId,

    /// A record key was not a valid integer.
    #[error("invalid id: {value:?} is not an integer")]
    NotAnInteger {
        /// The raw input that failed to parse.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_accepts_opaque_strings() {
        let id = UserId::new("fb-uid-Q7fA3").unwrap();
        assert_eq!(id.as_str(), "fb-uid-Q7fA3");
        assert_eq!(id.to_string(), "fb-uid-Q7fA3");
    }

    #[test]
    fn user_id_rejects_blank() {
        assert_eq!(UserId::new(""), Err(IdError::BlankUserId));
        assert_eq!(UserId::new("   "), Err(IdError::BlankUserId));
    }

    #[test]
    fn user_id_serde_json() {
        let id = UserId::new("u-123").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"u-123\"");
        let parsed: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn user_id_serde_rejects_blank() {
        let result: Result<UserId, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());
    }

    #[test]
    fn vaccination_id_parses_digits() {
        let id: VaccinationId = "12".parse().unwrap();
        assert_eq!(id, VaccinationId::new(12));
    }

    #[test]
    fn vaccination_id_rejects_non_numeric() {
        let result = "abc".parse::<VaccinationId>();
        assert!(matches!(result, Err(IdError::NotAnInteger { .. })));
    }

    #[test]
    fn vaccination_id_rejects_empty() {
        assert!("".parse::<VaccinationId>().is_err());
    }

    #[test]
    fn record_ids_serialize_as_integers() {
        let json = serde_json::to_string(&HistoryId::new(7)).unwrap();
        assert_eq!(json, "7");
        let parsed: HistoryId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, HistoryId::new(7));
    }

    #[test]
    fn schedule_id_roundtrip() {
        let id = ScheduleId::new(42);
        let parsed: ScheduleId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
