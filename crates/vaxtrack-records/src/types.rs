//! Outcome types reported by the record lifecycle service.

use serde::{Deserialize, Serialize};

/// Outcome of a delete, distinguishing a real removal from a no-op.
///
/// Both variants are successes; an absent key is "nothing to delete", not a
/// fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// A record with the key existed and was removed.
    Deleted,
    /// No record with the key existed.
    NotFound,
}

impl DeleteOutcome {
    /// Build the outcome from an affected-row boolean.
    #[must_use]
    pub const fn from_affected(affected: bool) -> Self {
        if affected {
            Self::Deleted
        } else {
            Self::NotFound
        }
    }

    /// Whether a record was actually removed.
    #[must_use]
    pub const fn removed(self) -> bool {
        matches!(self, Self::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_affected_maps_both_ways() {
        assert_eq!(DeleteOutcome::from_affected(true), DeleteOutcome::Deleted);
        assert_eq!(DeleteOutcome::from_affected(false), DeleteOutcome::NotFound);
        assert!(DeleteOutcome::Deleted.removed());
        assert!(!DeleteOutcome::NotFound.removed());
    }
}
