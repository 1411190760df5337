//! Core types for vaxtrack.
//!
//! This crate provides the strongly-typed identifiers shared by every other
//! crate in the workspace:
//!
//! - [`UserId`]: the opaque, identity-provider-issued user key
//! - [`VaccinationId`], [`HistoryId`], [`ScheduleId`]: integer record keys
//!
//! Record keys are caller-supplied as raw strings at the edges of the system
//! and parsed here exactly once; everything past the parse works with the
//! typed form.
//!
//! # Example
//!
//! ```
//! use vaxtrack_core::{UserId, VaccinationId};
//!
//! let user_id = UserId::new("fb-uid-4711").unwrap();
//! let vaccination_id: VaccinationId = "12".parse().unwrap();
//!
//! assert_eq!(user_id.as_str(), "fb-uid-4711");
//! assert_eq!(vaccination_id.get(), 12);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ids;

pub use ids::{HistoryId, IdError, ScheduleId, UserId, VaccinationId};
