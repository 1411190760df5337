//! Record lifecycle service implementation.
//!
//! This module provides the [`Records`] trait and [`RecordService`]
//! implementation that validates caller input and routes it to the store.
//! Create-or-update requests go through the store's atomic upsert, so the
//! service never issues a separate existence check followed by a write.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use vaxtrack_core::{HistoryId, ScheduleId, UserId, VaccinationId};
use vaxtrack_store::{HistoryRecord, Schedule, Store, UpsertOutcome, User};

use crate::error::Result;
use crate::types::DeleteOutcome;
use crate::validate::{self, HistoryDraft, ValidationError, VaccinationDraft};

/// Trait defining the record lifecycle operations.
///
/// Drafts arrive as raw field strings exactly as a caller supplied them;
/// every operation validates before touching the store.
#[async_trait]
pub trait Records: Send + Sync {
    // =========================================================================
    // Vaccination Records
    // =========================================================================

    /// Validate a draft and create-or-update the vaccination record.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed input (no store access) or
    /// a storage error if the upsert fails.
    async fn save_vaccination(&self, draft: VaccinationDraft) -> Result<UpsertOutcome>;

    /// Delete a vaccination record by its raw key.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the key is not an integer, or a
    /// storage error if the delete fails.
    async fn delete_vaccination(&self, raw_id: &str) -> Result<DeleteOutcome>;

    // =========================================================================
    // History Records
    // =========================================================================

    /// Validate a draft and create-or-update the history entry.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed input (no store access) or
    /// a storage error if the upsert fails.
    async fn save_history(&self, draft: HistoryDraft) -> Result<UpsertOutcome>;

    /// Delete a history entry by its raw key.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the key is not an integer, or a
    /// storage error if the delete fails.
    async fn delete_history(&self, raw_id: &str) -> Result<DeleteOutcome>;

    /// List all history entries for a user. An empty list is a valid
    /// outcome.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query or row mapping fails.
    async fn history_for_user(&self, user_id: &UserId) -> Result<Vec<HistoryRecord>>;

    // =========================================================================
    // Users
    // =========================================================================

    /// Persist a newly registered user row.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank fields, or a storage error
    /// (including uniqueness violations).
    async fn register_user(&self, user: User) -> Result<bool>;

    /// Replace a user's mutable fields.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank fields, or a storage error.
    async fn update_user(&self, user: User) -> Result<bool>;

    /// Delete a user row.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the delete fails.
    async fn delete_user(&self, user_id: &UserId) -> Result<DeleteOutcome>;

    // =========================================================================
    // Schedules
    // =========================================================================

    /// Create an appointment for a vaccination record; the schedule key is
    /// assigned by the store.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the insert fails (including an unknown
    /// vaccination key).
    async fn add_schedule(
        &self,
        vaccination_id: VaccinationId,
        scheduled_date: NaiveDate,
    ) -> Result<()>;

    /// Move an appointment to a new date; `false` means no appointment
    /// matched the key.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the update fails.
    async fn update_schedule(
        &self,
        schedule_id: ScheduleId,
        scheduled_date: NaiveDate,
    ) -> Result<bool>;

    /// Delete an appointment.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the delete fails.
    async fn delete_schedule(&self, schedule_id: ScheduleId) -> Result<DeleteOutcome>;

    /// List all appointments for a user, joined through the owning
    /// vaccination records.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query or row mapping fails.
    async fn schedules_for_user(&self, user_id: &UserId) -> Result<Vec<Schedule>>;
}

/// Record lifecycle service backed by a [`Store`].
pub struct RecordService<S> {
    store: Arc<S>,
}

impl<S: Store> RecordService<S> {
    /// Create a new service over the given store.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The calendar date validations compare against (UTC).
    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Shared create-or-update path: validate the draft, then one atomic
    /// store call.
    fn save<R>(
        &self,
        validate: impl FnOnce(NaiveDate) -> std::result::Result<R, ValidationError>,
        upsert: impl FnOnce(&S, &R) -> vaxtrack_store::Result<UpsertOutcome>,
    ) -> Result<UpsertOutcome> {
        let record = validate(Self::today())?;
        Ok(upsert(self.store.as_ref(), &record)?)
    }
}

#[async_trait]
impl<S: Store> Records for RecordService<S> {
    async fn save_vaccination(&self, draft: VaccinationDraft) -> Result<UpsertOutcome> {
        let outcome = self.save(
            |today| draft.validate(today),
            |store, record| store.upsert_vaccination(record),
        )?;
        tracing::info!(vaccination_id = %draft.vaccination_id, ?outcome, "vaccination saved");
        Ok(outcome)
    }

    async fn delete_vaccination(&self, raw_id: &str) -> Result<DeleteOutcome> {
        let id: VaccinationId = validate::parse_key(raw_id)?;
        let affected = self.store.delete_vaccination(id)?;
        Ok(DeleteOutcome::from_affected(affected))
    }

    async fn save_history(&self, draft: HistoryDraft) -> Result<UpsertOutcome> {
        let outcome = self.save(
            |_today| draft.validate(),
            |store, record| store.upsert_history(record),
        )?;
        tracing::info!(history_id = %draft.history_id, ?outcome, "history entry saved");
        Ok(outcome)
    }

    async fn delete_history(&self, raw_id: &str) -> Result<DeleteOutcome> {
        let id: HistoryId = validate::parse_key(raw_id)?;
        let affected = self.store.delete_history(id)?;
        Ok(DeleteOutcome::from_affected(affected))
    }

    async fn history_for_user(&self, user_id: &UserId) -> Result<Vec<HistoryRecord>> {
        Ok(self.store.history_for_user(user_id)?)
    }

    async fn register_user(&self, user: User) -> Result<bool> {
        validate::validate_user(&user)?;
        let inserted = self.store.add_user(&user)?;
        tracing::info!(user_id = %user.user_id, "user registered");
        Ok(inserted)
    }

    async fn update_user(&self, user: User) -> Result<bool> {
        validate::validate_user(&user)?;
        Ok(self.store.update_user(&user)?)
    }

    async fn delete_user(&self, user_id: &UserId) -> Result<DeleteOutcome> {
        let affected = self.store.delete_user(user_id)?;
        Ok(DeleteOutcome::from_affected(affected))
    }

    async fn add_schedule(
        &self,
        vaccination_id: VaccinationId,
        scheduled_date: NaiveDate,
    ) -> Result<()> {
        self.store.add_schedule(vaccination_id, scheduled_date)?;
        tracing::info!(%vaccination_id, %scheduled_date, "schedule created");
        Ok(())
    }

    async fn update_schedule(
        &self,
        schedule_id: ScheduleId,
        scheduled_date: NaiveDate,
    ) -> Result<bool> {
        Ok(self.store.update_schedule(schedule_id, scheduled_date)?)
    }

    async fn delete_schedule(&self, schedule_id: ScheduleId) -> Result<DeleteOutcome> {
        let affected = self.store.delete_schedule(schedule_id)?;
        Ok(DeleteOutcome::from_affected(affected))
    }

    async fn schedules_for_user(&self, user_id: &UserId) -> Result<Vec<Schedule>> {
        Ok(self.store.schedules_for_user(user_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordsError;
    use std::sync::Mutex;
    use vaxtrack_store::{SqlStore, SqliteProvider, StoreError, VaccinationRecord};

    /// A store stub that records which operations were invoked.
    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<&'static str>>,
    }

    impl RecordingStore {
        fn record(&self, op: &'static str) {
            self.calls.lock().unwrap().push(op);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Store for RecordingStore {
        fn add_user(&self, _user: &User) -> vaxtrack_store::Result<bool> {
            self.record("add_user");
            Ok(true)
        }

        fn update_user(&self, _user: &User) -> vaxtrack_store::Result<bool> {
            self.record("update_user");
            Ok(true)
        }

        fn delete_user(&self, _user_id: &UserId) -> vaxtrack_store::Result<bool> {
            self.record("delete_user");
            Ok(true)
        }

        fn add_vaccination(&self, _record: &VaccinationRecord) -> vaxtrack_store::Result<bool> {
            self.record("add_vaccination");
            Ok(true)
        }

        fn update_vaccination(
            &self,
            _vaccination_id: VaccinationId,
            _vaccine_name: &str,
            _date_administered: NaiveDate,
            _next_dose_date: NaiveDate,
        ) -> vaxtrack_store::Result<bool> {
            self.record("update_vaccination");
            Ok(true)
        }

        fn delete_vaccination(
            &self,
            _vaccination_id: VaccinationId,
        ) -> vaxtrack_store::Result<bool> {
            self.record("delete_vaccination");
            Ok(true)
        }

        fn vaccination_exists(
            &self,
            _vaccination_id: VaccinationId,
        ) -> vaxtrack_store::Result<bool> {
            self.record("vaccination_exists");
            Ok(false)
        }

        fn upsert_vaccination(
            &self,
            _record: &VaccinationRecord,
        ) -> vaxtrack_store::Result<UpsertOutcome> {
            self.record("upsert_vaccination");
            Ok(UpsertOutcome::Created)
        }

        fn add_history(&self, _record: &HistoryRecord) -> vaxtrack_store::Result<bool> {
            self.record("add_history");
            Ok(true)
        }

        fn update_history(&self, _record: &HistoryRecord) -> vaxtrack_store::Result<bool> {
            self.record("update_history");
            Ok(true)
        }

        fn delete_history(&self, _history_id: HistoryId) -> vaxtrack_store::Result<bool> {
            self.record("delete_history");
            Ok(true)
        }

        fn history_exists(&self, _history_id: HistoryId) -> vaxtrack_store::Result<bool> {
            self.record("history_exists");
            Ok(false)
        }

        fn upsert_history(
            &self,
            _record: &HistoryRecord,
        ) -> vaxtrack_store::Result<UpsertOutcome> {
            self.record("upsert_history");
            Ok(UpsertOutcome::Created)
        }

        fn history_for_user(
            &self,
            _user_id: &UserId,
        ) -> vaxtrack_store::Result<Vec<HistoryRecord>> {
            self.record("history_for_user");
            Ok(Vec::new())
        }

        fn add_schedule(
            &self,
            _vaccination_id: VaccinationId,
            _scheduled_date: NaiveDate,
        ) -> vaxtrack_store::Result<bool> {
            self.record("add_schedule");
            Ok(true)
        }

        fn update_schedule(
            &self,
            _schedule_id: ScheduleId,
            _scheduled_date: NaiveDate,
        ) -> vaxtrack_store::Result<bool> {
            self.record("update_schedule");
            Ok(true)
        }

        fn delete_schedule(&self, _schedule_id: ScheduleId) -> vaxtrack_store::Result<bool> {
            self.record("delete_schedule");
            Ok(true)
        }

        fn schedules_for_user(&self, _user_id: &UserId) -> vaxtrack_store::Result<Vec<Schedule>> {
            self.record("schedules_for_user");
            Ok(Vec::new())
        }
    }

    fn recording_service() -> (RecordService<RecordingStore>, Arc<RecordingStore>) {
        let store = Arc::new(RecordingStore::default());
        (RecordService::new(Arc::clone(&store)), store)
    }

    fn sqlite_service() -> (RecordService<SqlStore<SqliteProvider>>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let provider = SqliteProvider::new(dir.path().join("records.db"));
        let store = Arc::new(SqlStore::open(provider).unwrap());
        (RecordService::new(store), dir)
    }

    fn iso(date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    fn draft_for_today(key: &str, user: &str) -> VaccinationDraft {
        let today = Utc::now().date_naive();
        VaccinationDraft {
            vaccination_id: key.to_string(),
            user_id: user.to_string(),
            vaccine_name: "MMR".to_string(),
            date_administered: iso(today),
            next_dose_date: iso(today + chrono::Days::new(30)),
        }
    }

    async fn seed_user(service: &RecordService<SqlStore<SqliteProvider>>, id: &str) -> UserId {
        let user = User {
            user_id: UserId::new(id).unwrap(),
            name: "Ada".to_string(),
            email: format!("{id}@example.com"),
            password_hash: "73616c74$digest".to_string(),
        };
        assert!(service.register_user(user.clone()).await.unwrap());
        user.user_id
    }

    #[tokio::test]
    async fn non_numeric_id_never_reaches_store() {
        let (service, store) = recording_service();

        let draft = draft_for_today("abc", "u1");
        let err = service.save_vaccination(draft).await.unwrap_err();
        assert!(matches!(err, RecordsError::Validation(_)));

        let err = service.delete_vaccination("abc").await.unwrap_err();
        assert!(matches!(err, RecordsError::Validation(_)));

        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn out_of_range_dates_never_reach_store() {
        let (service, store) = recording_service();
        let today = Utc::now().date_naive();

        let mut draft = draft_for_today("12", "u1");
        draft.date_administered = iso(today + chrono::Days::new(1));
        let err = service.save_vaccination(draft).await.unwrap_err();
        assert!(matches!(
            err,
            RecordsError::Validation(ValidationError::DateOutOfRange)
        ));

        let mut draft = draft_for_today("12", "u1");
        draft.next_dose_date = iso(today - chrono::Days::new(1));
        let err = service.save_vaccination(draft).await.unwrap_err();
        assert!(matches!(
            err,
            RecordsError::Validation(ValidationError::DateOutOfRange)
        ));

        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn blank_user_fields_never_reach_store() {
        let (service, store) = recording_service();
        let user = User {
            user_id: UserId::new("u1").unwrap(),
            name: String::new(),
            email: "ada@example.com".to_string(),
            password_hash: "x$y".to_string(),
        };
        let err = service.register_user(user).await.unwrap_err();
        assert!(matches!(err, RecordsError::Validation(_)));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn save_routes_to_atomic_upsert_only() {
        let (service, store) = recording_service();
        let outcome = service
            .save_vaccination(draft_for_today("12", "u1"))
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Created);
        assert_eq!(store.calls(), vec!["upsert_vaccination"]);
    }

    #[tokio::test]
    async fn vaccination_created_then_updated() {
        let (service, _dir) = sqlite_service();
        seed_user(&service, "u1").await;

        let outcome = service
            .save_vaccination(draft_for_today("12", "u1"))
            .await
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Created);

        let mut revised = draft_for_today("12", "u1");
        revised.vaccine_name = "MMR booster".to_string();
        let outcome = service.save_vaccination(revised).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);
    }

    #[tokio::test]
    async fn delete_absent_record_is_not_found() {
        let (service, _dir) = sqlite_service();
        let outcome = service.delete_vaccination("999").await.unwrap();
        assert_eq!(outcome, DeleteOutcome::NotFound);
    }

    #[tokio::test]
    async fn history_roundtrip_through_service() {
        let (service, _dir) = sqlite_service();
        let user_id = seed_user(&service, "u1").await;

        let draft = HistoryDraft {
            history_id: "7".to_string(),
            user_id: "u1".to_string(),
            vaccine_name: "Tetanus".to_string(),
            date_administered: "2019-03-14".to_string(),
            date_of_dose: "2019-04-11".to_string(),
        };
        assert_eq!(
            service.save_history(draft).await.unwrap(),
            UpsertOutcome::Created
        );

        let listed = service.history_for_user(&user_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        let entry = &listed[0];
        assert_eq!(entry.history_id, HistoryId::new(7));
        assert_eq!(entry.user_id, user_id);
        assert_eq!(entry.vaccine_name, "Tetanus");
        assert_eq!(iso(entry.date_administered), "2019-03-14");
        assert_eq!(iso(entry.date_of_dose), "2019-04-11");
    }

    #[tokio::test]
    async fn listings_for_new_user_are_empty() {
        let (service, _dir) = sqlite_service();
        let user_id = seed_user(&service, "u1").await;

        assert!(service.history_for_user(&user_id).await.unwrap().is_empty());
        assert!(service
            .schedules_for_user(&user_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn schedule_lifecycle_through_service() {
        let (service, _dir) = sqlite_service();
        let user_id = seed_user(&service, "u1").await;
        service
            .save_vaccination(draft_for_today("1", "u1"))
            .await
            .unwrap();

        let date = Utc::now().date_naive() + chrono::Days::new(30);
        service
            .add_schedule(VaccinationId::new(1), date)
            .await
            .unwrap();

        let schedules = service.schedules_for_user(&user_id).await.unwrap();
        assert_eq!(schedules.len(), 1);
        let schedule_id = schedules[0].schedule_id;

        let moved = date + chrono::Days::new(7);
        assert!(service.update_schedule(schedule_id, moved).await.unwrap());
        assert_eq!(
            service.delete_schedule(schedule_id).await.unwrap(),
            DeleteOutcome::Deleted
        );
        assert_eq!(
            service.delete_schedule(schedule_id).await.unwrap(),
            DeleteOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn duplicate_registration_is_a_store_error() {
        let (service, _dir) = sqlite_service();
        seed_user(&service, "u1").await;

        let duplicate = User {
            user_id: UserId::new("u1").unwrap(),
            name: "Imposter".to_string(),
            email: "elsewhere@example.com".to_string(),
            password_hash: "x$y".to_string(),
        };
        let err = service.register_user(duplicate).await.unwrap_err();
        assert!(matches!(err, RecordsError::Store(StoreError::Execution(_))));
    }
}
