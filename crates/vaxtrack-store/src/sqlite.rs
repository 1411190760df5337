//! `SQLite` implementation of the record store.
//!
//! Each operation acquires one connection from the injected
//! [`ConnectionProvider`], runs a single named statement from [`sql`], and
//! releases the connection when the operation scope ends. Result rows are
//! decoded by column name through raw-row structs; a missing column or an
//! undecodable cell fails the whole call, never producing a partial record.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use vaxtrack_core::{HistoryId, ScheduleId, UserId, VaccinationId};

use crate::error::{Result, StoreError};
use crate::provider::ConnectionProvider;
use crate::sql;
use crate::types::{HistoryRecord, Schedule, UpsertOutcome, User, VaccinationRecord};
use crate::Store;

/// Wire format for calendar dates.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite-backed store executing the named statement set.
pub struct SqlStore<P: ConnectionProvider> {
    provider: P,
}

impl<P: ConnectionProvider> SqlStore<P> {
    /// Open the store, creating any missing tables.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection can be opened or the schema
    /// statements fail.
    pub fn open(provider: P) -> Result<Self> {
        let conn = provider.acquire()?;
        for ddl in sql::CREATE_TABLES {
            conn.execute(ddl, []).map_err(map_sql_err)?;
        }
        tracing::info!("record store ready");
        Ok(Self { provider })
    }
}

/// Convert a driver error, keeping the mapping failure class distinct.
fn map_sql_err(e: rusqlite::Error) -> StoreError {
    match e {
        rusqlite::Error::InvalidColumnName(column) => StoreError::MissingColumn { column },
        other => StoreError::Execution(other.to_string()),
    }
}

/// Encode a calendar date for the store.
fn encode_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Decode a calendar date cell read from the store.
fn decode_date(column: &'static str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| StoreError::InvalidCell {
        column,
        value: raw.to_string(),
    })
}

/// Decode a user id cell read from the store.
fn decode_user_id(column: &'static str, raw: String) -> Result<UserId> {
    UserId::new(raw.clone()).map_err(|_| StoreError::InvalidCell { column, value: raw })
}

/// Run a count query; `record_count > 0` is the only success condition.
fn count_exists(conn: &Connection, statement: &str, key: i64) -> Result<bool> {
    let count: i64 = conn
        .query_row(statement, params![key], |row| row.get("record_count"))
        .map_err(map_sql_err)?;
    Ok(count > 0)
}

/// A history row as returned by the store, before domain decoding.
struct RawHistoryRow {
    history_id: i64,
    user_id: String,
    vaccine_name: String,
    date_administered: String,
    date_of_dose: String,
}

impl RawHistoryRow {
    /// Read every column by name.
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            history_id: row.get("history_id")?,
            user_id: row.get("user_id")?,
            vaccine_name: row.get("vaccine_name")?,
            date_administered: row.get("date_administered")?,
            date_of_dose: row.get("date_of_dose")?,
        })
    }

    fn decode(self) -> Result<HistoryRecord> {
        Ok(HistoryRecord {
            history_id: HistoryId::new(self.history_id),
            user_id: decode_user_id("user_id", self.user_id)?,
            vaccine_name: self.vaccine_name,
            date_administered: decode_date("date_administered", &self.date_administered)?,
            date_of_dose: decode_date("date_of_dose", &self.date_of_dose)?,
        })
    }
}

/// A schedule row as returned by the store, before domain decoding.
struct RawScheduleRow {
    schedule_id: i64,
    vaccination_id: i64,
    scheduled_date: String,
}

impl RawScheduleRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            schedule_id: row.get("schedule_id")?,
            vaccination_id: row.get("vaccination_id")?,
            scheduled_date: row.get("scheduled_date")?,
        })
    }

    fn decode(self) -> Result<Schedule> {
        Ok(Schedule {
            schedule_id: ScheduleId::new(self.schedule_id),
            vaccination_id: VaccinationId::new(self.vaccination_id),
            scheduled_date: decode_date("scheduled_date", &self.scheduled_date)?,
        })
    }
}

impl<P: ConnectionProvider> Store for SqlStore<P> {
    // =========================================================================
    // User Operations
    // =========================================================================

    fn add_user(&self, user: &User) -> Result<bool> {
        let conn = self.provider.acquire()?;
        let affected = conn
            .execute(
                sql::user::ADD,
                params![
                    user.user_id.as_str(),
                    user.name,
                    user.email,
                    user.password_hash
                ],
            )
            .map_err(map_sql_err)?;
        Ok(affected > 0)
    }

    fn update_user(&self, user: &User) -> Result<bool> {
        let conn = self.provider.acquire()?;
        let affected = conn
            .execute(
                sql::user::UPDATE,
                params![
                    user.user_id.as_str(),
                    user.name,
                    user.email,
                    user.password_hash
                ],
            )
            .map_err(map_sql_err)?;
        Ok(affected > 0)
    }

    fn delete_user(&self, user_id: &UserId) -> Result<bool> {
        let conn = self.provider.acquire()?;
        let affected = conn
            .execute(sql::user::DELETE, params![user_id.as_str()])
            .map_err(map_sql_err)?;
        Ok(affected > 0)
    }

    // =========================================================================
    // Vaccination Operations
    // =========================================================================

    fn add_vaccination(&self, record: &VaccinationRecord) -> Result<bool> {
        let conn = self.provider.acquire()?;
        let affected = conn
            .execute(
                sql::vaccination::ADD,
                params![
                    record.vaccination_id.get(),
                    record.user_id.as_str(),
                    record.vaccine_name,
                    encode_date(record.date_administered),
                    encode_date(record.next_dose_date)
                ],
            )
            .map_err(map_sql_err)?;
        Ok(affected > 0)
    }

    fn update_vaccination(
        &self,
        vaccination_id: VaccinationId,
        vaccine_name: &str,
        date_administered: NaiveDate,
        next_dose_date: NaiveDate,
    ) -> Result<bool> {
        let conn = self.provider.acquire()?;
        let affected = conn
            .execute(
                sql::vaccination::UPDATE,
                params![
                    vaccination_id.get(),
                    vaccine_name,
                    encode_date(date_administered),
                    encode_date(next_dose_date)
                ],
            )
            .map_err(map_sql_err)?;
        Ok(affected > 0)
    }

    fn delete_vaccination(&self, vaccination_id: VaccinationId) -> Result<bool> {
        let conn = self.provider.acquire()?;
        let affected = conn
            .execute(sql::vaccination::DELETE, params![vaccination_id.get()])
            .map_err(map_sql_err)?;
        Ok(affected > 0)
    }

    fn vaccination_exists(&self, vaccination_id: VaccinationId) -> Result<bool> {
        let conn = self.provider.acquire()?;
        count_exists(&conn, sql::vaccination::EXISTS, vaccination_id.get())
    }

    fn upsert_vaccination(&self, record: &VaccinationRecord) -> Result<UpsertOutcome> {
        let mut conn = self.provider.acquire()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(map_sql_err)?;

        let outcome = if count_exists(&tx, sql::vaccination::EXISTS, record.vaccination_id.get())? {
            tx.execute(
                sql::vaccination::UPDATE,
                params![
                    record.vaccination_id.get(),
                    record.vaccine_name,
                    encode_date(record.date_administered),
                    encode_date(record.next_dose_date)
                ],
            )
            .map_err(map_sql_err)?;
            UpsertOutcome::Updated
        } else {
            tx.execute(
                sql::vaccination::ADD,
                params![
                    record.vaccination_id.get(),
                    record.user_id.as_str(),
                    record.vaccine_name,
                    encode_date(record.date_administered),
                    encode_date(record.next_dose_date)
                ],
            )
            .map_err(map_sql_err)?;
            UpsertOutcome::Created
        };

        tx.commit().map_err(map_sql_err)?;
        tracing::debug!(
            vaccination_id = %record.vaccination_id,
            ?outcome,
            "vaccination upsert"
        );
        Ok(outcome)
    }

    // =========================================================================
    // History Operations
    // =========================================================================

    fn add_history(&self, record: &HistoryRecord) -> Result<bool> {
        let conn = self.provider.acquire()?;
        let affected = conn
            .execute(
                sql::history::ADD,
                params![
                    record.history_id.get(),
                    record.user_id.as_str(),
                    record.vaccine_name,
                    encode_date(record.date_administered),
                    encode_date(record.date_of_dose)
                ],
            )
            .map_err(map_sql_err)?;
        Ok(affected > 0)
    }

    fn update_history(&self, record: &HistoryRecord) -> Result<bool> {
        let conn = self.provider.acquire()?;
        let affected = conn
            .execute(
                sql::history::UPDATE,
                params![
                    record.history_id.get(),
                    record.user_id.as_str(),
                    record.vaccine_name,
                    encode_date(record.date_administered),
                    encode_date(record.date_of_dose)
                ],
            )
            .map_err(map_sql_err)?;
        Ok(affected > 0)
    }

    fn delete_history(&self, history_id: HistoryId) -> Result<bool> {
        let conn = self.provider.acquire()?;
        let affected = conn
            .execute(sql::history::DELETE, params![history_id.get()])
            .map_err(map_sql_err)?;
        Ok(affected > 0)
    }

    fn history_exists(&self, history_id: HistoryId) -> Result<bool> {
        let conn = self.provider.acquire()?;
        count_exists(&conn, sql::history::EXISTS, history_id.get())
    }

    fn upsert_history(&self, record: &HistoryRecord) -> Result<UpsertOutcome> {
        let mut conn = self.provider.acquire()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(map_sql_err)?;

        let outcome = if count_exists(&tx, sql::history::EXISTS, record.history_id.get())? {
            tx.execute(
                sql::history::UPDATE,
                params![
                    record.history_id.get(),
                    record.user_id.as_str(),
                    record.vaccine_name,
                    encode_date(record.date_administered),
                    encode_date(record.date_of_dose)
                ],
            )
            .map_err(map_sql_err)?;
            UpsertOutcome::Updated
        } else {
            tx.execute(
                sql::history::ADD,
                params![
                    record.history_id.get(),
                    record.user_id.as_str(),
                    record.vaccine_name,
                    encode_date(record.date_administered),
                    encode_date(record.date_of_dose)
                ],
            )
            .map_err(map_sql_err)?;
            UpsertOutcome::Created
        };

        tx.commit().map_err(map_sql_err)?;
        tracing::debug!(history_id = %record.history_id, ?outcome, "history upsert");
        Ok(outcome)
    }

    fn history_for_user(&self, user_id: &UserId) -> Result<Vec<HistoryRecord>> {
        let conn = self.provider.acquire()?;
        let mut stmt = conn.prepare(sql::history::FOR_USER).map_err(map_sql_err)?;
        let rows = stmt
            .query_map(params![user_id.as_str()], RawHistoryRow::read)
            .map_err(map_sql_err)?;

        let mut records = Vec::new();
        for raw in rows {
            records.push(raw.map_err(map_sql_err)?.decode()?);
        }
        Ok(records)
    }

    // =========================================================================
    // Schedule Operations
    // =========================================================================

    fn add_schedule(
        &self,
        vaccination_id: VaccinationId,
        scheduled_date: NaiveDate,
    ) -> Result<bool> {
        let conn = self.provider.acquire()?;
        let affected = conn
            .execute(
                sql::schedule::ADD,
                params![vaccination_id.get(), encode_date(scheduled_date)],
            )
            .map_err(map_sql_err)?;
        Ok(affected > 0)
    }

    fn update_schedule(
        &self,
        schedule_id: ScheduleId,
        scheduled_date: NaiveDate,
    ) -> Result<bool> {
        let conn = self.provider.acquire()?;
        let affected = conn
            .execute(
                sql::schedule::UPDATE,
                params![schedule_id.get(), encode_date(scheduled_date)],
            )
            .map_err(map_sql_err)?;
        Ok(affected > 0)
    }

    fn delete_schedule(&self, schedule_id: ScheduleId) -> Result<bool> {
        let conn = self.provider.acquire()?;
        let affected = conn
            .execute(sql::schedule::DELETE, params![schedule_id.get()])
            .map_err(map_sql_err)?;
        Ok(affected > 0)
    }

    fn schedules_for_user(&self, user_id: &UserId) -> Result<Vec<Schedule>> {
        let conn = self.provider.acquire()?;
        let mut stmt = conn.prepare(sql::schedule::FOR_USER).map_err(map_sql_err)?;
        let rows = stmt
            .query_map(params![user_id.as_str()], RawScheduleRow::read)
            .map_err(map_sql_err)?;

        let mut schedules = Vec::new();
        for raw in rows {
            schedules.push(raw.map_err(map_sql_err)?.decode()?);
        }
        Ok(schedules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::SqliteProvider;

    fn open_test_store() -> (SqlStore<SqliteProvider>, SqliteProvider, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let provider = SqliteProvider::new(dir.path().join("records.db"));
        let store = SqlStore::open(provider.clone()).unwrap();
        (store, provider, dir)
    }

    fn seed_user(store: &SqlStore<SqliteProvider>, id: &str) -> UserId {
        let user = User {
            user_id: UserId::new(id).unwrap(),
            name: "Ada".to_string(),
            email: format!("{id}@example.com"),
            password_hash: "73616c74$digest".to_string(),
        };
        assert!(store.add_user(&user).unwrap());
        user.user_id
    }

    fn mmr_record(user_id: &UserId, key: i64) -> VaccinationRecord {
        VaccinationRecord {
            vaccination_id: VaccinationId::new(key),
            user_id: user_id.clone(),
            vaccine_name: "MMR".to_string(),
            date_administered: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            next_dose_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        }
    }

    fn history_entry(user_id: &UserId, key: i64) -> HistoryRecord {
        HistoryRecord {
            history_id: HistoryId::new(key),
            user_id: user_id.clone(),
            vaccine_name: "Tetanus".to_string(),
            date_administered: NaiveDate::from_ymd_opt(2019, 3, 14).unwrap(),
            date_of_dose: NaiveDate::from_ymd_opt(2019, 4, 11).unwrap(),
        }
    }

    #[test]
    fn user_crud() {
        let (store, _provider, _dir) = open_test_store();
        let user_id = seed_user(&store, "u1");

        let updated = User {
            user_id: user_id.clone(),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "6e6577$digest".to_string(),
        };
        assert!(store.update_user(&updated).unwrap());

        assert!(store.delete_user(&user_id).unwrap());
        // Gone already; the second delete affects zero rows.
        assert!(!store.delete_user(&user_id).unwrap());
    }

    #[test]
    fn duplicate_user_insert_fails() {
        let (store, _provider, _dir) = open_test_store();
        seed_user(&store, "u1");

        let duplicate = User {
            user_id: UserId::new("u1").unwrap(),
            name: "Imposter".to_string(),
            email: "other@example.com".to_string(),
            password_hash: "x$y".to_string(),
        };
        let result = store.add_user(&duplicate);
        assert!(matches!(result, Err(StoreError::Execution(_))));
    }

    #[test]
    fn vaccination_upsert_creates_then_updates() {
        let (store, provider, _dir) = open_test_store();
        let user_id = seed_user(&store, "u1");
        let record = mmr_record(&user_id, 12);

        assert!(!store.vaccination_exists(record.vaccination_id).unwrap());
        assert_eq!(
            store.upsert_vaccination(&record).unwrap(),
            UpsertOutcome::Created
        );
        assert!(store.vaccination_exists(record.vaccination_id).unwrap());

        let mut revised = record.clone();
        revised.vaccine_name = "MMR booster".to_string();
        revised.next_dose_date = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        assert_eq!(
            store.upsert_vaccination(&revised).unwrap(),
            UpsertOutcome::Updated
        );

        // Still a single row, carrying the revised fields.
        let conn = provider.acquire().unwrap();
        let (count, name): (i64, String) = conn
            .query_row(
                "SELECT COUNT(*), MAX(vaccine_name) FROM vaccinations WHERE vaccination_id = 12",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(name, "MMR booster");
    }

    #[test]
    fn update_vaccination_replaces_fields() {
        let (store, _provider, _dir) = open_test_store();
        let user_id = seed_user(&store, "u1");
        store.add_vaccination(&mmr_record(&user_id, 5)).unwrap();

        let moved = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        assert!(store
            .update_vaccination(
                VaccinationId::new(5),
                "MMR booster",
                NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
                moved,
            )
            .unwrap());

        // Absent keys affect zero rows.
        assert!(!store
            .update_vaccination(
                VaccinationId::new(6),
                "MMR booster",
                NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
                moved,
            )
            .unwrap());
    }

    #[test]
    fn update_history_replaces_fields() {
        let (store, _provider, _dir) = open_test_store();
        let user_id = seed_user(&store, "u1");
        let entry = history_entry(&user_id, 7);
        store.add_history(&entry).unwrap();

        let mut revised = entry.clone();
        revised.vaccine_name = "Tdap".to_string();
        revised.date_of_dose = NaiveDate::from_ymd_opt(2019, 5, 1).unwrap();
        assert!(store.update_history(&revised).unwrap());

        let listed = store.history_for_user(&user_id).unwrap();
        assert_eq!(listed, vec![revised]);
    }

    #[test]
    fn delete_vaccination_absent_returns_false() {
        let (store, _provider, _dir) = open_test_store();
        assert!(!store.delete_vaccination(VaccinationId::new(999)).unwrap());
    }

    #[test]
    fn vaccination_requires_known_user() {
        let (store, _provider, _dir) = open_test_store();
        let orphan = mmr_record(&UserId::new("ghost").unwrap(), 1);
        let result = store.add_vaccination(&orphan);
        assert!(matches!(result, Err(StoreError::Execution(_))));
    }

    #[test]
    fn history_roundtrip_preserves_fields() {
        let (store, _provider, _dir) = open_test_store();
        let user_id = seed_user(&store, "u1");
        let entry = history_entry(&user_id, 7);

        assert!(store.add_history(&entry).unwrap());

        let listed = store.history_for_user(&user_id).unwrap();
        assert_eq!(listed, vec![entry]);
    }

    #[test]
    fn history_list_empty_is_ok() {
        let (store, _provider, _dir) = open_test_store();
        let user_id = seed_user(&store, "u1");
        assert!(store.history_for_user(&user_id).unwrap().is_empty());
    }

    #[test]
    fn history_upsert_branches() {
        let (store, _provider, _dir) = open_test_store();
        let user_id = seed_user(&store, "u1");
        let entry = history_entry(&user_id, 7);

        assert_eq!(store.upsert_history(&entry).unwrap(), UpsertOutcome::Created);

        let mut revised = entry.clone();
        revised.vaccine_name = "Tdap".to_string();
        assert_eq!(
            store.upsert_history(&revised).unwrap(),
            UpsertOutcome::Updated
        );

        let listed = store.history_for_user(&user_id).unwrap();
        assert_eq!(listed, vec![revised]);
    }

    #[test]
    fn history_delete_then_exists() {
        let (store, _provider, _dir) = open_test_store();
        let user_id = seed_user(&store, "u1");
        let entry = history_entry(&user_id, 3);
        assert!(store.add_history(&entry).unwrap());

        assert!(store.history_exists(entry.history_id).unwrap());
        assert!(store.delete_history(entry.history_id).unwrap());
        assert!(!store.history_exists(entry.history_id).unwrap());
        assert!(!store.delete_history(entry.history_id).unwrap());
    }

    #[test]
    fn schedules_join_to_owning_user() {
        let (store, _provider, _dir) = open_test_store();
        let alice = seed_user(&store, "alice");
        let bob = seed_user(&store, "bob");

        store.add_vaccination(&mmr_record(&alice, 1)).unwrap();
        store.add_vaccination(&mmr_record(&bob, 2)).unwrap();

        let june = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let july = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        assert!(store.add_schedule(VaccinationId::new(1), july).unwrap());
        assert!(store.add_schedule(VaccinationId::new(1), june).unwrap());
        assert!(store.add_schedule(VaccinationId::new(2), june).unwrap());

        let alices = store.schedules_for_user(&alice).unwrap();
        assert_eq!(alices.len(), 2);
        // Ordered by date, earliest first.
        assert_eq!(alices[0].scheduled_date, june);
        assert_eq!(alices[1].scheduled_date, july);
        assert!(alices
            .iter()
            .all(|s| s.vaccination_id == VaccinationId::new(1)));

        assert_eq!(store.schedules_for_user(&bob).unwrap().len(), 1);
    }

    #[test]
    fn schedule_ids_are_store_assigned() {
        let (store, _provider, _dir) = open_test_store();
        let user_id = seed_user(&store, "u1");
        store.add_vaccination(&mmr_record(&user_id, 1)).unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        store.add_schedule(VaccinationId::new(1), date).unwrap();
        store.add_schedule(VaccinationId::new(1), date).unwrap();

        let schedules = store.schedules_for_user(&user_id).unwrap();
        assert_eq!(schedules.len(), 2);
        assert_ne!(schedules[0].schedule_id, schedules[1].schedule_id);
    }

    #[test]
    fn schedule_update_and_delete() {
        let (store, _provider, _dir) = open_test_store();
        let user_id = seed_user(&store, "u1");
        store.add_vaccination(&mmr_record(&user_id, 1)).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        store.add_schedule(VaccinationId::new(1), date).unwrap();

        let schedule_id = store.schedules_for_user(&user_id).unwrap()[0].schedule_id;
        let moved = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert!(store.update_schedule(schedule_id, moved).unwrap());
        assert_eq!(
            store.schedules_for_user(&user_id).unwrap()[0].scheduled_date,
            moved
        );

        assert!(store.delete_schedule(schedule_id).unwrap());
        assert!(!store.delete_schedule(schedule_id).unwrap());
        assert!(!store.update_schedule(schedule_id, moved).unwrap());
    }

    #[test]
    fn undecodable_date_cell_is_a_mapping_error() {
        let (store, provider, _dir) = open_test_store();
        let user_id = seed_user(&store, "u1");
        store.add_history(&history_entry(&user_id, 7)).unwrap();

        // Corrupt the stored cell behind the mapping's back.
        let conn = provider.acquire().unwrap();
        conn.execute(
            "UPDATE history_records SET date_of_dose = 'someday' WHERE history_id = 7",
            [],
        )
        .unwrap();
        drop(conn);

        let result = store.history_for_user(&user_id);
        assert!(matches!(
            result,
            Err(StoreError::InvalidCell {
                column: "date_of_dose",
                ..
            })
        ));
    }
}
