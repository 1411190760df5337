//! The named statement set executed against the store.
//!
//! Every store operation runs exactly one of these named, parameterized
//! statements. Parameters are passed positionally in the declared order;
//! result columns are always read back by name, so the store side is free
//! to reorder columns without breaking the mapping.

/// Schema definition, applied when the store is opened.
pub const CREATE_TABLES: [&str; 4] = [
    "CREATE TABLE IF NOT EXISTS users (
        user_id  TEXT PRIMARY KEY,
        name     TEXT NOT NULL,
        email    TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS vaccinations (
        vaccination_id    INTEGER PRIMARY KEY,
        user_id           TEXT NOT NULL REFERENCES users (user_id),
        vaccine_name      TEXT NOT NULL,
        date_administered TEXT NOT NULL,
        next_dose_date    TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS history_records (
        history_id        INTEGER PRIMARY KEY,
        user_id           TEXT NOT NULL REFERENCES users (user_id),
        vaccine_name      TEXT NOT NULL,
        date_administered TEXT NOT NULL,
        date_of_dose      TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS schedules (
        schedule_id    INTEGER PRIMARY KEY AUTOINCREMENT,
        vaccination_id INTEGER NOT NULL REFERENCES vaccinations (vaccination_id),
        scheduled_date TEXT NOT NULL
    )",
];

/// Statements for the `users` table.
pub mod user {
    /// Insert a user: `(user_id, name, email, password)`.
    pub const ADD: &str =
        "INSERT INTO users (user_id, name, email, password) VALUES (?1, ?2, ?3, ?4)";

    /// Replace a user's fields: `(user_id, name, email, password)`.
    pub const UPDATE: &str =
        "UPDATE users SET name = ?2, email = ?3, password = ?4 WHERE user_id = ?1";

    /// Delete a user by key.
    pub const DELETE: &str = "DELETE FROM users WHERE user_id = ?1";
}

/// Statements for the `vaccinations` table.
pub mod vaccination {
    /// Insert a record: `(vaccination_id, user_id, vaccine_name,
    /// date_administered, next_dose_date)`.
    pub const ADD: &str = "INSERT INTO vaccinations \
        (vaccination_id, user_id, vaccine_name, date_administered, next_dose_date) \
        VALUES (?1, ?2, ?3, ?4, ?5)";

    /// Replace a record's fields: `(vaccination_id, vaccine_name,
    /// date_administered, next_dose_date)`. Ownership is fixed at insert.
    pub const UPDATE: &str = "UPDATE vaccinations \
        SET vaccine_name = ?2, date_administered = ?3, next_dose_date = ?4 \
        WHERE vaccination_id = ?1";

    /// Delete a record by key.
    pub const DELETE: &str = "DELETE FROM vaccinations WHERE vaccination_id = ?1";

    /// Count rows with the key; `record_count > 0` means the record exists.
    pub const EXISTS: &str =
        "SELECT COUNT(*) AS record_count FROM vaccinations WHERE vaccination_id = ?1";
}

/// Statements for the `history_records` table.
pub mod history {
    /// Insert an entry: `(history_id, user_id, vaccine_name,
    /// date_administered, date_of_dose)`.
    pub const ADD: &str = "INSERT INTO history_records \
        (history_id, user_id, vaccine_name, date_administered, date_of_dose) \
        VALUES (?1, ?2, ?3, ?4, ?5)";

    /// Replace an entry's fields: `(history_id, user_id, vaccine_name,
    /// date_administered, date_of_dose)`.
    pub const UPDATE: &str = "UPDATE history_records \
        SET user_id = ?2, vaccine_name = ?3, date_administered = ?4, date_of_dose = ?5 \
        WHERE history_id = ?1";

    /// Delete an entry by key.
    pub const DELETE: &str = "DELETE FROM history_records WHERE history_id = ?1";

    /// Count rows with the key; `record_count > 0` means the entry exists.
    pub const EXISTS: &str =
        "SELECT COUNT(*) AS record_count FROM history_records WHERE history_id = ?1";

    /// All history entries for one user.
    pub const FOR_USER: &str = "SELECT history_id, user_id, vaccine_name, \
        date_administered, date_of_dose \
        FROM history_records WHERE user_id = ?1 ORDER BY history_id";
}

/// Statements for the `schedules` table.
pub mod schedule {
    /// Insert an appointment: `(vaccination_id, scheduled_date)`. The
    /// schedule key is assigned by the store.
    pub const ADD: &str =
        "INSERT INTO schedules (vaccination_id, scheduled_date) VALUES (?1, ?2)";

    /// Move an appointment: `(schedule_id, scheduled_date)`.
    pub const UPDATE: &str =
        "UPDATE schedules SET scheduled_date = ?2 WHERE schedule_id = ?1";

    /// Delete an appointment by key.
    pub const DELETE: &str = "DELETE FROM schedules WHERE schedule_id = ?1";

    /// All appointments for one user, joined through the owning
    /// vaccination record.
    pub const FOR_USER: &str = "SELECT s.schedule_id, s.vaccination_id, s.scheduled_date \
        FROM schedules s \
        JOIN vaccinations v ON v.vaccination_id = s.vaccination_id \
        WHERE v.user_id = ?1 ORDER BY s.scheduled_date, s.schedule_id";
}
