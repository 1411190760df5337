//! History record endpoints.

use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use vaxtrack_auth::{IdentityGateway, ProfileRegistry};
use vaxtrack_records::{DeleteOutcome, HistoryDraft, Records, UpsertOutcome};
use vaxtrack_store::HistoryRecord;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::GatewayState;

/// Request to create or update a history entry.
#[derive(Debug, Deserialize)]
pub struct HistoryBody {
    /// Caller-asserted record key, as typed.
    pub history_id: String,
    /// Vaccine name.
    pub vaccine_name: String,
    /// Day the vaccine course was started, `YYYY-MM-DD`.
    pub date_administered: String,
    /// Day of the recorded dose, `YYYY-MM-DD`.
    pub date_of_dose: String,
}

/// Response reporting which branch a save took.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    /// `created` or `updated`; both are successes.
    pub outcome: UpsertOutcome,
}

/// Response carrying a delete outcome.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether anything was actually removed.
    pub outcome: DeleteOutcome,
}

/// A history entry as returned to callers.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    /// Record key.
    pub history_id: i64,
    /// Owning user.
    pub user_id: String,
    /// Vaccine name.
    pub vaccine_name: String,
    /// Day the vaccine course was started.
    pub date_administered: NaiveDate,
    /// Day of the recorded dose.
    pub date_of_dose: NaiveDate,
}

impl From<HistoryRecord> for HistoryEntry {
    fn from(record: HistoryRecord) -> Self {
        Self {
            history_id: record.history_id.get(),
            user_id: record.user_id.to_string(),
            vaccine_name: record.vaccine_name,
            date_administered: record.date_administered,
            date_of_dose: record.date_of_dose,
        }
    }
}

/// Response for a history listing.
#[derive(Debug, Serialize)]
pub struct HistoryListResponse {
    /// Entries for the signed-in user, as returned by the store.
    pub history: Vec<HistoryEntry>,
}

/// `PUT /v1/history`
pub async fn save<R, I, P>(
    auth: AuthUser,
    State(state): State<GatewayState<R, I, P>>,
    Json(body): Json<HistoryBody>,
) -> Result<Json<SaveResponse>, ApiError>
where
    R: Records + 'static,
    I: IdentityGateway + 'static,
    P: ProfileRegistry + 'static,
{
    let draft = HistoryDraft {
        history_id: body.history_id,
        user_id: auth.user_id.to_string(),
        vaccine_name: body.vaccine_name,
        date_administered: body.date_administered,
        date_of_dose: body.date_of_dose,
    };
    let outcome = state.records.save_history(draft).await?;
    Ok(Json(SaveResponse { outcome }))
}

/// `DELETE /v1/history/{id}`
pub async fn remove<R, I, P>(
    _auth: AuthUser,
    State(state): State<GatewayState<R, I, P>>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError>
where
    R: Records + 'static,
    I: IdentityGateway + 'static,
    P: ProfileRegistry + 'static,
{
    let outcome = state.records.delete_history(&raw_id).await?;
    Ok(Json(DeleteResponse { outcome }))
}

/// `GET /v1/history`
pub async fn list<R, I, P>(
    auth: AuthUser,
    State(state): State<GatewayState<R, I, P>>,
) -> Result<Json<HistoryListResponse>, ApiError>
where
    R: Records + 'static,
    I: IdentityGateway + 'static,
    P: ProfileRegistry + 'static,
{
    let records = state.records.history_for_user(&auth.user_id).await?;
    Ok(Json(HistoryListResponse {
        history: records.into_iter().map(HistoryEntry::from).collect(),
    }))
}
