//! Vaccination record endpoints.
//!
//! The record is always saved for the signed-in user; callers never assert
//! someone else's user id. A successful save arms a dose reminder for the
//! next dose date (fire-and-forget).

use axum::extract::{Path, State};
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use vaxtrack_auth::{IdentityGateway, ProfileRegistry};
use vaxtrack_records::validate::DATE_FORMAT;
use vaxtrack_records::{DeleteOutcome, Records, UpsertOutcome, VaccinationDraft};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::GatewayState;

/// Request to create or update a vaccination record.
#[derive(Debug, Deserialize)]
pub struct VaccinationBody {
    /// Caller-asserted record key, as typed.
    pub vaccination_id: String,
    /// Vaccine name.
    pub vaccine_name: String,
    /// Day the dose was administered, `YYYY-MM-DD`.
    pub date_administered: String,
    /// Day the next dose is due, `YYYY-MM-DD`.
    pub next_dose_date: String,
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

/// `PUT /v1/vaccinations`
pub async fn save<R, I, P>(
    auth: AuthUser,
    State(state): State<GatewayState<R, I, P>>,
    Json(body): Json<VaccinationBody>,
) -> Result<Json<SaveResponse>, ApiError>
where
    R: Records + 'static,
    I: IdentityGateway + 'static,
    P: ProfileRegistry + 'static,
{
    let draft = VaccinationDraft {
        vaccination_id: body.vaccination_id.clone(),
        user_id: auth.user_id.to_string(),
        vaccine_name: body.vaccine_name.clone(),
        date_administered: body.date_administered.clone(),
        next_dose_date: body.next_dose_date.clone(),
    };
    let outcome = state.records.save_vaccination(draft).await?;

    // The record is in; arm the reminder for the upcoming dose.
    if let Ok(next_dose) = NaiveDate::parse_from_str(&body.next_dose_date, DATE_FORMAT) {
        let fire_at = next_dose.and_time(NaiveTime::MIN).and_utc();
        state.reminders.schedule(&body.vaccine_name, fire_at);
    }

    Ok(Json(SaveResponse { outcome }))
}

/// `DELETE /v1/vaccinations/{id}`
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
    let outcome = state.records.delete_vaccination(&raw_id).await?;
    Ok(Json(DeleteResponse { outcome }))
}
