//! Schedule endpoints.
//!
//! Schedule keys are store-assigned; callers discover them through the
//! listing and pass them back for moves and deletes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use vaxtrack_auth::{IdentityGateway, ProfileRegistry};
use vaxtrack_core::{ScheduleId, VaccinationId};
use vaxtrack_records::validate::DATE_FORMAT;
use vaxtrack_records::{DeleteOutcome, Records};
use vaxtrack_store::Schedule;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::GatewayState;

/// Request to create an appointment.
#[derive(Debug, Deserialize)]
pub struct CreateScheduleBody {
    /// The vaccination record the appointment belongs to.
    pub vaccination_id: i64,
    /// Day of the appointment, `YYYY-MM-DD`.
    pub scheduled_date: String,
}

/// Request to move an appointment.
#[derive(Debug, Deserialize)]
pub struct MoveScheduleBody {
    /// New day of the appointment, `YYYY-MM-DD`.
    pub scheduled_date: String,
}

/// Response carrying a delete outcome.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether anything was actually removed.
    pub outcome: DeleteOutcome,
}

/// An appointment as returned to callers.
#[derive(Debug, Serialize)]
pub struct ScheduleEntry {
    /// Store-assigned key.
    pub schedule_id: i64,
    /// The owning vaccination record.
    pub vaccination_id: i64,
    /// Day of the appointment.
    pub scheduled_date: NaiveDate,
}

impl From<Schedule> for ScheduleEntry {
    fn from(schedule: Schedule) -> Self {
        Self {
            schedule_id: schedule.schedule_id.get(),
            vaccination_id: schedule.vaccination_id.get(),
            scheduled_date: schedule.scheduled_date,
        }
    }
}

/// Response for a schedule listing.
#[derive(Debug, Serialize)]
pub struct ScheduleListResponse {
    /// Appointments for the signed-in user, as returned by the store.
    pub schedules: Vec<ScheduleEntry>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| ApiError::BadRequest(format!("invalid date: {raw:?}")))
}

/// `POST /v1/schedules`
pub async fn create<R, I, P>(
    _auth: AuthUser,
    State(state): State<GatewayState<R, I, P>>,
    Json(body): Json<CreateScheduleBody>,
) -> Result<StatusCode, ApiError>
where
    R: Records + 'static,
    I: IdentityGateway + 'static,
    P: ProfileRegistry + 'static,
{
    let date = parse_date(&body.scheduled_date)?;
    state
        .records
        .add_schedule(VaccinationId::new(body.vaccination_id), date)
        .await?;
    Ok(StatusCode::CREATED)
}

/// `PUT /v1/schedules/{id}`
pub async fn update<R, I, P>(
    _auth: AuthUser,
    State(state): State<GatewayState<R, I, P>>,
    Path(schedule_id): Path<i64>,
    Json(body): Json<MoveScheduleBody>,
) -> Result<StatusCode, ApiError>
where
    R: Records + 'static,
    I: IdentityGateway + 'static,
    P: ProfileRegistry + 'static,
{
    let date = parse_date(&body.scheduled_date)?;
    let matched = state
        .records
        .update_schedule(ScheduleId::new(schedule_id), date)
        .await?;
    if matched {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("schedule {schedule_id}")))
    }
}

/// `DELETE /v1/schedules/{id}`
pub async fn remove<R, I, P>(
    _auth: AuthUser,
    State(state): State<GatewayState<R, I, P>>,
    Path(schedule_id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError>
where
    R: Records + 'static,
    I: IdentityGateway + 'static,
    P: ProfileRegistry + 'static,
{
    let outcome = state
        .records
        .delete_schedule(ScheduleId::new(schedule_id))
        .await?;
    Ok(Json(DeleteResponse { outcome }))
}

/// `GET /v1/schedules`
pub async fn list<R, I, P>(
    auth: AuthUser,
    State(state): State<GatewayState<R, I, P>>,
) -> Result<Json<ScheduleListResponse>, ApiError>
where
    R: Records + 'static,
    I: IdentityGateway + 'static,
    P: ProfileRegistry + 'static,
{
    let schedules = state.records.schedules_for_user(&auth.user_id).await?;
    Ok(Json(ScheduleListResponse {
        schedules: schedules.into_iter().map(ScheduleEntry::from).collect(),
    }))
}
