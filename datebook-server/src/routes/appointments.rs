use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};

use datebook_core::store::protocol::Deleted;
use datebook_core::{
    Appointment, AppointmentId, AppointmentStore, DatebookError, NewAppointment, YearMonth,
};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/appointments", post(create_appointment))
        .route("/api/appointments/{month}/{year}", get(list_appointments))
        .route("/api/appointments/{id}", delete(delete_appointment))
}

/// POST /api/appointments
async fn create_appointment(
    State(state): State<AppState>,
    Json(request): Json<NewAppointment>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let appointment = state.store().create(request).await?;
    tracing::info!(id = %appointment.id, date = %appointment.date, "created appointment");
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// GET /api/appointments/{month}/{year}
async fn list_appointments(
    State(state): State<AppState>,
    Path((month, year)): Path<(u32, i32)>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let month = YearMonth::from_month(year, month)
        .ok_or_else(|| DatebookError::Validation(format!("Invalid month: {month}")))?;
    let appointments = state.store().list(month).await?;
    Ok(Json(appointments))
}

/// DELETE /api/appointments/{id}
async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    let id = AppointmentId::new(id);
    state.store().delete(&id).await?;
    tracing::info!(%id, "deleted appointment");
    Ok(Json(Deleted { id }))
}
