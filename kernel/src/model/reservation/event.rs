use chrono::{DateTime, Utc};
use derive_new::new;
use shared::error::{AppError, AppResult};

use crate::model::id::{ReservationId, RoomId};
use crate::model::reservation::ReservationPeriod;

/// Validated command for booking a slot. Field checks run here so a failed
/// create can never have touched storage.
pub struct CreateReservation {
    pub room_id: RoomId,
    pub title: String,
    pub responsible: String,
    pub period: ReservationPeriod,
    pub requirements: String,
}

impl CreateReservation {
    pub fn new(
        room_id: RoomId,
        title: &str,
        responsible: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        requirements: Option<&str>,
    ) -> AppResult<Self> {
        Ok(Self {
            room_id,
            title: required_text(title, "title")?,
            responsible: required_text(responsible, "responsible")?,
            period: ReservationPeriod::new(start, end)?,
            requirements: requirements.unwrap_or_default().trim().to_owned(),
        })
    }
}

/// Validated command for rescheduling. The responsible party is fixed at
/// creation and deliberately absent here; the update path never rewrites it.
/// Field validation is symmetric with `CreateReservation`.
pub struct UpdateReservation {
    pub reservation_id: ReservationId,
    pub room_id: RoomId,
    pub title: String,
    pub period: ReservationPeriod,
    pub requirements: String,
}

impl UpdateReservation {
    pub fn new(
        reservation_id: ReservationId,
        room_id: RoomId,
        title: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        requirements: Option<&str>,
    ) -> AppResult<Self> {
        Ok(Self {
            reservation_id,
            room_id,
            title: required_text(title, "title")?,
            period: ReservationPeriod::new(start, end)?,
            requirements: requirements.unwrap_or_default().trim().to_owned(),
        })
    }
}

#[derive(new)]
pub struct DeleteReservation {
    pub reservation_id: ReservationId,
}

fn required_text(value: &str, field: &'static str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AppError::MissingField(field))
    } else {
        Ok(trimmed.to_owned())
    }
}
