use kernel::model::id::{ReservationId, RoomId};
use kernel::model::reservation::{
    Reservation, ReservationPeriod, ReservationRoom, ReservationStatus,
};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, Utc};

/// Joined reservation row as read back from the database. `room_name` comes
/// from the INNER JOIN with `rooms`.
#[derive(sqlx::FromRow)]
pub struct ReservationRow {
    pub reservation_id: ReservationId,
    pub room_id: RoomId,
    pub room_name: String,
    pub title: String,
    pub responsible: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub requirements: String,
    pub status: String,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = AppError;

    fn try_from(value: ReservationRow) -> Result<Self, Self::Error> {
        let ReservationRow {
            reservation_id,
            room_id,
            room_name,
            title,
            responsible,
            starts_at,
            ends_at,
            requirements,
            status,
        } = value;
        // Both fields below were validated on the way in; a violation here
        // means the row was tampered with outside the application.
        let status = status.parse::<ReservationStatus>().map_err(|_| {
            AppError::ConversionEntityError(format!("unknown reservation status: {status}"))
        })?;
        let period = ReservationPeriod::new(starts_at, ends_at).map_err(|_| {
            AppError::ConversionEntityError(format!(
                "reservation {reservation_id} has an inverted interval"
            ))
        })?;
        Ok(Reservation {
            id: reservation_id,
            room: ReservationRoom {
                room_id,
                name: room_name,
            },
            title,
            responsible,
            period,
            requirements,
            status,
        })
    }
}
