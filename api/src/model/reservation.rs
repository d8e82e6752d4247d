use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::id::{ReservationId, RoomId};
use kernel::model::reservation::event::{CreateReservation, UpdateReservation};
use kernel::model::reservation::Reservation;
use serde::{Deserialize, Serialize};
use shared::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationListQuery {
    pub room_id: Option<RoomId>,
}

// Presence and interval checks live in the kernel event constructors so the
// failure kinds stay distinct; garde only anchors the request shape here.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[garde(skip)]
    pub room_id: RoomId,
    #[garde(skip)]
    pub title: String,
    #[garde(skip)]
    pub responsible: String,
    #[garde(skip)]
    pub start: DateTime<Utc>,
    #[garde(skip)]
    pub end: DateTime<Utc>,
    #[garde(skip)]
    pub requirements: Option<String>,
}

impl TryFrom<CreateReservationRequest> for CreateReservation {
    type Error = AppError;

    fn try_from(value: CreateReservationRequest) -> Result<Self, Self::Error> {
        CreateReservation::new(
            value.room_id,
            &value.title,
            &value.responsible,
            value.start,
            value.end,
            value.requirements.as_deref(),
        )
    }
}

/// The responsible party is absent on purpose: it is fixed at creation.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationRequest {
    #[garde(skip)]
    pub room_id: RoomId,
    #[garde(skip)]
    pub title: String,
    #[garde(skip)]
    pub start: DateTime<Utc>,
    #[garde(skip)]
    pub end: DateTime<Utc>,
    #[garde(skip)]
    pub requirements: Option<String>,
}

#[derive(new)]
pub struct UpdateReservationRequestWithId {
    reservation_id: ReservationId,
    request: UpdateReservationRequest,
}

impl TryFrom<UpdateReservationRequestWithId> for UpdateReservation {
    type Error = AppError;

    fn try_from(value: UpdateReservationRequestWithId) -> Result<Self, Self::Error> {
        let UpdateReservationRequestWithId {
            reservation_id,
            request,
        } = value;
        UpdateReservation::new(
            reservation_id,
            request.room_id,
            &request.title,
            request.start,
            request.end,
            request.requirements.as_deref(),
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationsResponse {
    pub items: Vec<ReservationResponse>,
}

impl From<Vec<Reservation>> for ReservationsResponse {
    fn from(value: Vec<Reservation>) -> Self {
        Self {
            items: value.into_iter().map(ReservationResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub id: ReservationId,
    pub room_id: RoomId,
    pub room_name: String,
    pub title: String,
    pub responsible: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub requirements: String,
    pub status: String,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation {
            id,
            room,
            title,
            responsible,
            period,
            requirements,
            status,
        } = value;
        Self {
            id,
            room_id: room.room_id,
            room_name: room.name,
            title,
            responsible,
            start: period.start(),
            end: period.end(),
            requirements,
            status: status.to_string(),
        }
    }
}
