use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::id::{ReservationId, RoomId};
use crate::model::reservation::event::{CreateReservation, DeleteReservation, UpdateReservation};
use crate::model::reservation::Reservation;

/// Single enforcement point for the reservation collection. Implementations
/// must run each create/update overlap check atomically with its write so
/// that concurrent callers cannot both pass the check for the same room.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// All confirmed reservations, with room display names joined in.
    async fn find_confirmed_all(&self) -> AppResult<Vec<Reservation>>;
    /// Confirmed reservations for one room.
    async fn find_confirmed_by_room_id(&self, room_id: RoomId) -> AppResult<Vec<Reservation>>;
    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>>;
    /// Book a slot. Fails with `SlotConflict` when a confirmed reservation
    /// for the same room overlaps the requested interval.
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation>;
    /// Reschedule a reservation. The overlap check excludes the record being
    /// updated, so keeping (or shrinking into) its own interval succeeds.
    async fn update(&self, event: UpdateReservation) -> AppResult<Reservation>;
    /// Hard delete. Deleting an id that is already gone is a no-op success.
    async fn delete(&self, event: DeleteReservation) -> AppResult<()>;
}
