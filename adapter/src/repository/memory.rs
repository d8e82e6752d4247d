use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use kernel::model::id::{ReservationId, RoomId};
use kernel::model::reservation::event::{CreateReservation, DeleteReservation, UpdateReservation};
use kernel::model::reservation::{
    Reservation, ReservationPeriod, ReservationRoom, ReservationStatus,
};
use kernel::model::room::Room;
use kernel::repository::reservation::ReservationRepository;
use shared::error::{AppError, AppResult};
use tokio::sync::{Mutex, RwLock};

/// In-memory reservation store for tests and local development.
///
/// Serialization strategy differs from the Postgres adapter: instead of a
/// SERIALIZABLE transaction, a per-room async mutex is held across the
/// check-and-write of create/update. Operations on different rooms proceed
/// in parallel; two concurrent bookings for the same room are forced through
/// the check one at a time.
#[derive(Default)]
pub struct InMemoryReservationRepository {
    store: RwLock<Store>,
    room_locks: Mutex<HashMap<RoomId, Arc<Mutex<()>>>>,
}

#[derive(Default)]
struct Store {
    rooms: HashMap<RoomId, Room>,
    reservations: HashMap<ReservationId, StoredReservation>,
}

#[derive(Clone)]
struct StoredReservation {
    id: ReservationId,
    room_id: RoomId,
    title: String,
    responsible: String,
    period: ReservationPeriod,
    requirements: String,
    status: ReservationStatus,
}

impl InMemoryReservationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision a room; mirrors the seed migration of the Postgres schema.
    pub async fn insert_room(&self, room: Room) {
        self.store.write().await.rooms.insert(room.id, room);
    }

    async fn room_lock(&self, room_id: RoomId) -> Arc<Mutex<()>> {
        let mut locks = self.room_locks.lock().await;
        Arc::clone(locks.entry(room_id).or_default())
    }

    async fn room_name(&self, room_id: RoomId) -> AppResult<String> {
        self.store
            .read()
            .await
            .rooms
            .get(&room_id)
            .map(|room| room.name.clone())
            .ok_or_else(|| AppError::EntityNotFound(format!("room ({room_id}) was not found")))
    }

    async fn has_conflict(
        &self,
        room_id: RoomId,
        period: &ReservationPeriod,
        exclude: Option<ReservationId>,
    ) -> bool {
        self.store.read().await.reservations.values().any(|r| {
            r.room_id == room_id
                && r.status == ReservationStatus::Confirmed
                && Some(r.id) != exclude
                && r.period.overlaps(period)
        })
    }
}

fn hydrate(stored: StoredReservation, room_name: String) -> Reservation {
    Reservation {
        id: stored.id,
        room: ReservationRoom {
            room_id: stored.room_id,
            name: room_name,
        },
        title: stored.title,
        responsible: stored.responsible,
        period: stored.period,
        requirements: stored.requirements,
        status: stored.status,
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn find_confirmed_all(&self) -> AppResult<Vec<Reservation>> {
        let store = self.store.read().await;
        let mut reservations = store
            .reservations
            .values()
            .filter(|r| r.status == ReservationStatus::Confirmed)
            .map(|r| {
                let room_name = store
                    .rooms
                    .get(&r.room_id)
                    .map(|room| room.name.clone())
                    .ok_or_else(|| {
                        AppError::ConversionEntityError(format!(
                            "reservation {} references a missing room",
                            r.id
                        ))
                    })?;
                Ok(hydrate(r.clone(), room_name))
            })
            .collect::<AppResult<Vec<_>>>()?;
        reservations.sort_by_key(|r| r.period.start());
        Ok(reservations)
    }

    async fn find_confirmed_by_room_id(&self, room_id: RoomId) -> AppResult<Vec<Reservation>> {
        let all = self.find_confirmed_all().await?;
        Ok(all
            .into_iter()
            .filter(|r| r.room.room_id == room_id)
            .collect())
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>> {
        let store = self.store.read().await;
        let Some(stored) = store.reservations.get(&reservation_id).cloned() else {
            return Ok(None);
        };
        let room_name = store
            .rooms
            .get(&stored.room_id)
            .map(|room| room.name.clone())
            .ok_or_else(|| {
                AppError::ConversionEntityError(format!(
                    "reservation {reservation_id} references a missing room"
                ))
            })?;
        Ok(Some(hydrate(stored, room_name)))
    }

    async fn create(&self, event: CreateReservation) -> AppResult<Reservation> {
        let lock = self.room_lock(event.room_id).await;
        let _guard = lock.lock().await;

        let room_name = self.room_name(event.room_id).await?;
        if self.has_conflict(event.room_id, &event.period, None).await {
            return Err(AppError::SlotConflict);
        }

        let stored = StoredReservation {
            id: ReservationId::new(),
            room_id: event.room_id,
            title: event.title,
            responsible: event.responsible,
            period: event.period,
            requirements: event.requirements,
            status: ReservationStatus::Confirmed,
        };
        self.store
            .write()
            .await
            .reservations
            .insert(stored.id, stored.clone());

        Ok(hydrate(stored, room_name))
    }

    async fn update(&self, event: UpdateReservation) -> AppResult<Reservation> {
        // Lock the target room: moving a reservation out of a room can only
        // remove load there, so the source room needs no lock.
        let lock = self.room_lock(event.room_id).await;
        let _guard = lock.lock().await;

        let room_name = self.room_name(event.room_id).await?;
        let existing = self
            .store
            .read()
            .await
            .reservations
            .get(&event.reservation_id)
            .cloned()
            .ok_or_else(|| {
                AppError::EntityNotFound(format!(
                    "reservation ({}) was not found",
                    event.reservation_id
                ))
            })?;

        if self
            .has_conflict(event.room_id, &event.period, Some(event.reservation_id))
            .await
        {
            return Err(AppError::SlotConflict);
        }

        // id, responsible and status survive the update untouched.
        let stored = StoredReservation {
            id: existing.id,
            room_id: event.room_id,
            title: event.title,
            responsible: existing.responsible,
            period: event.period,
            requirements: event.requirements,
            status: existing.status,
        };
        self.store
            .write()
            .await
            .reservations
            .insert(stored.id, stored.clone());

        Ok(hydrate(stored, room_name))
    }

    async fn delete(&self, event: DeleteReservation) -> AppResult<()> {
        let removed = self
            .store
            .write()
            .await
            .reservations
            .remove(&event.reservation_id);
        if removed.is_none() {
            tracing::debug!(
                reservation_id = %event.reservation_id,
                "delete targeted a missing reservation"
            );
        }
        Ok(())
    }
}
