use async_trait::async_trait;
use derive_new::new;
use kernel::model::id::{ReservationId, RoomId};
use kernel::model::reservation::event::{CreateReservation, DeleteReservation, UpdateReservation};
use kernel::model::reservation::{Reservation, ReservationRoom, ReservationStatus};
use kernel::repository::reservation::ReservationRepository;
use shared::error::{AppError, AppResult};
use uuid::Uuid;

use crate::database::model::reservation::ReservationRow;
use crate::database::ConnectionPool;

/// Postgres-backed reservation store. The overlap check and the write run
/// inside one SERIALIZABLE transaction, so two concurrent bookings for the
/// same slot cannot both pass the check; when Postgres aborts the losing
/// transaction we retry it, and the retry then sees the committed winner and
/// reports a clean `SlotConflict`.
#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
}

const MAX_SERIALIZATION_RETRIES: u32 = 3;

const FIND_CONFIRMED: &str = r#"
    SELECT
        r.reservation_id,
        r.room_id,
        rm.name AS room_name,
        r.title,
        r.responsible,
        r.starts_at,
        r.ends_at,
        r.requirements,
        r.status
    FROM reservations AS r
    INNER JOIN rooms AS rm ON r.room_id = rm.room_id
    WHERE r.status = 'confirmed'
    ORDER BY r.starts_at ASC
"#;

const FIND_CONFIRMED_BY_ROOM: &str = r#"
    SELECT
        r.reservation_id,
        r.room_id,
        rm.name AS room_name,
        r.title,
        r.responsible,
        r.starts_at,
        r.ends_at,
        r.requirements,
        r.status
    FROM reservations AS r
    INNER JOIN rooms AS rm ON r.room_id = rm.room_id
    WHERE r.status = 'confirmed' AND r.room_id = $1
    ORDER BY r.starts_at ASC
"#;

const FIND_BY_ID: &str = r#"
    SELECT
        r.reservation_id,
        r.room_id,
        rm.name AS room_name,
        r.title,
        r.responsible,
        r.starts_at,
        r.ends_at,
        r.requirements,
        r.status
    FROM reservations AS r
    INNER JOIN rooms AS rm ON r.room_id = rm.room_id
    WHERE r.reservation_id = $1
"#;

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    async fn find_confirmed_all(&self) -> AppResult<Vec<Reservation>> {
        sqlx::query_as::<_, ReservationRow>(FIND_CONFIRMED)
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?
            .into_iter()
            .map(Reservation::try_from)
            .collect()
    }

    async fn find_confirmed_by_room_id(&self, room_id: RoomId) -> AppResult<Vec<Reservation>> {
        sqlx::query_as::<_, ReservationRow>(FIND_CONFIRMED_BY_ROOM)
            .bind(room_id)
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?
            .into_iter()
            .map(Reservation::try_from)
            .collect()
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, ReservationRow>(FIND_BY_ID)
            .bind(reservation_id)
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?
            .map(Reservation::try_from)
            .transpose()
    }

    async fn create(&self, event: CreateReservation) -> AppResult<Reservation> {
        let mut attempts = 0;
        loop {
            match self.try_create(&event).await {
                Err(e) if is_serialization_failure(&e) && attempts < MAX_SERIALIZATION_RETRIES => {
                    attempts += 1;
                    tracing::debug!(attempts, "create aborted by serialization failure, retrying");
                }
                other => return other,
            }
        }
    }

    async fn update(&self, event: UpdateReservation) -> AppResult<Reservation> {
        let mut attempts = 0;
        loop {
            match self.try_update(&event).await {
                Err(e) if is_serialization_failure(&e) && attempts < MAX_SERIALIZATION_RETRIES => {
                    attempts += 1;
                    tracing::debug!(attempts, "update aborted by serialization failure, retrying");
                }
                other => return other,
            }
        }
    }

    async fn delete(&self, event: DeleteReservation) -> AppResult<()> {
        let res = sqlx::query("DELETE FROM reservations WHERE reservation_id = $1")
            .bind(event.reservation_id)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        // Deleting an id that is already gone is treated as an idempotent
        // success, matching the ack-only contract of the operation.
        if res.rows_affected() < 1 {
            tracing::debug!(
                reservation_id = %event.reservation_id,
                "delete targeted a missing reservation"
            );
        }

        Ok(())
    }
}

impl ReservationRepositoryImpl {
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    async fn try_create(&self, event: &CreateReservation) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        let room_name = self.room_name(&mut tx, event.room_id).await?;

        // Overlap pre-check, scoped to the room and to confirmed rows:
        //     existing.starts_at < new.end AND existing.ends_at > new.start
        let overlap = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT reservation_id
            FROM reservations
            WHERE room_id = $1
              AND status = 'confirmed'
              AND starts_at < $3
              AND ends_at > $2
            LIMIT 1
            "#,
        )
        .bind(event.room_id)
        .bind(event.period.start())
        .bind(event.period.end())
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if overlap.is_some() {
            return Err(AppError::SlotConflict);
        }

        let reservation_id = ReservationId::new();
        let res = sqlx::query(
            r#"
            INSERT INTO reservations
            (reservation_id, room_id, title, responsible, starts_at, ends_at,
             requirements, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(reservation_id)
        .bind(event.room_id)
        .bind(&event.title)
        .bind(&event.responsible)
        .bind(event.period.start())
        .bind(event.period.end())
        .bind(&event.requirements)
        .bind(ReservationStatus::Confirmed.to_string())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no reservation record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(Reservation {
            id: reservation_id,
            room: ReservationRoom {
                room_id: event.room_id,
                name: room_name,
            },
            title: event.title.clone(),
            responsible: event.responsible.clone(),
            period: event.period,
            requirements: event.requirements.clone(),
            status: ReservationStatus::Confirmed,
        })
    }

    async fn try_update(&self, event: &UpdateReservation) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        let room_name = self.room_name(&mut tx, event.room_id).await?;

        // The responsible party is read back rather than taken from the
        // event so the update can never reassign it.
        let existing = sqlx::query_as::<_, (String, String)>(
            "SELECT responsible, status FROM reservations WHERE reservation_id = $1",
        )
        .bind(event.reservation_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some((responsible, status)) = existing else {
            return Err(AppError::EntityNotFound(format!(
                "reservation ({}) was not found",
                event.reservation_id
            )));
        };
        let status = status.parse::<ReservationStatus>().map_err(|_| {
            AppError::ConversionEntityError(format!("unknown reservation status: {status}"))
        })?;

        // Same predicate as create, excluding the record being updated so a
        // reservation never conflicts with its own prior interval.
        let overlap = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT reservation_id
            FROM reservations
            WHERE room_id = $1
              AND status = 'confirmed'
              AND reservation_id <> $2
              AND starts_at < $4
              AND ends_at > $3
            LIMIT 1
            "#,
        )
        .bind(event.room_id)
        .bind(event.reservation_id)
        .bind(event.period.start())
        .bind(event.period.end())
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if overlap.is_some() {
            return Err(AppError::SlotConflict);
        }

        let res = sqlx::query(
            r#"
            UPDATE reservations
            SET room_id = $1,
                title = $2,
                starts_at = $3,
                ends_at = $4,
                requirements = $5
            WHERE reservation_id = $6
            "#,
        )
        .bind(event.room_id)
        .bind(&event.title)
        .bind(event.period.start())
        .bind(event.period.end())
        .bind(&event.requirements)
        .bind(event.reservation_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no reservation record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(Reservation {
            id: event.reservation_id,
            room: ReservationRoom {
                room_id: event.room_id,
                name: room_name,
            },
            title: event.title.clone(),
            responsible,
            period: event.period,
            requirements: event.requirements.clone(),
            status,
        })
    }

    async fn room_name(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        room_id: RoomId,
    ) -> AppResult<String> {
        sqlx::query_scalar::<_, String>("SELECT name FROM rooms WHERE room_id = $1")
            .bind(room_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?
            .ok_or_else(|| AppError::EntityNotFound(format!("room ({room_id}) was not found")))
    }
}

/// Postgres aborts one of two overlapping SERIALIZABLE transactions with
/// SQLSTATE 40001; that caller retries instead of surfacing a storage error.
fn is_serialization_failure(err: &AppError) -> bool {
    let source = match err {
        AppError::TransactionError(e) | AppError::SpecificOperationError(e) => e,
        _ => return false,
    };
    source
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "40001")
}
