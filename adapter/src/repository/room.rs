use async_trait::async_trait;
use derive_new::new;
use kernel::model::id::RoomId;
use kernel::model::room::{event::CreateRoom, Room};
use kernel::repository::room::RoomRepository;
use shared::error::{AppError, AppResult};

use crate::database::model::room::RoomRow;
use crate::database::ConnectionPool;

#[derive(new)]
pub struct RoomRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl RoomRepository for RoomRepositoryImpl {
    async fn create(&self, event: CreateRoom) -> AppResult<Room> {
        let room_id = RoomId::new();
        let res = sqlx::query("INSERT INTO rooms (room_id, name) VALUES ($1, $2)")
            .bind(room_id)
            .bind(&event.name)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no room record has been created".into(),
            ));
        }

        Ok(Room {
            id: room_id,
            name: event.name,
        })
    }

    async fn find_all(&self) -> AppResult<Vec<Room>> {
        sqlx::query_as::<_, RoomRow>("SELECT room_id, name FROM rooms ORDER BY name ASC")
            .fetch_all(self.db.inner_ref())
            .await
            .map(|rows| rows.into_iter().map(Room::from).collect())
            .map_err(AppError::SpecificOperationError)
    }

    async fn find_by_id(&self, room_id: RoomId) -> AppResult<Option<Room>> {
        sqlx::query_as::<_, RoomRow>("SELECT room_id, name FROM rooms WHERE room_id = $1")
            .bind(room_id)
            .fetch_optional(self.db.inner_ref())
            .await
            .map(|row| row.map(Room::from))
            .map_err(AppError::SpecificOperationError)
    }
}
