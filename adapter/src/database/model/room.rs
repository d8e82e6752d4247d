use kernel::model::id::RoomId;
use kernel::model::room::Room;

#[derive(sqlx::FromRow)]
pub struct RoomRow {
    pub room_id: RoomId,
    pub name: String,
}

impl From<RoomRow> for Room {
    fn from(value: RoomRow) -> Self {
        let RoomRow { room_id, name } = value;
        Room { id: room_id, name }
    }
}
