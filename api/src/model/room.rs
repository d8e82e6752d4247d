use garde::Validate;
use kernel::model::id::RoomId;
use kernel::model::room::{event::CreateRoom, Room};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[garde(skip)]
    pub name: String,
}

impl TryFrom<CreateRoomRequest> for CreateRoom {
    type Error = AppError;

    fn try_from(value: CreateRoomRequest) -> Result<Self, Self::Error> {
        CreateRoom::new(&value.name)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomsResponse {
    pub items: Vec<RoomResponse>,
}

impl From<Vec<Room>> for RoomsResponse {
    fn from(value: Vec<Room>) -> Self {
        Self {
            items: value.into_iter().map(RoomResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub id: RoomId,
    pub name: String,
}

impl From<Room> for RoomResponse {
    fn from(value: Room) -> Self {
        let Room { id, name } = value;
        Self { id, name }
    }
}
