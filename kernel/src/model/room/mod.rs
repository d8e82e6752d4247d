use crate::model::id::RoomId;

pub mod event;

/// Bookable physical room. Reference data provisioned up front; the
/// reservation core never mutates it.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
}
