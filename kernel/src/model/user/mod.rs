use crate::model::id::UserId;

pub mod event;

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
}
