use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::id::UserId;
use crate::model::user::{event::CreateUser, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Register a new account. Implementations enforce the institutional
    /// email policy and reject duplicate addresses.
    async fn create(&self, event: CreateUser) -> AppResult<User>;
    async fn find_current_user(&self, user_id: UserId) -> AppResult<Option<User>>;
}
