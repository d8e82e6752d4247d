use std::sync::Arc;

use async_trait::async_trait;
use derive_new::new;
use kernel::model::auth::{event::CreateToken, AccessToken};
use kernel::model::id::UserId;
use kernel::repository::auth::AuthRepository;
use shared::error::{AppError, AppResult};
use uuid::Uuid;

use crate::database::model::user::UserCredentialRow;
use crate::database::ConnectionPool;
use crate::password::verify_password;
use crate::redis::RedisClient;

#[derive(new)]
pub struct AuthRepositoryImpl {
    db: ConnectionPool,
    kv: Arc<RedisClient>,
    ttl: u64,
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>> {
        let Some(value) = self.kv.get(&access_token.0).await? else {
            return Ok(None);
        };
        Ok(Some(value.parse::<UserId>()?))
    }

    async fn verify_user(&self, email: &str, password: &str) -> AppResult<UserId> {
        let credential = sqlx::query_as::<_, UserCredentialRow>(
            "SELECT user_id, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        // An unknown address and a wrong password are indistinguishable to
        // the caller.
        let Some(credential) = credential else {
            return Err(AppError::UnauthenticatedError);
        };
        if !verify_password(password, &credential.password_hash)? {
            return Err(AppError::UnauthenticatedError);
        }
        Ok(credential.user_id)
    }

    async fn create_token(&self, event: CreateToken) -> AppResult<AccessToken> {
        let token = AccessToken(Uuid::new_v4().simple().to_string());
        self.kv
            .set_ex(&token.0, &event.user_id.to_string(), self.ttl)
            .await?;
        Ok(token)
    }

    async fn delete_token(&self, access_token: AccessToken) -> AppResult<()> {
        self.kv.delete(&access_token.0).await
    }
}
