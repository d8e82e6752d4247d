use async_trait::async_trait;
use derive_new::new;
use kernel::model::id::UserId;
use kernel::model::user::{event::CreateUser, User};
use kernel::repository::user::UserRepository;
use shared::config::RegistrationPolicy;
use shared::error::{AppError, AppResult};

use crate::database::model::user::UserRow;
use crate::database::ConnectionPool;
use crate::password::hash_password;

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
    registration_policy: RegistrationPolicy,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, event: CreateUser) -> AppResult<User> {
        let email = event.email.trim().to_owned();
        if !self.registration_policy.permits(&email) {
            return Err(AppError::ForbiddenOperation(
                "access denied: an institutional email address is required".into(),
            ));
        }

        let password_hash = hash_password(&event.password)?;
        let user_id = UserId::new();
        let res = sqlx::query(
            r#"
            INSERT INTO users (user_id, user_name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user_id)
        .bind(&event.user_name)
        .bind(&email)
        .bind(&password_hash)
        .execute(self.db.inner_ref())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::UnprocessableEntity("this email is already registered".into())
            } else {
                AppError::SpecificOperationError(e)
            }
        })?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no user record has been created".into(),
            ));
        }

        Ok(User {
            user_id,
            user_name: event.user_name,
            email,
        })
    }

    async fn find_current_user(&self, user_id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(
            "SELECT user_id, user_name, email FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map(|row| row.map(User::from))
        .map_err(AppError::SpecificOperationError)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "23505")
}
