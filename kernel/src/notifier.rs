use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_new::new;
use shared::error::AppResult;

/// Details forwarded to the facilities team when a reservation carries
/// requirements ("need a projector", ...).
#[derive(Debug, Clone, new)]
pub struct RequirementNotice {
    pub title: String,
    pub room_name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub responsible: String,
    pub requirements: String,
}

/// Best-effort outbound notification. Callers dispatch it after the booking
/// has committed and never let its outcome reach the reservation result.
#[async_trait]
pub trait RequirementNotifier: Send + Sync {
    async fn notify(&self, notice: RequirementNotice) -> AppResult<()>;
}
