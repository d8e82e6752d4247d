use async_trait::async_trait;
use kernel::notifier::{RequirementNotice, RequirementNotifier};
use shared::config::EmailConfig;
use shared::error::{AppError, AppResult};

/// Sends requirement notices to the facilities team through an HTTP email
/// provider. All transport detail stays here; callers only see `notify`.
pub struct EmailNotifier {
    client: reqwest::Client,
    config: EmailConfig,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl RequirementNotifier for EmailNotifier {
    async fn notify(&self, notice: RequirementNotice) -> AppResult<()> {
        if self.config.endpoint.is_empty() {
            tracing::debug!("email endpoint not configured, dropping requirement notice");
            return Ok(());
        }

        let subject = format!("New requirement: {}", notice.title);
        let body = format!(
            "Event: {}\nRoom: {}\nSchedule: {} - {}\nResponsible: {}\n\n\
             Requested requirements:\n{}",
            notice.title,
            notice.room_name,
            notice.start.format("%Y-%m-%d %H:%M"),
            notice.end.format("%Y-%m-%d %H:%M"),
            notice.responsible,
            notice.requirements,
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&serde_json::json!({
                "from": self.config.from_address,
                "to": self.config.facilities_address,
                "subject": subject,
                "text": body,
            }))
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("email provider request failed: {e}"))
            })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "email provider returned {}",
                response.status()
            )));
        }

        tracing::info!(room = %notice.room_name, "requirement notice delivered");
        Ok(())
    }
}
