use crate::domain_model::Notification;

/// Delivery transport behind the notification pump.
#[async_trait::async_trait]
pub trait PushGateway: Send + Sync {
    async fn push(&self, notification: &Notification) -> anyhow::Result<()>;
}
