use crate::domain_model::Notification;

/// Fire-and-forget hand-off from the protocol layer. Implementations must
/// not block on delivery; failures are for the caller to log, never to
/// propagate into the enclosing relationship mutation.
#[async_trait::async_trait]
pub trait NotificationSender: Send + Sync {
    async fn notify(&self, notification: Notification) -> anyhow::Result<()>;
}
