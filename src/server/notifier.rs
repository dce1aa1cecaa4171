use crate::domain_model::Notification;
use crate::domain_port::{NotificationSender, PushGateway};
use anyhow::anyhow;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub fn notification_channel(depth: usize) -> (QueuedNotificationSender, mpsc::Receiver<Notification>) {
    let (tx, rx) = mpsc::channel(depth);
    (QueuedNotificationSender { queue: tx }, rx)
}

/// Enqueue-only sender handed to the protocol layer. `notify` never waits
/// on delivery; a full queue drops the notification, which is acceptable
/// for best-effort pushes.
pub struct QueuedNotificationSender {
    queue: mpsc::Sender<Notification>,
}

#[async_trait::async_trait]
impl NotificationSender for QueuedNotificationSender {
    async fn notify(&self, notification: Notification) -> anyhow::Result<()> {
        self.queue
            .try_send(notification)
            .map_err(|e| anyhow!("notification queue rejected push: {e}"))
    }
}

/// Background task draining the queue into the gateway. Delivery failures
/// are logged and the notification is dropped; there is no retry.
pub struct NotificationPump {
    rx: mpsc::Receiver<Notification>,
    gateway: Arc<dyn PushGateway>,
    cancellation_token: CancellationToken,
}

impl NotificationPump {
    pub fn new(
        rx: mpsc::Receiver<Notification>,
        gateway: Arc<dyn PushGateway>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            rx,
            gateway,
            cancellation_token,
        }
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                _ = self.cancellation_token.cancelled() => {
                    tracing::info!("notification pump shutting down...");
                    break;
                }
                next = self.rx.recv() => {
                    let Some(notification) = next else { break };
                    if let Err(e) = self.gateway.push(&notification).await {
                        tracing::warn!(
                            recipient = %notification.recipient,
                            "push delivery failed: {e:#}"
                        );
                    }
                }
            }
        }
    }
}

/// Default gateway: logs the delivery instead of talking to a push
/// provider.
#[derive(Debug, Default)]
pub struct LogPushGateway;

#[async_trait::async_trait]
impl PushGateway for LogPushGateway {
    async fn push(&self, notification: &Notification) -> anyhow::Result<()> {
        tracing::info!(
            recipient = %notification.recipient,
            kind = ?notification.kind,
            "push: {}: {}",
            notification.title,
            notification.message,
        );
        Ok(())
    }
}
