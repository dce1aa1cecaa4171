use crate::domain_model::Notification;
use crate::domain_port::{NotificationSender, PushGateway};
use anyhow::bail;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Captures notifications instead of delivering them. `set_failing` makes
/// every call error, for verifying that notification failure never fails
/// the enclosing mutation.
#[derive(Default)]
pub struct RecordingNotificationSender {
    sent: Mutex<Vec<Notification>>,
    failing: AtomicBool,
}

impl RecordingNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }
}

#[async_trait::async_trait]
impl NotificationSender for RecordingNotificationSender {
    async fn notify(&self, notification: Notification) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("simulated notification failure");
        }
        self.sent.lock().unwrap().push(notification);
        Ok(())
    }
}

/// Gateway double for pump tests.
#[derive(Default)]
pub struct RecordingPushGateway {
    pushed: Mutex<Vec<Notification>>,
    failing: AtomicBool,
}

impl RecordingPushGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn pushed(&self) -> Vec<Notification> {
        self.pushed.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PushGateway for RecordingPushGateway {
    async fn push(&self, notification: &Notification) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("simulated push failure");
        }
        self.pushed.lock().unwrap().push(notification.clone());
        Ok(())
    }
}
