use super::Notifier;
use crate::errors::AppResult;
use crate::models::Notification;
use std::sync::Mutex;

/// Notifier that keeps everything it was asked to send.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<Notification>>,
    acks: Mutex<Vec<i64>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notification> {
        self.sent.lock().ok().and_then(|v| v.last().cloned())
    }

    pub fn acknowledged(&self) -> Vec<i64> {
        self.acks.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut v) = self.sent.lock() {
            v.clear();
        }
    }
}

impl Notifier for MemoryNotifier {
    fn send(&self, notification: Notification) -> AppResult<()> {
        self.sent.lock()?.push(notification);
        Ok(())
    }

    fn acknowledge(&self, chat_id: i64) -> AppResult<()> {
        self.acks.lock()?.push(chat_id);
        Ok(())
    }
}
