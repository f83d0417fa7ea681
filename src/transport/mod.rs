//! Boundary between the conversation core and a chat platform.
//!
//! The core only ever produces [`Notification`]s and consumes
//! [`crate::models::InboundEvent`]s; a transport turns those into platform
//! messages.

pub mod console;
pub mod memory;

use crate::errors::AppResult;
use crate::models::Notification;

pub trait Notifier: Send + Sync {
    fn send(&self, notification: Notification) -> AppResult<()>;

    /// Answer a platform callback once it has been routed.
    fn acknowledge(&self, _chat_id: i64) -> AppResult<()> {
        Ok(())
    }
}

pub use console::ConsoleNotifier;
pub use memory::MemoryNotifier;
