use crate::core::machine::{Conversation, Outcome};
use crate::models::{EventKind, InboundEvent};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Routes inbound events into the conversation, one task per event.
#[derive(Clone)]
pub struct Dispatcher {
    conversation: Arc<Conversation>,
}

impl Dispatcher {
    pub fn new(conversation: Arc<Conversation>) -> Self {
        Self { conversation }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Handle `event` on the blocking pool. Failures are logged; the returned
    /// handle resolves to the outcome, or `None` when the transition aborted.
    pub fn dispatch(&self, event: InboundEvent) -> JoinHandle<Option<Outcome>> {
        let conversation = self.conversation.clone();
        let runtime = Handle::current();

        tokio::task::spawn_blocking(move || {
            let _enter = runtime.enter();
            let chat_id = event.chat_id;
            let is_callback = matches!(event.kind, EventKind::Callback(_));
            let kind = event.kind.label();

            match conversation.handle(event) {
                Ok(outcome) => {
                    debug!(chat_id, kind, ?outcome, "event dispatched");
                    if is_callback
                        && outcome == Outcome::Handled
                        && let Err(e) = conversation.context().notifier.acknowledge(chat_id)
                    {
                        error!("failed to acknowledge callback: {e}");
                    }
                    Some(outcome)
                }
                Err(e) => {
                    error!(chat_id, kind, "event handling aborted: {e}");
                    None
                }
            }
        })
    }
}
