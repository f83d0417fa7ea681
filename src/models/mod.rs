pub mod event;
pub mod log_record;
pub mod notification;
pub mod settings;
pub mod state;

pub use event::{Command, EventKind, InboundEvent};
pub use log_record::LogRecord;
pub use notification::{Choice, Notification};
pub use settings::UserSettings;
pub use state::ConversationState;
