//! Conversation core: the state machine, the scheduler that drives it, and
//! the dispatcher that feeds it transport events.

pub mod clock;
pub mod context;
pub mod dispatcher;
pub mod machine;
pub mod report;
pub mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use context::{BotContext, BotOptions};
pub use dispatcher::Dispatcher;
pub use machine::{Conversation, Outcome};
pub use scheduler::{Scheduler, Workday};
