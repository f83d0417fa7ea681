//! Line-oriented stdin/stdout transport.
//!
//! `/name` is a command, `!payload` a callback, anything else a text message.
//! A leading `@<chat_id>` sends the line as another chat.

use super::Notifier;
use crate::core::Dispatcher;
use crate::errors::{AppError, AppResult};
use crate::models::{Command, InboundEvent, Notification};
use std::io::Write;
use std::sync::Mutex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Parse one input line. Blank lines yield `None`.
pub fn parse_line(line: &str, owner: i64) -> AppResult<Option<InboundEvent>> {
    let mut rest = line.trim();
    let mut chat_id = owner;

    if let Some(tagged) = rest.strip_prefix('@') {
        let (id, tail) = tagged.split_once(char::is_whitespace).unwrap_or((tagged, ""));
        chat_id = id
            .parse()
            .map_err(|_| AppError::Transport(format!("invalid chat id: {id}")))?;
        rest = tail.trim();
    }

    if rest.is_empty() {
        return Ok(None);
    }

    let event = if rest.starts_with('/') {
        InboundEvent::command(chat_id, Command::from_name(rest)?)
    } else if let Some(payload) = rest.strip_prefix('!') {
        InboundEvent::callback(chat_id, payload.trim())
    } else {
        InboundEvent::text(chat_id, rest)
    };

    Ok(Some(event))
}

pub fn render_notification(n: &Notification) -> String {
    let mut out = n.body.clone();
    for c in &n.choices {
        out.push_str(&format!("\n  [{}] -> {}", c.label, c.payload));
    }
    out
}

pub struct ConsoleNotifier<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> ConsoleNotifier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> AppResult<W> {
        Ok(self.out.into_inner()?)
    }
}

impl<W: Write + Send> Notifier for ConsoleNotifier<W> {
    fn send(&self, notification: Notification) -> AppResult<()> {
        let mut out = self.out.lock()?;
        writeln!(out, "{}", render_notification(&notification))
            .and_then(|_| out.flush())
            .map_err(|e| AppError::Transport(e.to_string()))
    }
}

/// Feed lines from `input` to the dispatcher until EOF or `shutdown`.
///
/// Lines are handled one after another so piped input keeps its order.
/// `shutdown` is cancelled on return.
pub async fn run_console<R>(
    input: R,
    dispatcher: Dispatcher,
    owner: i64,
    shutdown: CancellationToken,
) -> AppResult<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    let result = loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => break Ok(()),
            line = lines.next_line() => line,
        };

        match line {
            Ok(Some(line)) => match parse_line(&line, owner) {
                Ok(Some(event)) => {
                    if let Err(e) = dispatcher.dispatch(event).await {
                        warn!("event task failed: {e}");
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("{e}"),
            },
            Ok(None) => {
                info!("input closed");
                break Ok(());
            }
            Err(e) => break Err(AppError::Io(e)),
        }
    };

    shutdown.cancel();
    result
}
