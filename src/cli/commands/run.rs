use crate::config::Config;
use crate::core::{BotContext, Conversation, Dispatcher, SystemClock, Workday};
use crate::errors::{AppError, AppResult};
use crate::storage::Stores;
use crate::transport::ConsoleNotifier;
use crate::transport::console::run_console;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Handle the `run` command: serve the console transport until stdin closes
/// or Ctrl-C is pressed.
pub fn handle(cfg: &Config) -> AppResult<()> {
    if cfg.owner_id == 0 {
        return Err(AppError::Config(
            "owner id missing: pass --owner <ID> or set RWORKLOG_OWNER".into(),
        ));
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(serve(cfg));

    // a pending stdin read cannot be interrupted
    runtime.shutdown_timeout(Duration::from_millis(500));
    result
}

async fn serve(cfg: &Config) -> AppResult<()> {
    let stores = Stores::open(cfg.storage, &cfg.data_path())?;
    stores.settings.ensure_owner(cfg.owner_id)?;

    let shutdown = CancellationToken::new();
    let ctx = BotContext::new(
        stores,
        Arc::new(ConsoleNotifier::new(std::io::stdout())),
        Arc::new(SystemClock),
        cfg.bot_options(),
    );
    let conversation = Arc::new(Conversation::new(ctx, Workday::new(shutdown.clone())));
    let dispatcher = Dispatcher::new(conversation);

    let interrupt = shutdown.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = interrupt.cancelled() => {}
            res = tokio::signal::ctrl_c() => {
                if res.is_ok() {
                    info!("interrupted, shutting down");
                }
                interrupt.cancel();
            }
        }
    });

    info!(owner = cfg.owner_id, storage = ?cfg.storage, "bot running on console");
    run_console(
        BufReader::new(tokio::io::stdin()),
        dispatcher,
        cfg.owner_id,
        shutdown,
    )
    .await
}
