use crate::cli::parser::Cli;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::storage::Stores;
use crate::ui::messages::success;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the storage directory for the selected backend
///  - the settings record for the owner
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if cfg.owner_id == 0 {
        return Err(AppError::Config(
            "owner id missing: pass --owner <ID> or set RWORKLOG_OWNER".into(),
        ));
    }

    let path = cfg.init_all(cli.test)?;
    if !cli.test {
        success(format!("Config file: {}", path.display()));
    }

    let data = cfg.data_path();
    let stores = Stores::open(cfg.storage, &data)?;
    let settings = stores.settings.ensure_owner(cfg.owner_id)?;

    success(format!(
        "Storage ({:?}) ready at {} for owner {}",
        cfg.storage,
        data.display(),
        settings.user_id
    ));
    Ok(())
}
