use crate::config::Config;
use crate::errors::AppResult;
use crate::storage::Stores;
use crate::ui::messages::info;
use crate::utils::date::format_date;

pub fn handle(cfg: &Config) -> AppResult<()> {
    let stores = Stores::open(cfg.storage, &cfg.data_path())?;
    let dates = stores.logs.list_dates_with_logs()?;

    if dates.is_empty() {
        info("No logs yet.");
        return Ok(());
    }

    for d in dates {
        println!("{}", format_date(&d));
    }
    Ok(())
}
