use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::report::render_report;
use crate::core::{Clock, SystemClock};
use crate::errors::{AppError, AppResult};
use crate::storage::Stores;
use crate::ui::messages::info;
use crate::utils::date::{format_date, parse_date};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { date, today } = cmd {
        let d = match date {
            Some(s) if !*today => parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?,
            _ => SystemClock.today(),
        };

        let stores = Stores::open(cfg.storage, &cfg.data_path())?;

        // look up without materializing an empty bucket
        if stores.logs.bucket_for(d)?.is_none() {
            info(format!("No logs for {}", format_date(&d)));
            return Ok(());
        }

        let records = stores.logs.list_by_date(d)?;
        match render_report(&format_date(&d), &records) {
            Some(report) => println!("{report}"),
            None => info(format!("No logs for {}", format_date(&d))),
        }
    }
    Ok(())
}
