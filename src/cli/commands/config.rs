use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use std::fs;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
    } = cmd
    {
        if *print_config {
            println!("{}", cfg.to_yaml()?);
        }

        if *check {
            let path = Config::config_file();
            if !path.exists() {
                warning(format!(
                    "No configuration file at {} (defaults in use)",
                    path.display()
                ));
                return Ok(());
            }

            let missing = Config::missing_fields(&fs::read_to_string(&path)?)?;
            if missing.is_empty() {
                success("Configuration is complete.");
            } else {
                for field in missing {
                    warning(format!("Missing field: {field}"));
                }
            }
        }
    }

    Ok(())
}
