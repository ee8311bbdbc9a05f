use crate::cli::commands::misrouted;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::config::ConfigLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Config { print_config, check } = cmd else {
        return Err(misrouted("config"));
    };

    let path = Config::config_file();

    if *print_config {
        println!("📄 Current configuration:\n");
        ConfigLogic::print(cfg)?;
    }

    if *check {
        if !path.exists() {
            info(format!(
                "No configuration file at {}; defaults are in use.",
                path.display()
            ));
            return Ok(());
        }

        let missing = ConfigLogic::missing_keys(&path)?;
        if missing.is_empty() {
            success("Configuration file is complete.");
        } else {
            for key in missing {
                warning(format!("Missing field '{}' (default applies)", key));
            }
        }
    }

    Ok(())
}
