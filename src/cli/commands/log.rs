use crate::cli::commands::misrouted;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Log { print } = cmd else {
        return Err(misrouted("log"));
    };

    if *print {
        let mut pool = DbPool::new(&cfg.database)?;
        LogLogic::print_log(&mut pool)?;
    }

    Ok(())
}
