use crate::cli::commands::{misrouted, open_session};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::lock::LockManager;
use crate::errors::AppResult;
use crate::ui::messages::{locked, success};
use crate::utils::formatting::timestamp;

/// Handle `lock` and `unlock`.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let (mut pool, ctx) = open_session(cli, cfg)?;

    match &cli.command {
        Commands::Lock { borehole } => {
            let lock = LockManager::acquire(&mut pool, *borehole, &ctx)?;
            locked(format!(
                "Borehole {} locked by '{}' at {} (expires after {} min)",
                borehole,
                ctx.user.username,
                timestamp(Some(lock.acquired_at)),
                cfg.lock_timeout_minutes
            ));
        }
        Commands::Unlock { borehole } => {
            LockManager::release(&mut pool, *borehole, &ctx)?;
            success(format!("Borehole {} unlocked", borehole));
        }
        _ => return Err(misrouted("lock")),
    }

    Ok(())
}
