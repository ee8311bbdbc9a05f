use crate::cli::commands::misrouted;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db { migrate, check, info } = cmd else {
        return Err(misrouted("db"));
    };

    let mut pool = DbPool::new(&cfg.database)?;

    //
    // 1) MIGRATE
    //
    if *migrate {
        println!("{}▶ Running migrations…{}", CYAN, RESET);
        run_pending_migrations(&pool.conn)?;
        println!("{}✔ Migration completed.{}\n", GREEN, RESET);
    }

    //
    // 2) INFO
    //
    if *info {
        stats::print_db_info(&mut pool, &cfg.database, cfg.lock_timeout()?)?;
    }

    //
    // 3) CHECK
    //
    if *check {
        println!("{}▶ Running integrity check…{}", CYAN, RESET);

        let integrity: String = pool
            .conn
            .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

        if integrity == "ok" {
            println!("{}✔ Integrity check passed.{}\n", GREEN, RESET);
        } else {
            println!("{}✘ Integrity check failed:{} {}\n", RED, RESET, integrity);
        }
    }

    Ok(())
}
