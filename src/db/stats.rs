use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use chrono::{Duration, Utc};
use rusqlite::Connection;
use std::fs;

fn count(conn: &Connection, sql: &str) -> rusqlite::Result<i64> {
    conn.query_row(sql, [], |row| row.get(0))
}

pub fn print_db_info(pool: &mut DbPool, db_path: &str, lock_timeout: Duration) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) TOTALS
    //
    let totals = [
        ("Boreholes", "SELECT COUNT(*) FROM boreholes"),
        ("Published", "SELECT COUNT(*) FROM boreholes WHERE published = 1"),
        ("Profiles", "SELECT COUNT(*) FROM stratigraphies"),
        ("Layers", "SELECT COUNT(*) FROM layers"),
        ("Users", "SELECT COUNT(*) FROM users"),
    ];
    for (label, sql) in totals {
        let n = count(&pool.conn, sql)?;
        println!("{}• {}:{} {}{}{}", CYAN, label, RESET, GREEN, n, RESET);
    }

    //
    // 3) ACTIVE LOCKS (younger than the timeout)
    //
    let threshold = (Utc::now() - lock_timeout).to_rfc3339();
    let active: i64 = pool.conn.query_row(
        "SELECT COUNT(*) FROM boreholes WHERE locked_by IS NOT NULL AND locked_at > ?1",
        [threshold],
        |row| row.get(0),
    )?;

    if active == 0 {
        println!("{}• Active locks:{} {}0{}", CYAN, RESET, GREY, RESET);
    } else {
        println!("{}• Active locks:{} {}{}{}", CYAN, RESET, YELLOW, active, RESET);
    }

    println!();
    Ok(())
}
