use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use ansi_term::Colour;
use regex::Regex;
use unicode_width::UnicodeWidthStr;

const OP_MAX_WIDTH: usize = 48;

fn strip_ansi(re: &Regex, s: &str) -> String {
    re.replace_all(s, "").into_owned()
}

/// ANSI colour per audit operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "lock" => Colour::Yellow,
        "unlock" => Colour::RGB(255, 153, 51),
        "submit" | "workflow_start" => Colour::Green,
        "reject" => Colour::Red,
        "reset" => Colour::Purple,
        "migration_applied" => Colour::Purple,
        other if other.starts_with("layer_") => Colour::Cyan,
        other if other.starts_with("profile_") => Colour::Blue,
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &mut DbPool) -> AppResult<()> {
        let ansi = Regex::new(r"\x1B\[[0-9;]*[mK]").map_err(|e| AppError::Other(e.to_string()))?;

        let entries: Vec<_> = load_log(&pool.conn)?
            .into_iter()
            .map(|(id, raw_date, operation, target, message)| {
                let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or(raw_date);
                (id, date, operation, target, message)
            })
            .collect();

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|(id, ..)| id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries
            .iter()
            .map(|(_, date, ..)| date.width())
            .max()
            .unwrap_or(10);

        println!("📜 Internal log:\n");

        for (id, date, operation, target, message) in entries {
            let color = color_for_operation(&operation);

            let mut visible = if target.is_empty() {
                operation.clone()
            } else {
                format!("{operation} ({target})")
            };
            if visible.width() > OP_MAX_WIDTH {
                visible = visible.chars().take(OP_MAX_WIDTH - 3).collect::<String>() + "...";
            }

            // only the operation word is coloured
            let colored = match visible.split_once(' ') {
                Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
                None => color.paint(visible.as_str()).to_string(),
            };

            let padding = " ".repeat(OP_MAX_WIDTH.saturating_sub(strip_ansi(&ansi, &colored).width()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id,
                date,
                colored,
                padding,
                message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
