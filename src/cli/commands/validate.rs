use crate::cli::commands::layer::layer_table;
use crate::cli::commands::{misrouted, open_session};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::layer::validate::{LayerFlags, ProfileReport};
use crate::core::profile::ProfileLogic;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, success, warning};
use crate::utils::colors::colorize_flag;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Validate { profile, json } = &cli.command else {
        return Err(misrouted("validate"));
    };

    let (mut pool, ctx) = open_session(cli, cfg)?;
    let (layers, report) = ProfileLogic::validate(&mut pool, *profile, &ctx)?;

    if *json {
        let out = serde_json::json!({ "layers": layers, "report": report });
        let text = serde_json::to_string_pretty(&out).map_err(|e| AppError::Other(e.to_string()))?;
        println!("{}", text);
        return Ok(());
    }

    header(format!("Profile {}", profile));
    if !layers.is_empty() {
        print!("{}", layer_table(&pool.conn, &layers)?.render());
        println!();
    }

    if report.is_clean() {
        success("No consistency issues.");
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &ProfileReport) {
    if report.missing_layers {
        warning("Profile does not start at the surface (0 m).");
    }
    if report.wrong_depth {
        warning("Last layer does not end at the borehole's total depth.");
    }
    if report.missing_bedrock {
        warning("No layer starts at the declared top of bedrock.");
    }

    for flags in report.layers.iter().filter(|f| f.any()) {
        println!("  layer {:<6} {}", flags.id, describe(flags));
    }
}

fn describe(flags: &LayerFlags) -> String {
    [
        ("missing_from", flags.missing_from),
        ("missing_to", flags.missing_to),
        ("inverted", flags.inverted_depth),
        ("top_disjoint", flags.top_disjoint),
        ("top_overlap", flags.top_overlap),
        ("bottom_disjoint", flags.bottom_disjoint),
        ("bottom_overlap", flags.bottom_overlap),
        ("lithology", flags.wrong_lithology),
        ("lithostratigraphy", flags.wrong_lithostratigraphy),
    ]
    .iter()
    .filter(|(_, raised)| *raised)
    .map(|(label, raised)| colorize_flag(label, *raised))
    .collect::<Vec<_>>()
    .join(" ")
}
