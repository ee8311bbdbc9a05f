use crate::cli::commands::layer::lithology_code;
use crate::cli::commands::{misrouted, open_session, parse_role, parse_roles};
use crate::cli::parser::{BoreholeAction, Cli, Commands};
use crate::config::Config;
use crate::core::borehole::BoreholeLogic;
use crate::core::context::EditContext;
use crate::db::queries::find_group_id;
use crate::errors::AppResult;
use crate::models::borehole::Borehole;
use crate::models::workflow::WorkflowLog;
use crate::ui::messages::{header, info, success};
use crate::utils::colors::colorize_optional;
use crate::utils::formatting::{depth, timestamp, yes_no};
use crate::utils::table::{Column, Table};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Borehole { action } = &cli.command else {
        return Err(misrouted("borehole"));
    };

    let (mut pool, ctx) = open_session(cli, cfg)?;

    match action {
        BoreholeAction::Add {
            name,
            group,
            role,
            finished,
        } => {
            let group_id = find_group_id(&pool.conn, group)?;
            let role = parse_role(role)?;
            let b = BoreholeLogic::create(&mut pool, name, group_id, role, *finished, &ctx)?;
            success(format!("Borehole '{}' created with id {} ({})", b.name, b.id, role));
        }
        BoreholeAction::List { exclude } => {
            let excluded = parse_roles(exclude)?;
            let boreholes = BoreholeLogic::list(&mut pool, &excluded, &ctx)?;

            if boreholes.is_empty() {
                info("No visible boreholes.");
                return Ok(());
            }
            print!("{}", borehole_table(&boreholes).render());
        }
        BoreholeAction::Show { id } => {
            let (b, log) = BoreholeLogic::show(&mut pool, *id, &ctx)?;
            let lithology = lithology_code(&pool.conn, b.lithology)?;
            print_borehole(&b, &log, lithology, &ctx);
        }
        BoreholeAction::Set { id, field, value } => {
            let b = BoreholeLogic::patch(&mut pool, *id, field, value, &ctx)?;
            success(format!("Borehole {}: {} updated", b.id, field));
        }
    }

    Ok(())
}

fn borehole_table(boreholes: &[Borehole]) -> Table {
    let mut table = Table::new(vec![
        Column::new("ID", 6),
        Column::new("NAME", 24),
        Column::new("GROUP", 6),
        Column::new("PUBLISHED", 10),
        Column::new("DEPTH", 8),
        Column::new("LOCKED BY", 10),
    ]);

    for b in boreholes {
        table.add_row(vec![
            b.id.to_string(),
            b.name.clone(),
            b.group_id.to_string(),
            yes_no(b.published).to_string(),
            depth(b.total_depth),
            b.lock
                .map(|l| l.holder.to_string())
                .unwrap_or_else(|| "--".to_string()),
        ]);
    }

    table
}

pub(crate) fn print_workflow(log: &WorkflowLog) {
    let mut table = Table::new(vec![
        Column::new("ENTRY", 6),
        Column::new("ROLE", 8),
        Column::new("USER", 6),
        Column::new("STARTED", 17),
        Column::new("FINISHED", 17),
    ]);

    for e in &log.entries {
        table.add_row(vec![
            e.id.to_string(),
            e.role.to_string(),
            e.user_id.to_string(),
            timestamp(e.started_at),
            timestamp(e.finished_at),
        ]);
    }

    print!("{}", table.render());
}

fn print_borehole(b: &Borehole, log: &WorkflowLog, lithology: Option<String>, ctx: &EditContext) {
    header(format!("Borehole {} ({})", b.id, b.name));

    println!("  Workgroup    : {}", b.group_id);
    println!("  Published    : {}", yes_no(b.published));
    println!("  Total depth  : {}", depth(b.total_depth));
    println!("  Top bedrock  : {}", depth(b.top_bedrock));
    println!("  Bedrock      : {}", colorize_optional(lithology));
    println!("  Created      : {} by {}", timestamp(Some(b.created_at)), b.created_by);

    match b.lock {
        Some(lock) => {
            println!(
                "  Lock         : user {} since {}{}",
                lock.holder,
                timestamp(Some(lock.acquired_at)),
                if lock.is_expired(ctx.now, ctx.lock_timeout) {
                    " (expired)"
                } else {
                    ""
                }
            );
        }
        None => println!("  Lock         : --"),
    }

    println!(
        "  Stage        : {}\n",
        log.current_role()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "--".to_string())
    );

    print_workflow(log);
}
