use crate::cli::commands::borehole::print_workflow;
use crate::cli::commands::{misrouted, open_session, parse_role};
use crate::cli::parser::{Cli, Commands, WorkflowAction};
use crate::config::Config;
use crate::core::workflow::WorkflowEngine;
use crate::errors::AppResult;
use crate::models::workflow::WorkflowLog;
use crate::ui::messages::{info, success};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Workflow { action } = &cli.command else {
        return Err(misrouted("workflow"));
    };

    let (mut pool, ctx) = open_session(cli, cfg)?;

    match action {
        WorkflowAction::Start {
            borehole,
            role,
            finished,
        } => {
            let role = parse_role(role)?;
            let id = WorkflowEngine::start(&mut pool, *borehole, &ctx, role, *finished)?;
            success(format!("Workflow of borehole {} started at {} (entry {})", borehole, role, id));
        }
        WorkflowAction::Submit { entry } => {
            let log = WorkflowEngine::submit(&mut pool, *entry, &ctx)?;
            report("Submitted", *entry, &log);
        }
        WorkflowAction::Reject { entry } => {
            let log = WorkflowEngine::reject(&mut pool, *entry, &ctx)?;
            report("Rejected", *entry, &log);
        }
        WorkflowAction::Reset { entry, role } => {
            let role = parse_role(role)?;
            let log = WorkflowEngine::reset(&mut pool, *entry, role, &ctx)?;
            report("Reset", *entry, &log);
        }
        WorkflowAction::History { borehole } => {
            let log = WorkflowEngine::history(&mut pool, *borehole, &ctx)?;
            if log.is_empty() {
                info(format!("Borehole {} has no workflow.", borehole));
            } else {
                print_workflow(&log);
            }
        }
    }

    Ok(())
}

fn report(verb: &str, entry: i64, log: &WorkflowLog) {
    let stage = log
        .current_role()
        .map(|r| r.to_string())
        .unwrap_or_else(|| "--".to_string());
    success(format!("{} entry {}; current stage {}", verb, entry, stage));
}
