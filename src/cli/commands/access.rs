use crate::cli::commands::{misrouted, parse_roles};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::admin::AdminLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::role::Role;
use crate::ui::messages::success;

/// Handle `user-add`, `group-add` and `member`.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let mut pool = DbPool::new(&cfg.database)?;

    match cmd {
        Commands::UserAdd { username, admin } => {
            let id = AdminLogic::add_user(&mut pool, username, *admin)?;
            success(format!(
                "User '{}' created with id {}{}",
                username,
                id,
                if *admin { " (admin)" } else { "" }
            ));
        }
        Commands::GroupAdd { name } => {
            let id = AdminLogic::add_group(&mut pool, name)?;
            success(format!("Workgroup '{}' created with id {}", name, id));
        }
        Commands::Member {
            username,
            group,
            roles,
            disabled,
        } => {
            let roles = parse_roles(roles)?;
            let m = AdminLogic::set_membership(&mut pool, username, group, &roles, *disabled)?;
            success(format!(
                "{}@{}: [{}]{}",
                username,
                group,
                Role::list_to_db_str(&m.roles),
                if m.disabled { " (disabled)" } else { "" }
            ));
        }
        _ => return Err(misrouted("access")),
    }

    Ok(())
}
