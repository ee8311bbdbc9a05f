use crate::cli::commands::{misrouted, open_session};
use crate::cli::parser::{Cli, Commands, ProfileAction};
use crate::config::Config;
use crate::core::profile::ProfileLogic;
use crate::errors::{AppError, AppResult};
use crate::models::profile::ProfileKind;
use crate::ui::messages::{info, success};
use crate::utils::formatting::yes_no;
use crate::utils::table::{Column, Table};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Profile { action } = &cli.command else {
        return Err(misrouted("profile"));
    };

    let (mut pool, ctx) = open_session(cli, cfg)?;

    match action {
        ProfileAction::Add {
            borehole,
            kind,
            name,
        } => {
            let kind = ProfileKind::from_code(kind)
                .ok_or_else(|| AppError::InvalidValue(format!("unknown profile kind '{kind}'")))?;
            let p = ProfileLogic::create(&mut pool, *borehole, kind, name.as_deref(), &ctx)?;
            success(format!(
                "Profile {} ({}) added to borehole {}{}",
                p.id,
                kind.to_db_str(),
                borehole,
                if p.primary { ", primary" } else { "" }
            ));
        }
        ProfileAction::Primary { profile } => {
            ProfileLogic::set_primary(&mut pool, *profile, &ctx)?;
            success(format!("Profile {} is now primary", profile));
        }
        ProfileAction::Del { profile } => {
            ProfileLogic::delete(&mut pool, *profile, &ctx)?;
            success(format!("Profile {} deleted", profile));
        }
        ProfileAction::List { borehole } => {
            let profiles = ProfileLogic::list(&mut pool, *borehole, &ctx)?;
            if profiles.is_empty() {
                info(format!("Borehole {} has no profiles.", borehole));
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("ID", 6),
                Column::new("KIND", 14),
                Column::new("PRIMARY", 8),
                Column::new("NAME", 24),
            ]);
            for p in &profiles {
                table.add_row(vec![
                    p.id.to_string(),
                    p.kind.to_db_str().to_string(),
                    yes_no(p.primary).to_string(),
                    p.name.clone().unwrap_or_else(|| "--".to_string()),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
