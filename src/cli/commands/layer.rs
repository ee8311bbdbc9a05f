use crate::cli::commands::{misrouted, open_session};
use crate::cli::parser::{Cli, Commands, LayerAction};
use crate::config::Config;
use crate::core::layer::LayerLogic;
use crate::core::layer::repair::{DeleteMode, GapMode, LayerChange};
use crate::db::codelist::code_of;
use crate::errors::AppResult;
use crate::models::layer::Layer;
use crate::ui::messages::{info, success};
use crate::utils::formatting::depth;
use crate::utils::table::{Column, Table};
use rusqlite::Connection;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Layer { action } = &cli.command else {
        return Err(misrouted("layer"));
    };

    let (mut pool, ctx) = open_session(cli, cfg)?;

    match action {
        LayerAction::Add { profile } => {
            let layer = LayerLogic::create(&mut pool, *profile, &ctx)?;
            success(format!(
                "Layer {} added to profile {} at {}",
                layer.id,
                profile,
                depth(layer.depth_from)
            ));
        }
        LayerAction::Del { layer, mode, value } => {
            let mode = DeleteMode::from_code(*mode, *value)?;
            let changes = LayerLogic::delete(&mut pool, *layer, mode, &ctx)?;
            success(format!("Layer {} deleted", layer));
            print_changes(&changes);
        }
        LayerAction::Gap { layer, mode, value } => {
            let mode = GapMode::from_code(*mode, *value)?;
            let changes = LayerLogic::gap(&mut pool, *layer, mode, &ctx)?;
            success(format!("Gap above layer {} closed", layer));
            print_changes(&changes);
        }
        LayerAction::Set {
            layer,
            field,
            value,
        } => {
            LayerLogic::patch(&mut pool, *layer, field, value, &ctx)?;
            success(format!("Layer {}: {} updated", layer, field));
        }
        LayerAction::List { profile } => {
            let layers = LayerLogic::list(&mut pool, *profile, &ctx)?;
            if layers.is_empty() {
                info(format!("Profile {} has no layers.", profile));
            } else {
                print!("{}", layer_table(&pool.conn, &layers)?.render());
            }
        }
    }

    Ok(())
}

fn print_changes(changes: &[LayerChange]) {
    for change in changes {
        match change {
            LayerChange::SetDepthFrom { id, value } => {
                println!("  layer {id}: depth_from → {}", depth(*value))
            }
            LayerChange::SetDepthTo { id, value } => {
                println!("  layer {id}: depth_to → {}", depth(*value))
            }
            LayerChange::InsertFiller {
                depth_from,
                depth_to,
            } => println!(
                "  filler layer inserted {} – {}",
                depth(Some(*depth_from)),
                depth(*depth_to)
            ),
            LayerChange::Remove { id } => println!("  layer {id}: removed"),
        }
    }
}

/// Layer rows with the lithology shown by code.
pub(crate) fn layer_table(conn: &Connection, layers: &[Layer]) -> AppResult<Table> {
    let mut table = Table::new(vec![
        Column::new("ID", 6),
        Column::new("FROM", 8),
        Column::new("TO", 8),
        Column::new("LITHOLOGY", 12),
        Column::new("DESCRIPTION", 30),
    ]);

    for l in layers {
        table.add_row(vec![
            l.id.to_string(),
            depth(l.depth_from),
            depth(l.depth_to),
            lithology_code(conn, l.lithology)?.unwrap_or_else(|| "--".to_string()),
            l.description.clone().unwrap_or_default(),
        ]);
    }

    Ok(table)
}

pub(crate) fn lithology_code(conn: &Connection, id: Option<i64>) -> AppResult<Option<String>> {
    match id {
        Some(id) => code_of(conn, id),
        None => Ok(None),
    }
}
