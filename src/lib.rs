//! boredit library root.
//! Exposes the CLI parser, the high-level run() function, and internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::UserAdd { .. } | Commands::GroupAdd { .. } | Commands::Member { .. } => {
            commands::access::handle(&cli.command, cfg)
        }
        Commands::Borehole { .. } => commands::borehole::handle(cli, cfg),
        Commands::Lock { .. } | Commands::Unlock { .. } => commands::lock::handle(cli, cfg),
        Commands::Workflow { .. } => commands::workflow::handle(cli, cfg),
        Commands::Profile { .. } => commands::profile::handle(cli, cfg),
        Commands::Layer { .. } => commands::layer::handle(cli, cfg),
        Commands::Validate { .. } => commands::validate::handle(cli, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // config is loaded once
    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = utils::path::expand_tilde(custom_db)
            .to_string_lossy()
            .to_string();
    }

    dispatch(&cli, &cfg)
}
