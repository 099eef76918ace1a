mod config;
mod db;
mod error;
mod export;
mod ledger;
mod logging;
mod models;
mod report;
mod run;
mod ui;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::from_env()?;
    config.ensure_dirs().with_context(|| {
        format!(
            "Failed to create data directory: {}",
            config.data_dir.display()
        )
    })?;
    logging::init(&config)?;

    let mut db = db::Database::open(&config.db_path)?;

    match args.len() {
        1 => run::as_tui(&mut db, &config),
        2.. => run::as_cli(&args, &mut db, &config),
        _ => {
            eprintln!("Usage: sitebook [command]");
            Ok(())
        }
    }
}
