//! Query command

use std::path::PathBuf;

use clap::Args;
use iudsync_core::logging_facility::{init, init_to_file, Profile};
use iudsync_core::render::render_table;
use iudsync_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult,
};
use iudsync_engine::commands::open_store;
use iudsync_engine::commands::query::render_json;
use iudsync_engine::config::{DEFAULT_DB_PATH, DEFAULT_TABLE};
use iudsync_engine::SyncConfig;

#[derive(Debug, Args)]
pub struct QueryArgs {
    #[arg(long, default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    #[arg(long, default_value = DEFAULT_TABLE)]
    pub table: String,

    /// Print rows as a JSON array
    #[arg(long)]
    pub json: bool,

    /// Log file, appended to; logs go to stderr when omitted
    #[arg(long)]
    pub logfilename: Option<PathBuf>,
}

pub fn execute(args: QueryArgs) -> Result<(), Box<dyn std::error::Error>> {
    match &args.logfilename {
        Some(path) => init_to_file(Profile::Development, path)?,
        None => init(Profile::Production),
    }

    let config = SyncConfig::default()
        .with_db_path(&args.db)
        .with_table(&args.table);
    let mut store = open_store(&config)?;

    let rows = match apply_engine_command(EngineCommand::Query, &mut store, &config)? {
        EngineCommandResult::Query(rows) => rows,
        EngineCommandResult::Upload(_) => return Err("unexpected upload result for query".into()),
    };

    if args.json {
        println!("{}", render_json(&rows)?);
    } else {
        print!("{}", render_table(&rows));
    }

    Ok(())
}
