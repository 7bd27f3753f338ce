//! Upload command

use std::path::PathBuf;

use clap::Args;
use iudsync_core::logging_facility::{init_to_file, Profile};
use iudsync_core::reconcile::render_human_summary;
use iudsync_core::render::render_table;
use iudsync_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult,
};
use iudsync_engine::commands::open_store;
use iudsync_engine::commands::query::query_table;
use iudsync_engine::config::{DEFAULT_CHUNK_SIZE, DEFAULT_DB_PATH, DEFAULT_TABLE};
use iudsync_engine::SyncConfig;

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// CSV file to reconcile
    #[arg(long)]
    pub csvupload: PathBuf,

    /// Log file, appended to
    #[arg(long)]
    pub logfilename: PathBuf,

    /// Process the file in chunks (true/false, yes/no, 1/0)
    #[arg(long, action = clap::ArgAction::Set, value_parser = parse_flag)]
    pub largetable: bool,

    #[arg(long, default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    #[arg(long, default_value = DEFAULT_TABLE)]
    pub table: String,

    /// Rows per chunk when --largetable is set
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// In chunked mode, keep stored rows missing from the file instead of
    /// tagging them as deletes
    #[arg(long)]
    pub keep_missing: bool,

    /// Print the table after the upload
    #[arg(long)]
    pub query: bool,
}

/// Parse a boolean flag value, case-insensitively
pub fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(format!(
            "invalid boolean {:?} (expected true/false, yes/no or 1/0)",
            raw
        )),
    }
}

pub fn execute(args: UploadArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_to_file(Profile::Development, &args.logfilename)?;

    let config = SyncConfig::default()
        .with_db_path(&args.db)
        .with_table(&args.table)
        .with_chunk_size(args.chunk_size)
        .with_detect_deletes(!args.keep_missing);
    let mut store = open_store(&config)?;

    let cmd = EngineCommand::Upload {
        csv_path: args.csvupload.clone(),
        large_table: args.largetable,
    };
    let report = match apply_engine_command(cmd, &mut store, &config)? {
        EngineCommandResult::Upload(report) => report,
        EngineCommandResult::Query(_) => return Err("unexpected query result for upload".into()),
    };

    tracing::info!(
        run_id = %report.run_id,
        mode = %report.mode,
        first_load = report.first_load,
        "upload complete"
    );

    print!("{}", render_human_summary(&config.table_name, &report.summary));
    println!("  mode: {} ({} chunk(s))", report.mode, report.chunks);
    if report.first_load {
        println!("  (first load)");
    }

    if args.query {
        let rows = query_table(&store, &config.table_name)?;
        print!("{}", render_table(&rows));
    }

    Ok(())
}
