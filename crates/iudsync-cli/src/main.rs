//! iudsync CLI
//!
//! Command-line interface for reconciling CSV snapshots into a SQLite table

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "iudsync")]
#[command(about = "iudsync - Insert/Update/Delete snapshot reconciliation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Reconcile a CSV file into the stored table
    Upload(commands::upload::UploadArgs),
    /// Print the stored table
    Query(commands::query::QueryArgs),
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version print to stdout and succeed; usage errors are failures
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let result = match cli.command {
        Commands::Upload(args) => commands::upload::execute(args),
        Commands::Query(args) => commands::query::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
