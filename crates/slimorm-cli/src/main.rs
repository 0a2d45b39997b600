//! slimorm CLI
//!
//! Inspect and edit rows of any table through slimorm record types

use clap::{Parser, Subcommand};
use slimorm_core::logging_facility::Profile;
use std::path::PathBuf;

mod commands;
mod context;

#[derive(Debug, Parser)]
#[command(name = "slimorm")]
#[command(about = "slimorm - minimal record mapping over SQLite and MySQL", long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, conflicts_with = "config")]
    db: Option<PathBuf>,

    /// YAML connection config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Logging profile (dev, prod, test); logs go to stderr
    #[arg(long, global = true)]
    log: Option<Profile>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Count matching rows
    Count(commands::count::CountArgs),
    /// List matching rows as JSON lines
    List(commands::list::ListArgs),
    /// Run raw SQL and print result rows as JSON lines
    Raw(commands::raw::RawArgs),
    /// Delete one row by primary key
    Delete(commands::delete::DeleteArgs),
    /// Update columns of one row by primary key
    Set(commands::set::SetArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = context::Context::open(cli.db, cli.config, cli.log).and_then(|ctx| {
        match cli.command {
            Commands::Count(args) => commands::count::execute(&ctx, args),
            Commands::List(args) => commands::list::execute(&ctx, args),
            Commands::Raw(args) => commands::raw::execute(&ctx, args),
            Commands::Delete(args) => commands::delete::execute(&ctx, args),
            Commands::Set(args) => commands::set::execute(&ctx, args),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
