//! Guestbook command-line front end.
//!
//! # Responsibility
//! - Map flags and environment onto core store and service calls.
//! - Keep output plain and line-oriented for quick local checks.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use guestbook_core::db::open_db;
use guestbook_core::{
    core_version, default_log_level, init_logging, ping, Entry, EntryId, EntryListQuery,
    GuestbookService, SqliteEntryRepository,
};
use log::info;
use std::path::PathBuf;

/// Sign and browse a local guestbook
#[derive(Parser)]
#[command(name = "guestbook")]
#[command(version = core_version(), about, long_about = None)]
struct Cli {
    /// Path to the guestbook database
    #[arg(long, global = true, env = "GUESTBOOK_DB", default_value = "guestbook.db")]
    db: PathBuf,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true, env = "GUESTBOOK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = "GUESTBOOK_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a signature to the guestbook
    Sign {
        #[arg(long)]
        name: String,

        #[arg(long)]
        text: String,

        /// Birth date as dd.mm.yyyy or dd-mm-yyyy
        #[arg(long)]
        birth: String,
    },

    /// List signatures
    List {
        #[arg(long)]
        newest_first: bool,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long, default_value_t = 0)]
        offset: u32,
    },

    /// Show one signature
    Show {
        #[arg(value_name = "ID")]
        id: i64,
    },

    /// Delete one signature
    Remove {
        #[arg(value_name = "ID")]
        id: i64,
    },

    /// Check core linkage and database access
    Ping,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open guestbook at {}", cli.db.display()))?;
    let service = GuestbookService::new(SqliteEntryRepository::try_new(&conn)?);
    info!("event=cli_command module=cli status=start");

    match cli.command {
        Commands::Sign { name, text, birth } => {
            let entry = service.sign(&name, &text, &birth)?;
            println!("{}", format_entry(&entry));
        }
        Commands::List {
            newest_first,
            limit,
            offset,
        } => {
            let query = EntryListQuery {
                newest_first,
                limit,
                offset,
            };
            for entry in service.entries(&query)? {
                println!("{}", format_entry(&entry));
            }
        }
        Commands::Show { id } => match service.entry(EntryId::new(id))? {
            Some(entry) => println!("{}", format_entry(&entry)),
            None => bail!("no guestbook entry with id {id}"),
        },
        Commands::Remove { id } => {
            service.remove(EntryId::new(id))?;
            println!("removed #{id}");
        }
        Commands::Ping => {
            println!("guestbook_core ping={}", ping());
            println!("guestbook_core version={}", core_version());
            println!("guestbook entries={}", service.count()?);
        }
    }

    Ok(())
}

fn format_entry(entry: &Entry) -> String {
    let id = entry
        .id()
        .map_or_else(|| "-".to_string(), |id| id.to_string());
    format!(
        "#{id}  {}  {} (born {}): {}",
        entry.submitted_at().format("%Y-%m-%d %H:%M:%S"),
        entry.name(),
        entry.birth(),
        entry.text()
    )
}
