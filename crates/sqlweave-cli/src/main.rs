//! sqlweave CLI
//!
//! Compiles UPDATE statements described in JSON files for any supported
//! dialect, and runs them against SQLite.

mod config;
mod statement;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use sqlx::sqlite::SqlitePoolOptions;
use sqlweave_core::{BoundArgument, DialectContext, DialectKind, H2Mode, UpdateStatement};
use sqlweave_sqlite::SqliteExecutor;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::resolve_context;
use crate::statement::StatementFile;

/// Dialect-aware UPDATE statement compiler.
#[derive(Parser)]
#[command(name = "sqlweave")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL; also selects the dialect (e.g. `jdbc:h2:mem:db;MODE=Oracle`).
    #[arg(short, long, env = "DATABASE_URL")]
    database: Option<String>,

    /// JSON file with a dialect context, e.g. `{"dialect": "h2", "h2_mode": "oracle"}`.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dialect, overriding the config file and the URL.
    #[arg(long)]
    dialect: Option<DialectKind>,

    /// H2 compatibility mode, overriding the config file and the URL.
    #[arg(long)]
    h2_mode: Option<H2Mode>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the compiled SQL and its arguments as JSON.
    Compile {
        /// Statement file.
        file: PathBuf,

        /// Print the SQL with values inlined instead.
        #[arg(long)]
        inline: bool,
    },

    /// Execute the statement against a SQLite database.
    Execute {
        /// Statement file.
        file: PathBuf,
    },
}

#[derive(Serialize)]
struct CompiledOutput<'a> {
    dialect: &'a DialectContext,
    sql: &'a str,
    arguments: &'a [Vec<BoundArgument>],
}

fn load_statement(path: &Path) -> anyhow::Result<UpdateStatement> {
    let text = std::fs::read_to_string(path)?;
    Ok(StatementFile::from_json(&text)?.to_statement()?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let ctx = resolve_context(
        cli.config.as_deref(),
        cli.database.as_deref(),
        cli.dialect,
        cli.h2_mode,
    )?;
    info!(dialect = %ctx, "resolved dialect");

    match cli.command {
        Commands::Compile { file, inline } => {
            let statement = load_statement(&file)?;
            if inline {
                println!("{}", statement.to_sql_inline(&ctx)?);
            } else {
                let prepared = statement.prepare(&ctx)?;
                let output = CompiledOutput {
                    dialect: prepared.dialect(),
                    sql: prepared.sql(),
                    arguments: prepared.arguments(),
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        }

        Commands::Execute { file } => {
            if ctx.dialect != DialectKind::Sqlite {
                anyhow::bail!("execution is only supported for SQLite, not {ctx}");
            }
            let Some(url) = cli.database.as_deref() else {
                anyhow::bail!("--database is required to execute a statement");
            };
            let statement = load_statement(&file)?;

            let pool = SqlitePoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await?;
            let executor = SqliteExecutor::new(pool);

            let affected = statement.execute(&executor, &ctx).await?;
            info!("{affected} row(s) updated.");
        }
    }

    Ok(())
}
