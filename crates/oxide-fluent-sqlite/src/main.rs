//! oxide-fluent CLI
//!
//! Inspects a SQLite schema and runs the existence checks migrations use.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

use oxide_fluent_core::prelude::*;
use oxide_fluent_sqlite::SqliteIntrospector;

/// Schema inspection for fluent migrations.
#[derive(Parser)]
#[command(name = "oxide-fluent")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (SQLite path or connection string).
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3")]
    database: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List user tables.
    Tables,

    /// List foreign key column pairs.
    ForeignKeys {
        /// Only keys declared on this table.
        #[arg(short, long)]
        table: Option<String>,
    },

    /// Check whether a foreign key exists. Exits with 1 when it does not.
    CheckForeignKey {
        /// Foreign key name.
        #[arg(short, long)]
        name: Option<String>,

        /// Referencing table.
        #[arg(long = "from")]
        from_table: Option<String>,

        /// Referencing column (repeatable).
        #[arg(long = "from-column")]
        from_columns: Vec<String>,

        /// Referenced table.
        #[arg(long = "to")]
        to_table: Option<String>,

        /// Referenced column (repeatable).
        #[arg(long = "to-column")]
        to_columns: Vec<String>,

        /// Require a single key to hold every column.
        #[arg(long)]
        per_key: bool,
    },

    /// Check whether a table exists.
    CheckTable {
        /// Table name.
        name: String,
    },

    /// Check whether a column exists.
    CheckColumn {
        /// Column name.
        name: String,

        /// Table holding the column.
        #[arg(short, long)]
        table: Option<String>,
    },

    /// Check whether an index exists.
    CheckIndex {
        /// Index name.
        name: String,

        /// Table holding the index.
        #[arg(short, long)]
        table: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

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

    let introspector = SqliteIntrospector::connect(&cli.database).await?;

    match cli.command {
        Commands::Tables => {
            let tables = introspector.tables().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&tables)?);
            } else {
                for table in tables {
                    println!("{table}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::ForeignKeys { table } => {
            let foreign_keys = match table {
                Some(table) => introspector.table_foreign_keys(&table).await?,
                None => introspector.foreign_keys().await?,
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&foreign_keys)?);
            } else {
                for fk in foreign_keys {
                    println!(
                        "{}: {}.{} -> {}.{}",
                        fk.name,
                        fk.foreign_table,
                        fk.foreign_column,
                        fk.primary_table,
                        fk.primary_column
                    );
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::CheckForeignKey {
            name,
            from_table,
            from_columns,
            to_table,
            to_columns,
            per_key,
        } => {
            let expression =
                foreign_key_expression(name, from_table, from_columns, to_table, to_columns);
            let mode = if per_key {
                ForeignKeyMatch::PerKey
            } else {
                ForeignKeyMatch::Pooled
            };
            debug!(?expression, ?mode, "Checking foreign key");

            let snapshot = introspector.snapshot().await?;
            Ok(report(expression.exists_in(&snapshot, mode)?, cli.json))
        }

        Commands::CheckTable { name } => {
            let context = context(&introspector).await?;
            Ok(report(context.check()?.table(name).exists()?, cli.json))
        }

        Commands::CheckColumn { name, table } => {
            let context = context(&introspector).await?;
            let mut check = context.check()?.column(name);
            if let Some(table) = table {
                check = check.on_table(table);
            }
            Ok(report(check.exists()?, cli.json))
        }

        Commands::CheckIndex { name, table } => {
            let context = context(&introspector).await?;
            let mut check = context.check()?.index(name);
            if let Some(table) = table {
                check = check.on_table(table);
            }
            Ok(report(check.exists()?, cli.json))
        }
    }
}

async fn context(introspector: &SqliteIntrospector) -> anyhow::Result<MigrationContext> {
    let snapshot = introspector.snapshot().await?;
    Ok(MigrationContext::new(DatabaseProvider::Sqlite).with_introspector(snapshot))
}

fn foreign_key_expression(
    name: Option<String>,
    from_table: Option<String>,
    from_columns: Vec<String>,
    to_table: Option<String>,
    to_columns: Vec<String>,
) -> CheckForeignKeyExpression {
    let mut expression = CheckForeignKeyExpression::new()
        .with_foreign_columns(from_columns)
        .with_primary_columns(to_columns);
    if let Some(name) = name {
        expression = expression.with_name(name);
    }
    if let Some(table) = from_table {
        expression = expression.with_foreign_table(table);
    }
    if let Some(table) = to_table {
        expression = expression.with_primary_table(table);
    }
    expression
}

fn report(exists: bool, json: bool) -> ExitCode {
    if json {
        println!("{}", serde_json::json!({ "exists": exists }));
    } else {
        println!("{}", if exists { "exists" } else { "missing" });
    }
    if exists {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
