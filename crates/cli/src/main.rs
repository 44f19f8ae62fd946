use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_db::Database;
use shelf_kernel::settings::Settings;

/// Bookshelf administration
#[derive(Debug, Parser)]
#[command(name = "shelf", version, about)]
struct Cli {
    /// Directory holding `base.toml` and `<env>.toml`
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Environment overlay to load (local, staging, production)
    #[arg(long = "env", global = true)]
    environment: Option<String>,

    /// Override the SQLite database path
    #[arg(long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Create the books table if it does not exist
    InitDb,
    /// Print the effective configuration as JSON
    Config,
}

impl Cli {
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match (&self.config_dir, &self.environment) {
            (None, None) => Settings::load()?,
            (dir, env) => {
                let dir = match dir {
                    Some(dir) => dir.clone(),
                    None => std::env::current_dir()
                        .context("unable to resolve current directory")?
                        .join("config"),
                };
                Settings::load_from(&dir, env.as_deref().unwrap_or("local"))?
            }
        };

        if let Some(path) = &self.database {
            settings.database.path = path.clone();
        }
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli
        .settings()
        .with_context(|| "failed to load shelf settings")?;

    match cli.command {
        Command::Serve => {
            shelf_telemetry::init(&settings.telemetry)?;
            shelf_app::run(&settings).await
        }
        Command::InitDb => {
            shelf_telemetry::init(&settings.telemetry)?;
            let db = Database::new(&settings.database);
            let registry = shelf_app::build_registry(&db)?;
            shelf_app::init_database(&registry, &db).await?;
            tracing::info!(db = %settings.database.path, "database ready");
            Ok(())
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}
