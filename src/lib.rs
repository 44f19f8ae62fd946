//! Bookshelf application: module wiring and the bootstrap sequence shared by
//! the `shelf-app` binary and the `shelf` CLI.

pub mod modules;

pub use modules::books;

use anyhow::Context;
use shelf_db::Database;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Registry with every application module registered against `db`
pub fn build_registry(db: &Database) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, db)?;
    Ok(registry)
}

/// Apply every module's schema bootstrap statements
pub async fn init_database(registry: &ModuleRegistry, db: &Database) -> anyhow::Result<()> {
    let schema = registry.collect_schema();
    let db = db.clone();
    tokio::task::spawn_blocking(move || db.ensure_schema(&schema))
        .await
        .context("schema task failed")?
}

/// Initialize modules, bootstrap the schema, serve until shutdown, then stop modules
pub async fn run(settings: &Settings) -> anyhow::Result<()> {
    let db = Database::new(&settings.database);
    let registry = build_registry(&db)?;
    let ctx = InitCtx { settings };

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.path,
        "shelf-app bootstrap starting"
    );

    registry.init_all(&ctx).await?;
    init_database(&registry, &db)
        .await
        .with_context(|| format!("failed to prepare database '{}'", settings.database.path))?;
    registry.start_all(&ctx).await?;

    tracing::info!(modules = registry.len(), "shelf-app bootstrap complete");

    let served = shelf_http::start_server(&registry, settings).await;
    registry.stop_all().await?;
    served
}
