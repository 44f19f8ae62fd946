use async_trait::async_trait;
use axum::Router;

/// Context provided to modules during initialization
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
}

/// Idempotent schema bootstrap statement contributed by a module.
///
/// Statements are plain SQL and must be safe to run on every startup
/// (`CREATE TABLE IF NOT EXISTS ...`). There is no version tracking.
#[derive(Debug, Clone)]
pub struct Schema {
    pub id: &'static str,
    pub ddl: &'static str,
}

/// Lifecycle trait implemented by every application module
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module
    fn name(&self) -> &'static str;

    /// Called during application startup before the schema is applied
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Router merged into the application router at the root.
    /// Modules own their full paths.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI fragment (`paths` and `components.schemas`) for this module
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Schema statements, executed in the order returned
    fn schema(&self) -> Vec<Schema> {
        vec![]
    }

    /// Called after the schema is applied, before the server accepts requests
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called during application shutdown
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
