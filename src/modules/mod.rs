pub mod books;

use shelf_db::Database;
use shelf_kernel::ModuleRegistry;

/// Register every application module with the registry
pub fn register_all(registry: &mut ModuleRegistry, db: &Database) -> anyhow::Result<()> {
    registry.register(books::create_module(db.clone()))?;
    Ok(())
}
