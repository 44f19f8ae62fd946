//! Kernel crate: layered settings, the module lifecycle trait, and the registry
//! that drives modules through init, start, and stop.

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Module, Schema};
pub use registry::ModuleRegistry;
