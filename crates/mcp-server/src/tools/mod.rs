//! Perfecto MCP tool surface.
//!
//! Schemas, dispatch and the per-tool domain helpers live in separate submodules.

pub(crate) mod catalog;
mod dispatch;
mod schemas;
pub(crate) mod scriptless;
pub(crate) mod skills_store;

pub use dispatch::PerfectoService;
