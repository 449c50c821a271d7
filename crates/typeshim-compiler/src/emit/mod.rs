//! Declaration and shim emission.
//!
//! - `decl`: host declaration tree of a module
//! - `render`: declaration tree to `.gen.d.ts` text, optionally colored
//! - `shim`: conversion plans to the `.gen.js` module
//! - `config`: emission configuration and the document's config section

mod config;
pub mod decl;
mod render;
mod shim;

#[cfg(test)]
mod decl_tests;

pub use config::{Config, ConfigSection, ModuleFormat};
pub use decl::{DeclItem, DeclTree, HostCase, HostField, HostType, build_decl_tree};
pub use render::render_declarations;
pub use shim::render_shim;
