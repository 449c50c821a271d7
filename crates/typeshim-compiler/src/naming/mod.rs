//! Module Namer.
//!
//! Maps origin paths to host identifiers: `Outer.Inner.innerT` becomes
//! `Outer_Inner_innerT`, reserved words get a `$$` prefix, collisions are
//! qualified by module name and then numbered.

mod namer;
mod reserved;

#[cfg(test)]
mod naming_tests;

pub use namer::{
    HostBinding, ModuleNames, NameTable, TypeImport, assign_names, component_display_name,
};
pub use reserved::{ESCAPE_PREFIX, escape_type, escape_value, is_reserved_type, is_reserved_value};
