//! Schema catalog: class definitions, inheritance, and field ownership.

mod catalog;
mod class;

pub use catalog::SchemaCatalog;
pub use class::{ClassDef, JoinTableDef};
