//! Schema catalog: per-class field ownership, accounting for inheritance.

use super::class::{ClassDef, JoinTableDef};
use std::collections::HashMap;

/// Precomputed schema metadata consulted during sort-location resolution.
///
/// Built once from static schema metadata; immutable afterwards, so it may
/// be shared read-only across calls.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    /// Class definitions keyed by name.
    classes: HashMap<String, ClassDef>,
    /// Implicit join tables keyed by name.
    join_tables: HashMap<String, JoinTableDef>,
}

impl SchemaCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class.
    pub fn with_class(mut self, class: ClassDef) -> Self {
        self.classes.insert(class.name.clone(), class);
        self
    }

    /// Register an implicit join table.
    pub fn with_join_table(mut self, join: JoinTableDef) -> Self {
        self.join_tables.insert(join.name.clone(), join);
        self
    }

    /// Get a class definition by name.
    pub fn get_class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(name)
    }

    /// Get a join-table definition by name.
    pub fn get_join_table(&self, name: &str) -> Option<&JoinTableDef> {
        self.join_tables.get(name)
    }

    /// Walk a class's ancestry, starting at the class itself.
    ///
    /// Stops at the root or at the first unknown/repeated parent name
    /// (a repeated name would mean a cyclic `extends` chain).
    pub fn ancestry<'a>(&'a self, class: &str) -> Vec<&'a ClassDef> {
        let mut chain = Vec::new();
        let mut seen: Vec<&str> = Vec::new();
        let mut current = self.classes.get(class);

        while let Some(def) = current {
            if seen.contains(&def.name.as_str()) {
                break;
            }
            seen.push(&def.name);
            chain.push(def);
            current = def.extends.as_deref().and_then(|p| self.classes.get(p));
        }

        chain
    }

    /// Find the first ancestor (including the class itself) whose own table
    /// physically defines the given field.
    pub fn field_owner<'a>(&'a self, class: &str, field: &str) -> Option<&'a ClassDef> {
        self.ancestry(class).into_iter().find(|c| c.defines(field))
    }

    /// Whether a class participates in versioned staging anywhere in its
    /// ancestry.
    pub fn stage_aware(&self, class: &str) -> bool {
        self.ancestry(class).iter().any(|c| c.versioned)
    }
}
