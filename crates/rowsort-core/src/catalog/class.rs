//! Class and join-table definitions.

/// A class definition: which table backs the class, which fields that table
/// physically defines, and where the class sits in its inheritance chain.
///
/// A subclass only lists the fields it redefines; everything else is
/// inherited from (and stored on) an ancestor's table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    /// Class name (unique within the catalog).
    pub name: String,
    /// Physical table backing this class's own fields.
    pub table: String,
    /// Parent class, if any.
    pub extends: Option<String>,
    /// Fields physically defined on this class's table.
    pub fields: Vec<String>,
    /// Whether this class is version-staged (draft/live).
    pub versioned: bool,
}

impl ClassDef {
    /// Create a new class definition backed by the given table.
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            extends: None,
            fields: Vec::new(),
            versioned: false,
        }
    }

    /// Set the parent class.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    /// Add a field defined on this class's own table.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Add multiple fields.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Mark the class as version-staged.
    pub fn with_versioning(mut self) -> Self {
        self.versioned = true;
        self
    }

    /// Check whether this class's own table defines a field.
    pub fn defines(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}

/// An implicit many-to-many join table (no dedicated class).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinTableDef {
    /// Physical join table name.
    pub name: String,
    /// Extra fields defined on the join table beyond the key pair.
    pub fields: Vec<String>,
}

impl JoinTableDef {
    /// Create a new join-table definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field defined on the join table.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Check whether the join table defines a field.
    pub fn defines(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }
}
