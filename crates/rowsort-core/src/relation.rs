//! Relation descriptors: the storage shape backing an editable list.

/// A normalized view of the relationship a record list is backed by.
///
/// Produced by the hosting framework's schema layer and dispatched
/// exhaustively by the resolver; no runtime type inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationDescriptor {
    /// One row per related record; the order column lives on that row.
    Direct {
        /// Class of the related records.
        related_class: String,
    },

    /// Implicit many-to-many via a join table. The order column lives on
    /// the join table or on the related record, depending on configuration.
    JoinTable {
        /// Physical join table name.
        join_table: String,
        /// Join column referencing the owning side.
        parent_key: String,
        /// Join column referencing the related side.
        child_key: String,
        /// Class of the related records.
        related_class: String,
    },

    /// Explicit many-to-many via an intermediary class; the order column
    /// lives on the intermediary's row.
    ThroughJoin {
        /// Class of the intermediary records.
        intermediary_class: String,
        /// Intermediary field referencing the owning side.
        parent_key: String,
        /// Intermediary field referencing the related side.
        child_key: String,
    },

    /// Reverse side of a many-to-many; resolved like [`Direct`] against
    /// the owning side's class.
    ///
    /// [`Direct`]: RelationDescriptor::Direct
    Belongs {
        /// Class whose table holds the order value.
        related_class: String,
    },
}

impl RelationDescriptor {
    /// Create a direct (one-to-many) descriptor.
    pub fn direct(related_class: impl Into<String>) -> Self {
        Self::Direct {
            related_class: related_class.into(),
        }
    }

    /// Create an implicit many-to-many descriptor.
    pub fn join_table(
        join_table: impl Into<String>,
        parent_key: impl Into<String>,
        child_key: impl Into<String>,
        related_class: impl Into<String>,
    ) -> Self {
        Self::JoinTable {
            join_table: join_table.into(),
            parent_key: parent_key.into(),
            child_key: child_key.into(),
            related_class: related_class.into(),
        }
    }

    /// Create a many-to-many-through descriptor.
    pub fn through(
        intermediary_class: impl Into<String>,
        parent_key: impl Into<String>,
        child_key: impl Into<String>,
    ) -> Self {
        Self::ThroughJoin {
            intermediary_class: intermediary_class.into(),
            parent_key: parent_key.into(),
            child_key: child_key.into(),
        }
    }

    /// Create a reverse-side descriptor.
    pub fn belongs(related_class: impl Into<String>) -> Self {
        Self::Belongs {
            related_class: related_class.into(),
        }
    }
}
