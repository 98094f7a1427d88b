//! Sort-location resolution.
//!
//! Given a relation descriptor, a configured sort field name, and the schema
//! catalog, determine the physical table and column that hold the order
//! value, and how rows in that table are addressed.

use crate::catalog::SchemaCatalog;
use crate::error::Error;
use crate::relation::RelationDescriptor;

/// Default sort field name when none is configured.
pub const DEFAULT_SORT_FIELD: &str = "Sort";

/// How rows of the resolved table are located during a reorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keying {
    /// Rows keyed by their own record id.
    ById,
    /// Join-table rows keyed by the (parent, child) membership pair.
    ByPair,
    /// Intermediary rows located by matching their parent/child reference
    /// fields, then updated under their own id.
    ByIntermediary {
        /// Intermediary field referencing the owning side.
        parent_key: String,
        /// Intermediary field referencing the related side.
        child_key: String,
    },
}

/// The resolved physical write target for a reorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortTarget {
    /// Physical table holding the order value.
    pub table: String,
    /// Column holding the order value.
    pub column: String,
    /// Whether writes must be scoped to a version stage.
    pub stage_aware: bool,
    /// How rows of the table are addressed.
    pub keying: Keying,
}

/// Resolve the physical write target for a relation's sort values.
///
/// Pure: no side effects, inputs are not mutated. Fails with
/// [`Error::Configuration`] when no table in the resolved hierarchy defines
/// the sort field; falling back to an arbitrary table would corrupt
/// ordering without any visible symptom.
pub fn resolve(
    descriptor: &RelationDescriptor,
    sort_field: &str,
    catalog: &SchemaCatalog,
) -> Result<SortTarget, Error> {
    match descriptor {
        RelationDescriptor::Direct { related_class }
        | RelationDescriptor::Belongs { related_class } => {
            let owner = owning_class(catalog, related_class, sort_field)?;
            Ok(SortTarget {
                table: owner,
                column: sort_field.to_string(),
                stage_aware: catalog.stage_aware(related_class),
                keying: Keying::ById,
            })
        }

        RelationDescriptor::JoinTable {
            join_table,
            related_class,
            ..
        } => {
            // Order as a property of the record itself wins over order as a
            // property of the membership.
            if let Some(owner) = catalog.field_owner(related_class, sort_field) {
                return Ok(SortTarget {
                    table: owner.table.clone(),
                    column: sort_field.to_string(),
                    stage_aware: catalog.stage_aware(related_class),
                    keying: Keying::ById,
                });
            }

            let join = catalog.get_join_table(join_table).ok_or_else(|| {
                Error::Configuration(format!("unknown join table '{join_table}'"))
            })?;
            if !join.defines(sort_field) {
                return Err(Error::Configuration(format!(
                    "sort field '{sort_field}' is defined neither on class \
                     '{related_class}' nor on join table '{join_table}'"
                )));
            }

            Ok(SortTarget {
                table: join.name.clone(),
                column: sort_field.to_string(),
                // Join tables have no versioned representation
                stage_aware: false,
                keying: Keying::ByPair,
            })
        }

        RelationDescriptor::ThroughJoin {
            intermediary_class,
            parent_key,
            child_key,
        } => {
            let owner = owning_class(catalog, intermediary_class, sort_field)?;
            Ok(SortTarget {
                table: owner,
                column: sort_field.to_string(),
                stage_aware: catalog.stage_aware(intermediary_class),
                keying: Keying::ByIntermediary {
                    parent_key: parent_key.clone(),
                    child_key: child_key.clone(),
                },
            })
        }
    }
}

/// Ancestry lookup: the first ancestor table that physically defines the
/// sort field.
fn owning_class(
    catalog: &SchemaCatalog,
    class: &str,
    sort_field: &str,
) -> Result<String, Error> {
    if catalog.get_class(class).is_none() {
        return Err(Error::Configuration(format!("unknown class '{class}'")));
    }

    catalog
        .field_owner(class, sort_field)
        .map(|owner| owner.table.clone())
        .ok_or_else(|| {
            Error::Configuration(format!(
                "sort field '{sort_field}' is not defined anywhere in the \
                 hierarchy of '{class}'"
            ))
        })
}
