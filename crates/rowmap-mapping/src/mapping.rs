//! Resolved entity mappings.
//!
//! An [`EntityMapping`] is immutable once built. The derived views the
//! hydration engine needs are computed eagerly in [`EntityMapping::new`]:
//! - identity columns (own identity columns plus those of embedded groups)
//! - whether the mapping is flat (simple bindings only)
//! - every collection reachable through nested bindings, with the field path
//!   leading to it
//! - a column → binding index for the flat path

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::binding::{Binding, CollectionBinding, NestedBinding, SimpleBinding};
use crate::error::MappingError;

/// A collection binding reachable from a mapping.
///
/// `path` holds binding indices from the root record down to the collection
/// field: every element but the last selects a nested binding, the last one
/// selects the collection binding inside the innermost nested mapping.
#[derive(Debug, Clone)]
pub struct CollectionSlot {
    pub path: Vec<usize>,
    pub binding: CollectionBinding,
}

#[derive(Debug)]
pub struct EntityMapping {
    name: Arc<str>,
    bindings: Vec<Binding>,
    identity_columns: Vec<Arc<str>>,
    collections: Vec<CollectionSlot>,
    column_index: HashMap<String, usize>,
    flat: bool,
}

impl EntityMapping {
    /// Validate `bindings` and compute the derived views.
    ///
    /// # Errors
    ///
    /// Returns a `MappingError` for duplicate properties, duplicate columns,
    /// duplicate identity columns, or a collection element / optional to-one
    /// target without identity columns.
    pub fn new(name: impl Into<Arc<str>>, bindings: Vec<Binding>) -> Result<Self, MappingError> {
        let name: Arc<str> = name.into();

        check_properties(&name, &bindings)?;
        let identity_columns = collect_identity(&name, &bindings)?;
        check_columns(&name, &bindings)?;
        check_relations(&name, &bindings)?;

        let collections = collect_collections(&bindings);
        let flat = bindings.iter().all(|b| matches!(b, Binding::Simple(_)));
        let column_index = bindings
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.as_simple().map(|s| (s.column.to_ascii_uppercase(), i)))
            .collect();

        tracing::debug!(
            entity = %name,
            bindings = bindings.len(),
            identity = identity_columns.len(),
            collections = collections.len(),
            flat,
            "built entity mapping"
        );

        Ok(Self {
            name,
            bindings,
            identity_columns,
            collections,
            column_index,
            flat,
        })
    }

    /// Entity name. Also identifies the entity type inside one hydration call.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    #[must_use]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    #[must_use]
    pub fn identity_columns(&self) -> &[Arc<str>] {
        &self.identity_columns
    }

    #[must_use]
    pub const fn is_flat(&self) -> bool {
        self.flat
    }

    /// Every collection binding reachable through this mapping and its
    /// nested bindings.
    #[must_use]
    pub fn collection_bindings(&self) -> &[CollectionSlot] {
        &self.collections
    }

    #[must_use]
    pub fn has_collections(&self) -> bool {
        !self.collections.is_empty()
    }

    /// Own simple binding reading `column` (ASCII case-insensitive).
    #[must_use]
    pub fn simple_by_column(&self, column: &str) -> Option<(usize, &SimpleBinding)> {
        let index = *self.column_index.get(&column.to_ascii_uppercase())?;
        self.bindings[index].as_simple().map(|b| (index, b))
    }
}

fn check_properties(entity: &str, bindings: &[Binding]) -> Result<(), MappingError> {
    let mut seen = HashSet::new();
    for binding in bindings {
        if !seen.insert(binding.property()) {
            return Err(MappingError::DuplicateProperty {
                entity: entity.to_string(),
                property: binding.property().to_string(),
            });
        }
    }
    Ok(())
}

/// Own identity columns, then those of embedded (non-optional) nested groups.
/// Optional to-one relations and collections keep their identity to themselves.
fn collect_identity(entity: &str, bindings: &[Binding]) -> Result<Vec<Arc<str>>, MappingError> {
    let mut columns: Vec<Arc<str>> = Vec::new();
    for binding in bindings {
        match binding {
            Binding::Simple(SimpleBinding {
                column,
                identity: true,
                ..
            }) => columns.push(Arc::clone(column)),
            Binding::Nested(NestedBinding {
                mapping,
                nullable_if_identity_null: false,
                ..
            }) => columns.extend(mapping.identity_columns().iter().cloned()),
            _ => {}
        }
    }

    let mut seen = HashSet::new();
    for column in &columns {
        if !seen.insert(column.to_ascii_uppercase()) {
            return Err(MappingError::DuplicateIdentity {
                entity: entity.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(columns)
}

/// Simple columns must be unique across the row shape this mapping reads,
/// nested groups included.
fn check_columns(entity: &str, bindings: &[Binding]) -> Result<(), MappingError> {
    fn walk(
        entity: &str,
        bindings: &[Binding],
        seen: &mut HashSet<String>,
    ) -> Result<(), MappingError> {
        for binding in bindings {
            match binding {
                Binding::Simple(simple) => {
                    if !seen.insert(simple.column.to_ascii_uppercase()) {
                        return Err(MappingError::DuplicateColumn {
                            entity: entity.to_string(),
                            column: simple.column.to_string(),
                        });
                    }
                }
                Binding::Nested(nested) => walk(entity, nested.mapping.bindings(), seen)?,
                Binding::Collection(_) => {}
            }
        }
        Ok(())
    }

    walk(entity, bindings, &mut HashSet::new())
}

fn check_relations(entity: &str, bindings: &[Binding]) -> Result<(), MappingError> {
    for binding in bindings {
        match binding {
            Binding::Collection(collection) if collection.element.identity_columns().is_empty() => {
                return Err(MappingError::MissingIdentity {
                    entity: collection.element.name().to_string(),
                    usage: format!("the element of {entity}.{}", collection.property),
                });
            }
            Binding::Nested(nested)
                if nested.nullable_if_identity_null
                    && nested.mapping.identity_columns().is_empty() =>
            {
                return Err(MappingError::MissingIdentity {
                    entity: nested.mapping.name().to_string(),
                    usage: format!("the optional to-one {entity}.{}", nested.property),
                });
            }
            _ => {}
        }
    }
    Ok(())
}

fn collect_collections(bindings: &[Binding]) -> Vec<CollectionSlot> {
    let mut slots = Vec::new();
    for (index, binding) in bindings.iter().enumerate() {
        match binding {
            Binding::Collection(collection) => slots.push(CollectionSlot {
                path: vec![index],
                binding: collection.clone(),
            }),
            Binding::Nested(nested) => {
                for inner in nested.mapping.collection_bindings() {
                    let mut path = Vec::with_capacity(inner.path.len() + 1);
                    path.push(index);
                    path.extend_from_slice(&inner.path);
                    slots.push(CollectionSlot {
                        path,
                        binding: inner.binding.clone(),
                    });
                }
            }
            Binding::Simple(_) => {}
        }
    }
    slots
}
