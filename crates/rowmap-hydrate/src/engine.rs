//! Row hydration.
//!
//! The shape of the mapping picks the path:
//! - flat: one record per row, built from the labeled columns
//! - nested without collections: one record per row, nested groups read
//!   recursively from the same row
//! - with collections: identity-map reconstruction across all rows, each
//!   object hydrated once and every one-to-many child appended once per
//!   parent

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rowmap_core::{ConversionError, CursorError, IdentityPolicy, Record, Value};
use rowmap_mapping::{Binding, EntityMapping, MappingError};

use crate::cursor::RowCursor;
use crate::error::HydrateError;
use crate::identity::IdentityKey;

/// Per-call hydration settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HydrateOptions {
    pub identity_policy: IdentityPolicy,
}

impl HydrateOptions {
    #[must_use]
    pub const fn new(identity_policy: IdentityPolicy) -> Self {
        Self { identity_policy }
    }
}

/// Hydrate every row with default options.
///
/// # Errors
///
/// See [`hydrate_all_with`].
pub fn hydrate_all<C: RowCursor + ?Sized>(
    cursor: &mut C,
    mapping: &EntityMapping,
) -> Result<Vec<Record>, HydrateError> {
    hydrate_all_with(cursor, mapping, HydrateOptions::default())
}

/// Hydrate the first object with default options.
///
/// # Errors
///
/// See [`hydrate_one_with`].
pub fn hydrate_one<C: RowCursor + ?Sized>(
    cursor: &mut C,
    mapping: &EntityMapping,
) -> Result<Option<Record>, HydrateError> {
    hydrate_one_with(cursor, mapping, HydrateOptions::default())
}

/// Hydrate every object the cursor yields.
///
/// Without collections this is one record per row. With collections the
/// result holds one record per distinct root identity, in order of first
/// appearance.
///
/// # Errors
///
/// Returns `HydrateError::Mapping` when a mapping with collections has no
/// identity columns of its own (before any row is read), otherwise the first
/// cursor, conversion or identity error.
pub fn hydrate_all_with<C: RowCursor + ?Sized>(
    cursor: &mut C,
    mapping: &EntityMapping,
    options: HydrateOptions,
) -> Result<Vec<Record>, HydrateError> {
    if mapping.has_collections() {
        return Graph::new(mapping, options)?.run(cursor);
    }

    let mut out = Vec::new();
    while cursor.next_row()? {
        out.push(read_row(&*cursor, mapping, options)?);
    }
    tracing::debug!(entity = mapping.name(), rows = out.len(), "hydrated rows");
    Ok(out)
}

/// Hydrate the first object.
///
/// Without collections only the first row is read. With collections every
/// row is consumed, since later rows may add children to the first root.
///
/// # Errors
///
/// See [`hydrate_all_with`].
pub fn hydrate_one_with<C: RowCursor + ?Sized>(
    cursor: &mut C,
    mapping: &EntityMapping,
    options: HydrateOptions,
) -> Result<Option<Record>, HydrateError> {
    if mapping.has_collections() {
        return Ok(Graph::new(mapping, options)?.run(cursor)?.into_iter().next());
    }
    if !cursor.next_row()? {
        return Ok(None);
    }
    read_row(&*cursor, mapping, options).map(Some)
}

/// First column of the first row, or `None` when there are no rows.
///
/// # Errors
///
/// Returns a cursor error, e.g. `IndexOutOfRange` for a result without
/// columns.
pub fn hydrate_scalar<C: RowCursor + ?Sized>(cursor: &mut C) -> Result<Option<Value>, HydrateError> {
    if !cursor.next_row()? {
        return Ok(None);
    }
    Ok(Some(cursor.value_at(0)?))
}

fn read_row<C: RowCursor + ?Sized>(
    cursor: &C,
    mapping: &EntityMapping,
    options: HydrateOptions,
) -> Result<Record, HydrateError> {
    if mapping.is_flat() {
        read_flat(cursor, mapping)
    } else {
        read_object(cursor, mapping, options.identity_policy)
    }
}

/// Walk the result's columns and fill the bindings they match. Columns no
/// binding reads are ignored; properties no column feeds stay null.
fn read_flat<C: RowCursor + ?Sized>(cursor: &C, mapping: &EntityMapping) -> Result<Record, HydrateError> {
    let mut values = vec![Value::Null; mapping.bindings().len()];
    for (i, label) in cursor.column_labels().iter().enumerate() {
        if let Some((index, binding)) = mapping.simple_by_column(label) {
            values[index] = binding.converter.from_storage(cursor.value_at(i)?)?;
        }
    }

    let mut record = Record::with_capacity(mapping.shared_name(), values.len());
    for (binding, value) in mapping.bindings().iter().zip(values) {
        record.push(binding.property(), value);
    }
    Ok(record)
}

/// Read one object of `mapping` from the current row. Fields follow binding
/// order; collections start empty.
fn read_object<C: RowCursor + ?Sized>(
    cursor: &C,
    mapping: &EntityMapping,
    policy: IdentityPolicy,
) -> Result<Record, HydrateError> {
    let mut record = Record::with_capacity(mapping.shared_name(), mapping.bindings().len());
    for binding in mapping.bindings() {
        match binding {
            Binding::Simple(simple) => {
                let raw = read_column(cursor, &simple.column)?;
                let value = simple.converter.from_storage(raw)?;
                record.push(Arc::clone(&simple.property), value);
            }
            Binding::Nested(nested) => {
                let absent = nested.nullable_if_identity_null
                    && IdentityKey::extract(
                        cursor,
                        nested.mapping.name(),
                        nested.mapping.identity_columns(),
                        policy,
                    )?
                    .is_none();
                let value = if absent {
                    Value::Null
                } else {
                    Value::Object(read_object(cursor, &nested.mapping, policy)?)
                };
                record.push(Arc::clone(&nested.property), value);
            }
            Binding::Collection(collection) => {
                record.push(Arc::clone(&collection.property), collection.kind.empty());
            }
        }
    }
    Ok(record)
}

/// A data column missing from the result reads as null. Identity columns
/// are read through [`IdentityKey::extract`], where a missing column is an
/// error.
fn read_column<C: RowCursor + ?Sized>(cursor: &C, column: &str) -> Result<Value, CursorError> {
    match cursor.value(column) {
        Err(CursorError::UnknownColumn(_)) => {
            tracing::trace!(column, "column not in result, reading null");
            Ok(Value::Null)
        }
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Identity-map reconstruction
// ---------------------------------------------------------------------------

/// One distinct object seen during a call.
struct Node<'m> {
    mapping: &'m EntityMapping,
    /// Hydrated at first sighting, collections empty.
    record: Record,
    /// Parallel to `mapping.collection_bindings()`.
    slots: Vec<Slot>,
}

#[derive(Default)]
struct Slot {
    appended: HashSet<usize>,
    children: Vec<usize>,
}

enum Built {
    Pending,
    InProgress,
    Done(Record),
}

struct Graph<'m> {
    root: &'m EntityMapping,
    policy: IdentityPolicy,
    nodes: Vec<Node<'m>>,
    /// Keyed by mapping instance: two mappings sharing an entity name may
    /// differ in shape, so they never share nodes.
    index: HashMap<(*const EntityMapping, IdentityKey), usize>,
    roots: Vec<usize>,
    root_seen: HashSet<usize>,
}

impl<'m> Graph<'m> {
    fn new(root: &'m EntityMapping, options: HydrateOptions) -> Result<Self, MappingError> {
        if root.identity_columns().is_empty() {
            return Err(MappingError::MissingIdentity {
                entity: root.name().to_string(),
                usage: "the root of a hydration with collections".to_string(),
            });
        }
        Ok(Self {
            root,
            policy: options.identity_policy,
            nodes: Vec::new(),
            index: HashMap::new(),
            roots: Vec::new(),
            root_seen: HashSet::new(),
        })
    }

    fn run<C: RowCursor + ?Sized>(mut self, cursor: &mut C) -> Result<Vec<Record>, HydrateError> {
        let root = self.root;
        let mut rows = 0usize;
        while cursor.next_row()? {
            rows += 1;
            if let Some(node) = self.extract(&*cursor, root)? {
                if self.root_seen.insert(node) {
                    self.roots.push(node);
                }
            }
        }

        let mut built: Vec<Built> = self.nodes.iter().map(|_| Built::Pending).collect();
        let out = self
            .roots
            .iter()
            .map(|&node| self.materialize(node, &mut built))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            entity = self.root.name(),
            rows,
            roots = out.len(),
            objects = self.nodes.len(),
            "hydrated object graph"
        );
        Ok(out)
    }

    /// Register the object of `mapping` on the current row (if any) and
    /// recurse into every collection reachable from it.
    fn extract<C: RowCursor + ?Sized>(
        &mut self,
        cursor: &C,
        mapping: &'m EntityMapping,
    ) -> Result<Option<usize>, HydrateError> {
        let Some(key) =
            IdentityKey::extract(cursor, mapping.name(), mapping.identity_columns(), self.policy)?
        else {
            return Ok(None);
        };

        let lookup = (std::ptr::from_ref(mapping), key);
        let node = if let Some(&node) = self.index.get(&lookup) {
            node
        } else {
            let record = read_object(cursor, mapping, self.policy)?;
            let node = self.nodes.len();
            tracing::trace!(entity = mapping.name(), node, "new object");
            self.nodes.push(Node {
                mapping,
                record,
                slots: mapping
                    .collection_bindings()
                    .iter()
                    .map(|_| Slot::default())
                    .collect(),
            });
            self.index.insert(lookup, node);
            node
        };

        for (slot, collection) in mapping.collection_bindings().iter().enumerate() {
            if let Some(child) = self.extract(cursor, &collection.binding.element)? {
                let Some(state) = self.nodes[node].slots.get_mut(slot) else {
                    continue;
                };
                if state.appended.insert(child) {
                    state.children.push(child);
                }
            }
        }
        Ok(Some(node))
    }

    /// Assemble the final record of `node`, children first.
    fn materialize(&self, node: usize, built: &mut [Built]) -> Result<Record, HydrateError> {
        match &built[node] {
            Built::Done(record) => return Ok(record.clone()),
            Built::InProgress => {
                tracing::warn!(
                    entity = self.nodes[node].mapping.name(),
                    "object reached through itself, its collections are left empty"
                );
                return Ok(self.nodes[node].record.clone());
            }
            Built::Pending => {}
        }
        built[node] = Built::InProgress;

        let current = &self.nodes[node];
        let mut record = current.record.clone();
        for (slot, state) in current.mapping.collection_bindings().iter().zip(&current.slots) {
            let binding = &slot.binding;
            for &child in &state.children {
                let element = Value::Object(self.materialize(child, built)?);
                let member = binding.element_converter.from_storage(element)?;
                if member.is_null() {
                    return Err(ConversionError::NullElement {
                        property: binding.property.to_string(),
                    }
                    .into());
                }
                if !place(&mut record, &slot.path, member) {
                    tracing::warn!(
                        entity = current.mapping.name(),
                        collection = %binding.property,
                        "owner of collection is null, dropping element"
                    );
                }
            }
        }

        built[node] = Built::Done(record.clone());
        Ok(record)
    }
}

/// Add `member` to the collection at `path`. Returns `false` when a nested
/// record along the path is null.
fn place(record: &mut Record, path: &[usize], member: Value) -> bool {
    let Some((&last, parents)) = path.split_last() else {
        return false;
    };
    let mut target = record;
    for &index in parents {
        let Some(Value::Object(inner)) = target.value_at_mut(index) else {
            return false;
        };
        target = inner;
    }
    let Some(collection) = target.value_at_mut(last) else {
        return false;
    };
    collection.push_member(member);
    true
}
