use super::{
    CollectionSchema, Compatibility, FieldSchema, IndexFieldSchema, IndexSchema, RenameHints,
    Schema,
};
use crate::stmt::ColumnType;

use std::collections::{HashMap, HashSet};

/// One change needed to move a backend from a source schema to a target
/// schema. Collection handles refer to the target schema, except in
/// `RenameCollection::from` and `DropCollection`.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaDiff {
    AddCollection(CollectionSchema),
    RenameCollection {
        from: String,
        to: String,
    },
    DropCollection(CollectionSchema),
    AddField {
        collection: String,
        field: FieldSchema,
    },
    AlterField {
        collection: String,
        from: FieldSchema,
        to: FieldSchema,
    },
    DropField {
        collection: String,
        field: FieldSchema,
    },
    AddIndex {
        collection: String,
        index: IndexSchema,
    },
    AlterIndex {
        collection: String,
        from: IndexSchema,
        to: IndexSchema,
    },
    DropIndex {
        collection: String,
        index: IndexSchema,
    },
}

impl SchemaDiff {
    /// The target handle of the collection this diff applies to.
    pub fn collection(&self) -> &str {
        match self {
            Self::AddCollection(collection) | Self::DropCollection(collection) => {
                &collection.handle
            }
            Self::RenameCollection { to, .. } => to,
            Self::AddField { collection, .. }
            | Self::AlterField { collection, .. }
            | Self::DropField { collection, .. }
            | Self::AddIndex { collection, .. }
            | Self::AlterIndex { collection, .. }
            | Self::DropIndex { collection, .. } => collection,
        }
    }
}

/// Computes the changes that turn `source` into `target`.
///
/// `compare` decides when a field's type change requires an alter; see
/// [`Connection::compare_types`](crate::driver::Connection::compare_types).
pub fn diff<F>(source: &Schema, target: &Schema, compare: F) -> Vec<SchemaDiff>
where
    F: Fn(ColumnType, Option<u32>, ColumnType, Option<u32>) -> Compatibility,
{
    diff_with_hints(source, target, compare, &RenameHints::default())
}

/// Like [`diff`], treating the collections and fields named in `hints` as
/// renamed rather than dropped and added.
///
/// The output is ordered so it can be applied front to back: collection
/// renames, new collections, then per collection added fields, altered
/// fields, added indexes, altered indexes, dropped indexes and dropped
/// fields, and finally dropped collections.
pub fn diff_with_hints<F>(
    source: &Schema,
    target: &Schema,
    compare: F,
    hints: &RenameHints,
) -> Vec<SchemaDiff>
where
    F: Fn(ColumnType, Option<u32>, ColumnType, Option<u32>) -> Compatibility,
{
    let mut out = Buckets::default();
    let mut matched = HashSet::new();

    let source_map = HashMap::<&str, &CollectionSchema>::from_iter(
        source.collections.iter().map(|c| (c.handle.as_str(), c)),
    );

    for to in &target.collections {
        let renamed = hints
            .collection_renamed_from(&to.handle)
            .and_then(|old| source_map.get(old));

        let from = match renamed {
            Some(from) => {
                out.renames.push(SchemaDiff::RenameCollection {
                    from: from.handle.clone(),
                    to: to.handle.clone(),
                });
                from
            }
            None => match source_map.get(to.handle.as_str()) {
                Some(from) => from,
                None => {
                    out.add_collections.push(SchemaDiff::AddCollection(to.clone()));
                    continue;
                }
            },
        };

        matched.insert(from.handle.as_str());
        diff_fields(from, to, &compare, hints, &mut out);
        diff_indexes(from, to, hints, &mut out);
    }

    for from in &source.collections {
        if !matched.contains(from.handle.as_str()) {
            out.drop_collections.push(SchemaDiff::DropCollection(from.clone()));
        }
    }

    out.finish()
}

/// Pairs collections that appear only in `source` with collections that
/// appear only in `target` when renaming one into the other produces no
/// other difference.
pub fn detect_collection_renames<F>(source: &Schema, target: &Schema, compare: F) -> RenameHints
where
    F: Fn(ColumnType, Option<u32>, ColumnType, Option<u32>) -> Compatibility,
{
    let mut hints = RenameHints::new();
    let mut claimed = HashSet::new();

    let removed: Vec<_> = source
        .collections
        .iter()
        .filter(|c| target.collection(&c.handle).is_none())
        .collect();

    for to in &target.collections {
        if source.collection(&to.handle).is_some() {
            continue;
        }

        for from in &removed {
            if claimed.contains(from.handle.as_str()) {
                continue;
            }

            let candidate = Schema {
                namespace: source.namespace.clone(),
                collections: vec![CollectionSchema {
                    handle: to.handle.clone(),
                    ..(*from).clone()
                }],
            };
            let expected = Schema {
                namespace: target.namespace.clone(),
                collections: vec![to.clone()],
            };

            if diff(&candidate, &expected, &compare).is_empty() {
                tracing::debug!(from = %from.handle, to = %to.handle, "detected collection rename");
                hints.add_collection_hint(&from.handle, &to.handle);
                claimed.insert(from.handle.as_str());
                break;
            }
        }
    }

    hints
}

#[derive(Default)]
struct Buckets {
    renames: Vec<SchemaDiff>,
    add_collections: Vec<SchemaDiff>,
    add_fields: Vec<SchemaDiff>,
    alter_fields: Vec<SchemaDiff>,
    add_indexes: Vec<SchemaDiff>,
    alter_indexes: Vec<SchemaDiff>,
    drop_indexes: Vec<SchemaDiff>,
    drop_fields: Vec<SchemaDiff>,
    drop_collections: Vec<SchemaDiff>,
}

impl Buckets {
    fn finish(self) -> Vec<SchemaDiff> {
        [
            self.renames,
            self.add_collections,
            self.add_fields,
            self.alter_fields,
            self.add_indexes,
            self.alter_indexes,
            self.drop_indexes,
            self.drop_fields,
            self.drop_collections,
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn diff_fields<F>(
    from: &CollectionSchema,
    to: &CollectionSchema,
    compare: &F,
    hints: &RenameHints,
    out: &mut Buckets,
) where
    F: Fn(ColumnType, Option<u32>, ColumnType, Option<u32>) -> Compatibility,
{
    let mut matched = HashSet::new();

    for field in &to.fields {
        let previous = hints
            .field_renamed_from(&to.handle, &field.handle)
            .and_then(|old| from.field_by_handle(old))
            .or_else(|| from.field_by_handle(&field.handle));

        let Some(previous) = previous else {
            out.add_fields.push(SchemaDiff::AddField {
                collection: to.handle.clone(),
                field: field.clone(),
            });
            continue;
        };

        matched.insert(previous.handle.as_str());

        let changed = previous.handle != field.handle
            || previous.auto_increment != field.auto_increment
            || compare(previous.ty, previous.size, field.ty, field.size).is_different();

        if changed {
            out.alter_fields.push(SchemaDiff::AlterField {
                collection: to.handle.clone(),
                from: previous.clone(),
                to: field.clone(),
            });
        }
    }

    for field in &from.fields {
        if !matched.contains(field.handle.as_str()) {
            out.drop_fields.push(SchemaDiff::DropField {
                collection: to.handle.clone(),
                field: field.clone(),
            });
        }
    }
}

/// Primary indexes are matched with each other regardless of handle, and
/// compared on field names only since not every backend records a
/// direction for primary key columns. Other indexes are matched by handle.
fn diff_indexes(
    from: &CollectionSchema,
    to: &CollectionSchema,
    hints: &RenameHints,
    out: &mut Buckets,
) {
    let mut matched = HashSet::new();

    // Source field handles, translated to their names in the target
    let renamed = |field: &IndexFieldSchema| -> String {
        to.fields
            .iter()
            .find(|f| {
                hints.field_renamed_from(&to.handle, &f.handle) == Some(field.field.as_str())
            })
            .map(|f| f.handle.clone())
            .unwrap_or_else(|| field.field.clone())
    };

    for index in &to.indexes {
        let previous = if index.ty.is_primary() {
            from.primary_index()
        } else {
            from.indexes
                .iter()
                .find(|i| !i.ty.is_primary() && i.handle == index.handle)
        };

        let Some(previous) = previous else {
            if is_implied_primary(to, index) {
                continue;
            }

            out.add_indexes.push(SchemaDiff::AddIndex {
                collection: to.handle.clone(),
                index: index.clone(),
            });
            continue;
        };

        matched.insert(previous.handle.as_str());

        let changed = if index.ty.is_primary() {
            !previous
                .fields
                .iter()
                .map(|f| renamed(f))
                .eq(index.fields.iter().map(|f| f.field.clone()))
        } else {
            previous.ty != index.ty
                || !previous
                    .fields
                    .iter()
                    .map(|f| (renamed(f), f.direction))
                    .eq(index.fields.iter().map(|f| (f.field.clone(), f.direction)))
        };

        if changed {
            out.alter_indexes.push(SchemaDiff::AlterIndex {
                collection: to.handle.clone(),
                from: previous.clone(),
                to: index.clone(),
            });
        }
    }

    for index in &from.indexes {
        if matched.contains(index.handle.as_str()) {
            continue;
        }

        if to.primary_index().is_none() && is_implied_primary(from, index) {
            continue;
        }

        out.drop_indexes.push(SchemaDiff::DropIndex {
            collection: to.handle.clone(),
            index: index.clone(),
        });
    }
}

/// An auto-increment field is the primary key of its collection whether or
/// not a primary index names it, so such an index is never added or dropped
/// on its own.
fn is_implied_primary(collection: &CollectionSchema, index: &IndexSchema) -> bool {
    index.ty.is_primary()
        && matches!(&index.fields[..], [field] if collection
            .field_by_handle(&field.field)
            .is_some_and(|f| f.auto_increment))
}
