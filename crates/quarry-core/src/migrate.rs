//! Turns a list of [`SchemaDiff`]s into the queries that apply them.
//!
//! Diffs are grouped by collection. New collections are created first, then
//! existing collections are altered, then removed collections are dropped.
//! When the backend cannot make a change in place (see
//! [`SchemaMutations`](crate::driver::SchemaMutations)), the collection is
//! rebuilt: a temporary collection with the new definition is created, the
//! surviving data is copied over, the original is dropped and the temporary
//! collection takes its name. Secondary indexes are re-created last.

use crate::{
    driver::{Capability, Connection},
    schema::{Schema, SchemaDiff},
    stmt::{
        AlterCollection, Change, Collection, Column, CreateCollection, DropCollection, Field,
        Index, Insert, InsertSource, Query, Select,
    },
    Error, Result,
};

use indexmap::IndexMap;
use std::collections::HashMap;

/// Prefix of the temporary collections created during a rebuild.
pub const TEMP_PREFIX: &str = "_quarry_tmp";

#[derive(Debug, Default)]
pub struct Migrator {
    /// Numbers temporary collections so that rebuilds never collide.
    next_temp: u64,
}

impl Migrator {
    pub fn new() -> Migrator {
        Migrator::default()
    }

    /// Returns the queries that apply `diffs` to a backend whose current
    /// schema is `source`.
    pub fn plan(
        &mut self,
        capability: &Capability,
        source: &Schema,
        diffs: &[SchemaDiff],
    ) -> Result<Vec<Query>> {
        let mut creates: Vec<Query> = vec![];
        let mut drops: Vec<Query> = vec![];
        let mut alters = Alters::new(source, diffs);

        for diff in diffs {
            match diff {
                SchemaDiff::AddCollection(collection) => {
                    creates.push(
                        collection
                            .to_create(source.collection_ref(&collection.handle))
                            .into(),
                    );
                }
                SchemaDiff::DropCollection(collection) => {
                    let collection = source.collection_ref(&collection.handle);
                    drops.push(DropCollection::new(collection).into());
                }
                SchemaDiff::RenameCollection { to, .. } => {
                    alters.get(to).rename = Some(source.collection_ref(to));
                }
                SchemaDiff::AddField { collection, field } => {
                    alters
                        .get(collection)
                        .changes
                        .push(Change::AddColumn(field.to_column()));
                }
                SchemaDiff::AlterField {
                    collection,
                    from,
                    to,
                } => {
                    alters.get(collection).changes.push(Change::AlterColumn {
                        name: from.handle.clone(),
                        column: to.to_column(),
                    });
                }
                SchemaDiff::DropField { collection, field } => {
                    alters
                        .get(collection)
                        .changes
                        .push(Change::DropColumn(field.handle.clone()));
                }
                SchemaDiff::AddIndex { collection, index } => {
                    alters
                        .get(collection)
                        .changes
                        .push(Change::AddIndex(index.to_index()));
                }
                SchemaDiff::AlterIndex {
                    collection,
                    from,
                    to,
                } => {
                    let changes = &mut alters.get(collection).changes;
                    changes.push(Change::DropIndex(from.handle.clone()));
                    changes.push(Change::AddIndex(to.to_index()));
                }
                SchemaDiff::DropIndex { collection, index } => {
                    alters
                        .get(collection)
                        .changes
                        .push(Change::DropIndex(index.handle.clone()));
                }
            }
        }

        let mut queries = creates;

        for (handle, alter) in alters.entries {
            if alter.is_empty() {
                continue;
            }

            let definition = source.collection(&handle).ok_or_else(|| {
                Error::invalid_schema(format!(
                    "diff alters collection `{handle}` which the source schema does not have"
                ))
            })?;

            let columns = definition.columns();
            let indexes = definition.to_indexes();

            if needs_rebuild(capability, &alter, &columns, &indexes) {
                queries.extend(self.rebuild(&alter, &columns, &indexes)?);
            } else {
                // Validates the change set against the current definition
                alter.apply(&columns, &indexes)?;
                queries.push(alter.into());
            }
        }

        queries.extend(drops);

        Ok(queries)
    }

    /// Applies `diffs` to the backend behind `connection` in a single
    /// transaction. Nothing is applied if any query fails.
    pub async fn migrate(
        &mut self,
        connection: &mut dyn Connection,
        source: &Schema,
        diffs: &[SchemaDiff],
    ) -> Result<()> {
        let queries = self.plan(connection.capability(), source, diffs)?;

        if queries.is_empty() {
            tracing::debug!("schema is up to date; nothing to migrate");
            return Ok(());
        }

        tracing::info!(
            diffs = diffs.len(),
            queries = queries.len(),
            "applying schema migration"
        );

        let mut transaction = connection.transaction().await?;

        for query in &queries {
            if let Err(err) = transaction.execute(query, None).await {
                tracing::warn!(error = %err, "migration failed; rolling back");
                if let Err(rollback) = transaction.rollback().await {
                    tracing::error!(error = %rollback, "failed to roll back migration");
                }
                return Err(err);
            }
        }

        transaction.commit().await?;
        tracing::info!("schema migration committed");

        Ok(())
    }

    fn rebuild(
        &mut self,
        alter: &AlterCollection,
        columns: &[Column],
        indexes: &[Index],
    ) -> Result<Vec<Query>> {
        let (new_columns, new_indexes) = alter.apply(columns, indexes)?;
        let sources = alter.column_sources(columns);
        let target = alter.target().clone();
        let temp = self.temp_collection(&target);

        tracing::debug!(
            collection = %alter.collection,
            temp = %temp,
            "collection cannot be altered in place; rebuilding"
        );

        let (primary, secondary): (Vec<_>, Vec<_>) =
            new_indexes.into_iter().partition(Index::is_primary);

        let mut queries: Vec<Query> = vec![CreateCollection {
            collection: temp.clone(),
            columns: new_columns,
            indexes: primary,
        }
        .into()];

        if !sources.is_empty() {
            let select = Select::new()
                .from(alter.collection.clone())
                .fields(sources.iter().map(|source| Field::new(&source.source)));

            queries.push(
                Insert {
                    collection: temp.clone(),
                    fields: sources
                        .iter()
                        .map(|source| Field::new(&source.target))
                        .collect(),
                    source: InsertSource::Select(Box::new(select)),
                }
                .into(),
            );
        }

        queries.push(DropCollection::new(alter.collection.clone()).into());
        queries.push(AlterCollection::new(temp).rename(target.clone()).into());

        if !secondary.is_empty() {
            let add = secondary
                .into_iter()
                .fold(AlterCollection::new(target), AlterCollection::add_index);
            queries.push(add.into());
        }

        Ok(queries)
    }

    fn temp_collection(&mut self, target: &Collection) -> Collection {
        self.next_temp += 1;
        target.with_name(format!("{TEMP_PREFIX}{}_{}", self.next_temp, target.name))
    }
}

/// Per-collection alters, keyed by the collection's handle in the source
/// schema.
struct Alters<'a> {
    source: &'a Schema,

    /// New collection handle to old handle.
    renamed_from: HashMap<&'a str, &'a str>,

    entries: IndexMap<String, AlterCollection>,
}

impl<'a> Alters<'a> {
    fn new(source: &'a Schema, diffs: &'a [SchemaDiff]) -> Alters<'a> {
        let renamed_from = diffs
            .iter()
            .filter_map(|diff| match diff {
                SchemaDiff::RenameCollection { from, to } => Some((to.as_str(), from.as_str())),
                _ => None,
            })
            .collect();

        Alters {
            source,
            renamed_from,
            entries: IndexMap::new(),
        }
    }

    /// The alter for the collection whose target handle is `target`.
    fn get(&mut self, target: &str) -> &mut AlterCollection {
        let from = self.renamed_from.get(target).copied().unwrap_or(target);
        let source = self.source;

        self.entries
            .entry(from.to_string())
            .or_insert_with(|| AlterCollection::new(source.collection_ref(from)))
    }
}

/// True when some change cannot be made in place by a backend with
/// `capability`.
fn needs_rebuild(
    capability: &Capability,
    alter: &AlterCollection,
    columns: &[Column],
    indexes: &[Index],
) -> bool {
    let mutations = &capability.schema_mutations;

    // SQL backends keep index names across a table rename, and index names
    // embed the collection identifier.
    if capability.sql && alter.rename.is_some() && indexes.iter().any(|i| !i.is_primary()) {
        return true;
    }

    alter.changes.iter().any(|change| match change {
        Change::AddColumn(column) => !mutations.add_column || column.auto_increment,
        Change::AlterColumn { name, column } => {
            let rename_only = columns
                .iter()
                .find(|c| c.name == *name)
                .is_some_and(|c| c.is_rename_of(column));

            match rename_only {
                true => !mutations.rename_column,
                false => !mutations.alter_column,
            }
        }
        Change::DropColumn(_) => !mutations.drop_column,
        Change::AddIndex(index) => index.is_primary() && !mutations.alter_primary_key,
        Change::DropIndex(name) => {
            !mutations.alter_primary_key
                && indexes.iter().any(|index| index.name == *name && index.is_primary())
        }
    })
}
