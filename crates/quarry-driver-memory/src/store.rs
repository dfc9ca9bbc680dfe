use indexmap::IndexMap;
use quarry_core::{
    bail,
    driver::{Response, Row},
    stmt::{
        AlterCollection, Collection, Column, Condition, CreateCollection, Delete, Expr, Field, Index,
        IndexType, Insert, InsertSource, Query, Update, Value, Variables,
    },
    Error, Result,
};
use std::{
    cmp::Ordering,
    collections::BTreeMap,
    hash::{Hash, Hasher},
};

/// Every collection, keyed by backend identifier.
#[derive(Debug, Default, Clone)]
pub(crate) struct Store {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone)]
pub(crate) struct Table {
    pub(crate) collection: Collection,
    pub(crate) columns: Vec<Column>,
    pub(crate) indexes: Vec<Index>,

    /// Rows in insertion order. Every row holds a value for each column.
    pub(crate) rows: IndexMap<Key, Row>,

    /// Next value handed out by the auto-increment column.
    next_id: i64,

    /// Next synthetic key, for tables without a primary key.
    next_rowid: i64,
}

/// The primary key values of a row.
///
/// Values that compare equal hash the same, so `I64(1)` and `F64(1.0)` name
/// the same row.
#[derive(Debug, Clone)]
pub(crate) struct Key(pub(crate) Vec<Value>);

impl PartialEq for Key {
    fn eq(&self, other: &Key) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(&other.0)
                .all(|(a, b)| a.sort_cmp(b) == Ordering::Equal)
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for value in &self.0 {
            match value {
                Value::Null => 0u8.hash(state),
                Value::Bool(v) => (1u8, v).hash(state),
                Value::I64(v) => (2u8, normalize(*v as f64)).hash(state),
                Value::F64(v) => (2u8, normalize(*v)).hash(state),
                Value::String(v) => (3u8, v).hash(state),
                Value::Date(v) => (4u8, v).hash(state),
                Value::Bytes(v) => (5u8, v).hash(state),
            }
        }
    }
}

fn normalize(v: f64) -> u64 {
    if v == 0.0 {
        0
    } else {
        v.to_bits()
    }
}

impl Store {
    pub(crate) fn execute(&mut self, query: &Query, variables: Option<&Variables>) -> Result<Response> {
        match query {
            Query::Select(select) => Ok(Response::Rows(self.select(select, variables)?)),
            Query::Aggregate(_) => Err(Error::query_not_supported(
                "aggregate not supported by the memory driver",
            )),
            Query::Union(union) => Ok(Response::Rows(self.union(union, variables)?)),
            Query::Insert(insert) => self.insert(insert, variables),
            Query::Update(update) => self.update(update, variables),
            Query::Delete(delete) => self.delete(delete, variables),
            Query::CreateCollection(create) => self.create(create),
            Query::AlterCollection(alter) => self.alter(alter),
            Query::DropCollection(drop) => {
                self.tables
                    .remove(&drop.collection.ident())
                    .ok_or_else(|| missing(&drop.collection))?;
                tracing::debug!(collection = %drop.collection, "dropped collection");
                Ok(Response::Acknowledged)
            }
            Query::DescribeCollection(describe) => {
                let table = self.table(&describe.collection)?;
                Ok(Response::Description {
                    columns: table.columns.clone(),
                    indexes: table.indexes.clone(),
                })
            }
            Query::CollectionExists(exists) => Ok(Response::Exists(
                self.tables.contains_key(&exists.collection.ident()),
            )),
            Query::ShowCollection(show) => Ok(Response::Collections(
                self.tables
                    .keys()
                    .filter_map(|ident| Collection::from_ident(ident, show.namespace.as_deref()))
                    .collect(),
            )),
        }
    }

    pub(crate) fn table(&self, collection: &Collection) -> Result<&Table> {
        self.tables
            .get(&collection.ident())
            .ok_or_else(|| missing(collection))
    }

    fn table_mut(&mut self, collection: &Collection) -> Result<&mut Table> {
        self.tables
            .get_mut(&collection.ident())
            .ok_or_else(|| missing(collection))
    }

    fn create(&mut self, create: &CreateCollection) -> Result<Response> {
        create.validate()?;

        let ident = create.collection.ident();

        if self.tables.contains_key(&ident) {
            return Err(Error::invalid_schema(format!(
                "collection `{}` already exists",
                create.collection
            )));
        }

        self.tables.insert(
            ident,
            Table::new(
                create.collection.clone(),
                create.columns.clone(),
                create.indexes.clone(),
            ),
        );

        tracing::debug!(collection = %create.collection, "created collection");
        Ok(Response::Acknowledged)
    }

    /// Alters run in place: the new definition is computed, and every row is
    /// carried over to it.
    fn alter(&mut self, alter: &AlterCollection) -> Result<Response> {
        let table = self.table(&alter.collection)?;
        let (columns, indexes) = alter.apply(&table.columns, &table.indexes)?;
        let sources = alter.column_sources(&table.columns);

        let target = alter.target();
        let renamed = target.ident() != alter.collection.ident();

        if renamed && self.tables.contains_key(&target.ident()) {
            return Err(Error::invalid_schema(format!(
                "cannot rename `{}` to `{target}`, which already exists",
                alter.collection
            )));
        }

        let mut altered = Table::new(target.clone(), columns, indexes);
        altered.next_id = table.next_id;

        for row in table.rows.values() {
            let mut new_row = Row::new();

            for column in &altered.columns {
                let value = sources
                    .iter()
                    .find(|source| source.target == column.name)
                    .and_then(|source| row.get(&source.source).cloned())
                    .or_else(|| column.default.clone())
                    .unwrap_or_default();

                new_row.insert(column.name.clone(), value);
            }

            altered.put(new_row, None)?;
        }

        self.tables.remove(&alter.collection.ident());
        self.tables.insert(target.ident(), altered);

        tracing::debug!(collection = %alter.collection, target = %target, "altered collection");
        Ok(Response::Acknowledged)
    }

    fn insert(&mut self, insert: &Insert, variables: Option<&Variables>) -> Result<Response> {
        insert.validate()?;

        let rows: Vec<Vec<Value>> = match &insert.source {
            InsertSource::Values(rows) => rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|expr| expr.to_value(variables))
                        .collect::<Result<Vec<_>>>()
                })
                .collect::<Result<_>>()?,
            InsertSource::Select(select) => self
                .select(select, variables)?
                .into_iter()
                .map(|row| row.into_values().collect())
                .collect(),
        };

        let table = self.table_mut(&insert.collection)?;

        atomically(table, |table| {
            let mut id = Value::Null;

            for values in rows {
                let row = table.new_row(&insert.fields, values)?;
                let key = table.put(row, None)?;

                id = match key.0.as_slice() {
                    [value] => value.clone(),
                    _ => Value::Null,
                };
            }

            Ok(Response::Inserted { id })
        })
    }

    fn update(&mut self, update: &Update, variables: Option<&Variables>) -> Result<Response> {
        let table = self.table_mut(&update.collection)?;

        for name in update.assignments.keys() {
            table.column(name)?;
        }

        let matched = table.matching(update.filter.as_ref(), variables)?;

        atomically(table, |table| {
            for key in &matched {
                let Some(current) = table.rows.get(key).cloned() else {
                    continue;
                };

                let mut row = current.clone();

                for (name, expr) in &update.assignments {
                    let value = match expr {
                        Expr::Field(field) => current.get(&field.name).cloned().unwrap_or_default(),
                        expr => expr.to_value(variables)?,
                    };
                    row.insert(name.clone(), value);
                }

                table.put(row, Some(key))?;
            }

            Ok(())
        })?;

        let data = update
            .assignments
            .iter()
            .filter_map(|(field, expr)| Some((field.clone(), expr.to_value(variables).ok()?)))
            .collect();

        Ok(Response::Updated { data })
    }

    fn delete(&mut self, delete: &Delete, variables: Option<&Variables>) -> Result<Response> {
        let table = self.table_mut(&delete.collection)?;

        for key in table.matching(delete.filter.as_ref(), variables)? {
            table.rows.shift_remove(&key);
        }

        Ok(Response::Acknowledged)
    }
}

impl Table {
    fn new(collection: Collection, columns: Vec<Column>, indexes: Vec<Index>) -> Table {
        Table {
            collection,
            columns,
            indexes,
            rows: IndexMap::new(),
            next_id: 1,
            next_rowid: 1,
        }
    }

    /// Columns whose values key a row. Empty when the table has no primary
    /// key, in which case rows get a synthetic key.
    fn key_columns(&self) -> Vec<&str> {
        match self.indexes.iter().find(|index| index.is_primary()) {
            Some(primary) => primary
                .columns
                .iter()
                .map(|column| column.field.name.as_str())
                .collect(),
            None => self
                .columns
                .iter()
                .filter(|column| column.auto_increment)
                .map(|column| column.name.as_str())
                .collect(),
        }
    }

    /// The single-column primary key, when the table has one.
    pub(crate) fn primary_key(&self) -> Option<&str> {
        match self.key_columns()[..] {
            [name] => Some(name),
            _ => None,
        }
    }

    fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|column| column.name == name)
            .ok_or_else(|| {
                Error::query_syntax(format!(
                    "collection `{}` has no field `{name}`",
                    self.collection
                ))
            })
    }

    /// Keys of the rows `filter` matches, in row order.
    fn matching(
        &self,
        filter: Option<&Condition>,
        variables: Option<&Variables>,
    ) -> Result<Vec<Key>> {
        let mut keys = vec![];

        for (key, row) in &self.rows {
            let matched = match filter {
                Some(filter) => filter.eval(row, variables)?,
                None => true,
            };

            if matched {
                keys.push(key.clone());
            }
        }

        Ok(keys)
    }

    /// Builds a full row from the fields an insert names. Fields left out
    /// take their column default, or null.
    fn new_row(&self, fields: &[Field], values: Vec<Value>) -> Result<Row> {
        if fields.len() != values.len() {
            return Err(Error::query_syntax(format!(
                "insert into `{}` has {} field(s) but a row of {} value(s)",
                self.collection,
                fields.len(),
                values.len()
            )));
        }

        for field in fields {
            self.column(&field.name)?;
        }

        let mut row = Row::new();

        for column in &self.columns {
            let value = fields
                .iter()
                .position(|field| field.name == column.name)
                .and_then(|i| values.get(i).cloned())
                .or_else(|| column.default.clone())
                .unwrap_or_default();

            row.insert(column.name.clone(), value);
        }

        Ok(row)
    }

    /// Stores `row`, replacing the row at `previous` when given. Assigns the
    /// auto-increment value and enforces unique indexes.
    fn put(&mut self, mut row: Row, previous: Option<&Key>) -> Result<Key> {
        let auto_increment = self
            .columns
            .iter()
            .find(|column| column.auto_increment)
            .map(|column| column.name.clone());

        if let Some(name) = auto_increment {
            match row.get(&name) {
                Some(Value::I64(id)) => self.next_id = self.next_id.max(id.saturating_add(1)),
                Some(Value::Null) | None => {
                    row.insert(name, Value::I64(self.next_id));
                    self.next_id += 1;
                }
                Some(other) => bail!(
                    "auto-increment field `{name}` of `{}` must be an integer, got {other:?}",
                    self.collection
                ),
            }
        }

        let key_columns: Vec<String> = self.key_columns().into_iter().map(String::from).collect();

        let key = if key_columns.is_empty() {
            match previous {
                Some(previous) => previous.clone(),
                None => {
                    self.next_rowid += 1;
                    Key(vec![Value::I64(self.next_rowid - 1)])
                }
            }
        } else {
            let values: Vec<Value> = key_columns
                .iter()
                .map(|name| row.get(name).cloned().unwrap_or_default())
                .collect();

            if values.iter().any(Value::is_null) {
                bail!("primary key of `{}` cannot be null", self.collection);
            }

            Key(values)
        };

        if previous != Some(&key) && self.rows.contains_key(&key) {
            bail!(
                "duplicate primary key {:?} in `{}`",
                key.0,
                self.collection
            );
        }

        for index in self.indexes.iter().filter(|index| index.ty == IndexType::Unique) {
            let values: Vec<&Value> = index
                .columns
                .iter()
                .map(|column| row.get(&column.field.name).unwrap_or(&Value::Null))
                .collect();

            // Nulls never collide
            if values.iter().any(|value| value.is_null()) {
                continue;
            }

            let clash = self.rows.iter().any(|(key, other)| {
                Some(key) != previous
                    && index.columns.iter().zip(&values).all(|(column, value)| {
                        other
                            .get(&column.field.name)
                            .is_some_and(|other| other.compare(value) == Some(Ordering::Equal))
                    })
            });

            if clash {
                bail!(
                    "unique index `{}` on `{}` already holds {values:?}",
                    index.name,
                    self.collection
                );
            }
        }

        match previous {
            Some(previous) if *previous != key => {
                self.rows.shift_remove(previous);
                self.rows.insert(key.clone(), row);
            }
            _ => {
                self.rows.insert(key.clone(), row);
            }
        }

        Ok(key)
    }
}

/// Runs `f` against `table`, restoring the table if it fails.
fn atomically<T>(table: &mut Table, f: impl FnOnce(&mut Table) -> Result<T>) -> Result<T> {
    let snapshot = table.clone();
    let result = f(table);

    if result.is_err() {
        *table = snapshot;
    }

    result
}

fn missing(collection: &Collection) -> Error {
    Error::invalid_schema(format!("collection `{collection}` does not exist"))
}
