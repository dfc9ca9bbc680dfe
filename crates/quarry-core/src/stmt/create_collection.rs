use super::{Collection, Column, Index};
use crate::{Error, Result};

/// Creates a collection with its columns and indexes.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateCollection {
    pub collection: Collection,
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
}

impl CreateCollection {
    pub fn new(collection: impl Into<Collection>) -> CreateCollection {
        CreateCollection {
            collection: collection.into(),
            columns: vec![],
            indexes: vec![],
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn primary_index(&self) -> Option<&Index> {
        self.indexes.iter().find(|index| index.is_primary())
    }

    pub fn secondary_indexes(&self) -> impl Iterator<Item = &Index> {
        self.indexes.iter().filter(|index| !index.is_primary())
    }

    pub fn auto_increment_column(&self) -> Option<&Column> {
        self.columns.iter().find(|column| column.auto_increment)
    }

    /// Checks the definition can be realized by a backend.
    pub fn validate(&self) -> Result<()> {
        validate_definition(&self.collection, &self.columns, &self.indexes)
    }
}

/// Checks a collection definition:
///
/// * at least one column, with no name used twice
/// * at most one primary index
/// * every index references existing columns
/// * at most one auto-increment column, which must be the sole column of the
///   primary index when there is one. Without a primary index, the
///   auto-increment column is the primary key.
pub(crate) fn validate_definition(
    collection: &Collection,
    columns: &[Column],
    indexes: &[Index],
) -> Result<()> {
    if columns.is_empty() {
        return Err(Error::invalid_schema(format!(
            "collection `{collection}` has no columns"
        )));
    }

    for (i, column) in columns.iter().enumerate() {
        if columns[..i].iter().any(|other| other.name == column.name) {
            return Err(Error::invalid_schema(format!(
                "collection `{collection}` declares column `{}` twice",
                column.name
            )));
        }
    }

    let primary: Vec<_> = indexes.iter().filter(|index| index.is_primary()).collect();

    if primary.len() > 1 {
        return Err(Error::invalid_schema(format!(
            "collection `{collection}` declares more than one primary index"
        )));
    }

    for index in indexes {
        for field in &index.columns {
            if !columns.iter().any(|column| column.name == field.field.name) {
                return Err(Error::invalid_schema(format!(
                    "index `{}` on `{collection}` references unknown column `{}`",
                    index.name, field.field.name
                )));
            }
        }
    }

    let auto_increment: Vec<_> = columns.iter().filter(|c| c.auto_increment).collect();

    match (&auto_increment[..], primary.first()) {
        ([], _) | ([_], None) => {}
        ([column], Some(primary)) => {
            if primary.columns.len() != 1 || primary.columns[0].field.name != column.name {
                return Err(Error::invalid_schema(format!(
                    "auto-increment column `{}` on `{collection}` must be the sole primary key column",
                    column.name
                )));
            }
        }
        _ => {
            return Err(Error::invalid_schema(format!(
                "collection `{collection}` declares more than one auto-increment column"
            )));
        }
    }

    Ok(())
}
