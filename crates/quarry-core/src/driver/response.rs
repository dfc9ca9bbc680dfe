use crate::{
    err,
    stmt::{Collection, Column, Index, Value},
    Result,
};
use indexmap::IndexMap;

/// A result row, keyed by output field name.
pub type Row = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Rows produced by a select, aggregate or union.
    Rows(Vec<Row>),

    /// The key of the last row inserted.
    Inserted { id: Value },

    /// The values assigned by an update.
    Updated { data: Row },

    /// The statement ran and produced nothing.
    Acknowledged,

    /// The definition of a collection.
    Description {
        columns: Vec<Column>,
        indexes: Vec<Index>,
    },

    Exists(bool),

    Collections(Vec<Collection>),
}

impl Response {
    pub fn is_acknowledged(&self) -> bool {
        matches!(self, Self::Acknowledged)
    }

    pub fn into_rows(self) -> Result<Vec<Row>> {
        match self {
            Self::Rows(rows) => Ok(rows),
            other => Err(err!("expected rows, got {other:?}")),
        }
    }

    pub fn into_inserted_id(self) -> Result<Value> {
        match self {
            Self::Inserted { id } => Ok(id),
            other => Err(err!("expected an inserted id, got {other:?}")),
        }
    }

    pub fn into_description(self) -> Result<(Vec<Column>, Vec<Index>)> {
        match self {
            Self::Description { columns, indexes } => Ok((columns, indexes)),
            other => Err(err!("expected a collection description, got {other:?}")),
        }
    }

    pub fn into_exists(self) -> Result<bool> {
        match self {
            Self::Exists(exists) => Ok(exists),
            other => Err(err!("expected an existence check, got {other:?}")),
        }
    }

    pub fn into_collections(self) -> Result<Vec<Collection>> {
        match self {
            Self::Collections(collections) => Ok(collections),
            other => Err(err!("expected a collection list, got {other:?}")),
        }
    }
}
