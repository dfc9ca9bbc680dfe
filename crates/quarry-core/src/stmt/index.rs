use super::FieldDirection;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum IndexType {
    Primary,
    Unique,
    Index,
}

/// An index definition. Collections have at most one primary index.
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    pub name: String,
    pub ty: IndexType,

    /// Indexed fields in key order. Never empty.
    pub columns: Vec<FieldDirection>,
}

impl IndexType {
    pub fn is_primary(self) -> bool {
        matches!(self, Self::Primary)
    }

    pub fn is_unique(self) -> bool {
        matches!(self, Self::Primary | Self::Unique)
    }
}

impl Index {
    pub fn new<T: Into<FieldDirection>>(
        name: impl Into<String>,
        ty: IndexType,
        columns: impl IntoIterator<Item = T>,
    ) -> Result<Index> {
        let name = name.into();
        let columns: Vec<FieldDirection> = columns.into_iter().map(Into::into).collect();

        if columns.is_empty() {
            return Err(Error::invalid_schema(format!(
                "index `{name}` has no columns"
            )));
        }

        Ok(Index { name, ty, columns })
    }

    pub fn primary<T: Into<FieldDirection>>(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = T>,
    ) -> Result<Index> {
        Index::new(name, IndexType::Primary, columns)
    }

    pub fn unique<T: Into<FieldDirection>>(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = T>,
    ) -> Result<Index> {
        Index::new(name, IndexType::Unique, columns)
    }

    pub fn index<T: Into<FieldDirection>>(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = T>,
    ) -> Result<Index> {
        Index::new(name, IndexType::Index, columns)
    }

    pub fn is_primary(&self) -> bool {
        self.ty.is_primary()
    }

    /// True when the index covers the column `name`.
    pub fn references(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column.field.name == name)
    }
}
