use super::{create_collection::validate_definition, Collection, Column, Index};
use crate::{Error, Result};

/// Changes the definition of an existing collection.
///
/// The rename, when present, is applied before the column and index
/// changes, which then address the collection by its new name.
#[derive(Debug, Clone, PartialEq)]
pub struct AlterCollection {
    pub collection: Collection,
    pub changes: Vec<Change>,
    pub rename: Option<Collection>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    AddColumn(Column),

    /// Replaces the column `name` with `column`, which may carry a new name.
    AlterColumn { name: String, column: Column },

    DropColumn(String),
    AddIndex(Index),
    DropIndex(String),
}

/// Where a column of an altered collection takes its data from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSource {
    /// Column name after the alter.
    pub target: String,

    /// Column name before the alter.
    pub source: String,
}

impl AlterCollection {
    pub fn new(collection: impl Into<Collection>) -> AlterCollection {
        AlterCollection {
            collection: collection.into(),
            changes: vec![],
            rename: None,
        }
    }

    pub fn add_column(mut self, column: Column) -> Self {
        self.changes.push(Change::AddColumn(column));
        self
    }

    pub fn alter_column(mut self, name: impl Into<String>, column: Column) -> Self {
        self.changes.push(Change::AlterColumn {
            name: name.into(),
            column,
        });
        self
    }

    pub fn drop_column(mut self, name: impl Into<String>) -> Self {
        self.changes.push(Change::DropColumn(name.into()));
        self
    }

    pub fn add_index(mut self, index: Index) -> Self {
        self.changes.push(Change::AddIndex(index));
        self
    }

    pub fn drop_index(mut self, name: impl Into<String>) -> Self {
        self.changes.push(Change::DropIndex(name.into()));
        self
    }

    pub fn rename(mut self, to: impl Into<Collection>) -> Self {
        self.rename = Some(to.into());
        self
    }

    /// The collection's name once the alter has run.
    pub fn target(&self) -> &Collection {
        self.rename.as_ref().unwrap_or(&self.collection)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.rename.is_none()
    }

    /// Computes the collection definition that results from applying the
    /// changes to `columns` and `indexes`.
    ///
    /// Fails when a change names a column or index that does not exist, or
    /// when a column is dropped while an index that is kept still covers it.
    pub fn apply(&self, columns: &[Column], indexes: &[Index]) -> Result<(Vec<Column>, Vec<Index>)> {
        let mut columns = columns.to_vec();
        let mut indexes = indexes.to_vec();

        for change in &self.changes {
            match change {
                Change::AddColumn(column) => {
                    if columns.iter().any(|c| c.name == column.name) {
                        return Err(Error::invalid_schema(format!(
                            "column `{}` already exists on `{}`",
                            column.name, self.collection
                        )));
                    }
                    columns.push(column.clone());
                }
                Change::AlterColumn { name, column } => {
                    let pos = self.position(&columns, name)?;
                    columns[pos] = column.clone();

                    if *name != column.name {
                        for index in &mut indexes {
                            for field in &mut index.columns {
                                if field.field.name == *name {
                                    field.field.name = column.name.clone();
                                }
                            }
                        }
                    }
                }
                Change::DropColumn(name) => {
                    let pos = self.position(&columns, name)?;
                    columns.remove(pos);
                }
                Change::AddIndex(index) => indexes.push(index.clone()),
                Change::DropIndex(name) => {
                    let Some(pos) = indexes.iter().position(|index| index.name == *name) else {
                        return Err(Error::invalid_schema(format!(
                            "index `{name}` does not exist on `{}`",
                            self.collection
                        )));
                    };
                    indexes.remove(pos);
                }
            }
        }

        for index in &indexes {
            for field in &index.columns {
                if !columns.iter().any(|c| c.name == field.field.name) {
                    return Err(Error::invalid_schema(format!(
                        "index `{}` on `{}` still references dropped column `{}`",
                        index.name, self.collection, field.field.name
                    )));
                }
            }
        }

        validate_definition(self.target(), &columns, &indexes)?;

        Ok((columns, indexes))
    }

    /// Pairs each column that survives the alter with the column its data
    /// comes from. Added columns have no source and are left out.
    pub fn column_sources(&self, columns: &[Column]) -> Vec<ColumnSource> {
        // Each entry tracks (current name, original name)
        let mut tracked: Vec<(String, Option<String>)> = columns
            .iter()
            .map(|column| (column.name.clone(), Some(column.name.clone())))
            .collect();

        for change in &self.changes {
            match change {
                Change::AddColumn(column) => tracked.push((column.name.clone(), None)),
                Change::AlterColumn { name, column } => {
                    if let Some(entry) = tracked.iter_mut().find(|(current, _)| current == name) {
                        entry.0 = column.name.clone();
                    }
                }
                Change::DropColumn(name) => tracked.retain(|(current, _)| current != name),
                Change::AddIndex(_) | Change::DropIndex(_) => {}
            }
        }

        tracked
            .into_iter()
            .filter_map(|(target, source)| Some(ColumnSource { target, source: source? }))
            .collect()
    }

    fn position(&self, columns: &[Column], name: &str) -> Result<usize> {
        columns.iter().position(|c| c.name == name).ok_or_else(|| {
            Error::invalid_schema(format!(
                "column `{name}` does not exist on `{}`",
                self.collection
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stmt::{self, ColumnType};
    use pretty_assertions::assert_eq;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", ColumnType::Int),
            Column::new("name", ColumnType::Text),
            Column::new("email", ColumnType::Text),
        ]
    }

    fn indexes() -> Vec<Index> {
        vec![
            Index::primary("pk", ["id"]).unwrap(),
            Index::unique("email", ["email"]).unwrap(),
        ]
    }

    #[test]
    fn apply_rename_updates_index_columns() {
        let alter = stmt::alter_collection("users")
            .alter_column("email", Column::new("contact", ColumnType::Text));

        let (columns, indexes) = alter.apply(&columns(), &indexes()).unwrap();

        assert_eq!(columns[2].name, "contact");
        assert_eq!(indexes[1].columns[0].field.name, "contact");
    }

    #[test]
    fn dropping_an_indexed_column_is_rejected() {
        let alter = stmt::alter_collection("users").drop_column("email");
        let err = alter.apply(&columns(), &indexes()).unwrap_err();
        assert!(err.is_invalid_schema());

        let alter = stmt::alter_collection("users")
            .drop_index("email")
            .drop_column("email");
        assert!(alter.apply(&columns(), &indexes()).is_ok());
    }

    #[test]
    fn column_sources_follow_renames_and_skip_new_columns() {
        let alter = stmt::alter_collection("users")
            .alter_column("name", Column::new("full_name", ColumnType::Text))
            .drop_column("email")
            .add_column(Column::new("email", ColumnType::Text));

        let sources = alter.column_sources(&columns());

        assert_eq!(
            sources,
            vec![
                ColumnSource {
                    target: "id".into(),
                    source: "id".into()
                },
                ColumnSource {
                    target: "full_name".into(),
                    source: "name".into()
                },
            ]
        );
    }
}
