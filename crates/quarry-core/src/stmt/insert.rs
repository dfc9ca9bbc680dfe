use super::{Collection, Expr, Field, Select};
use crate::{Error, Result};

/// Inserts rows into a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub collection: Collection,

    /// Target fields. Every row of values lines up with this list.
    pub fields: Vec<Field>,

    pub source: InsertSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    /// Literal rows.
    Values(Vec<Vec<Expr>>),

    /// Rows produced by a select, matched to the target fields by position.
    Select(Box<Select>),
}

impl Insert {
    pub fn new(collection: impl Into<Collection>) -> Insert {
        Insert {
            collection: collection.into(),
            fields: vec![],
            source: InsertSource::Values(vec![]),
        }
    }

    pub fn fields<T: Into<Field>>(mut self, fields: impl IntoIterator<Item = T>) -> Self {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Appends a row of values. Replaces a select source, if one was set.
    pub fn values<T: Into<Expr>>(mut self, row: impl IntoIterator<Item = T>) -> Self {
        let row = row.into_iter().map(Into::into).collect();

        match &mut self.source {
            InsertSource::Values(rows) => rows.push(row),
            InsertSource::Select(_) => self.source = InsertSource::Values(vec![row]),
        }
        self
    }

    /// Sets one field of a single-row insert.
    pub fn set(mut self, field: impl Into<Field>, value: impl Into<Expr>) -> Self {
        self.fields.push(field.into());

        let value = value.into();

        match &mut self.source {
            InsertSource::Values(rows) => match rows.first_mut() {
                Some(row) => row.push(value),
                None => rows.push(vec![value]),
            },
            InsertSource::Select(_) => self.source = InsertSource::Values(vec![vec![value]]),
        }
        self
    }

    pub fn select(mut self, select: Select) -> Self {
        self.source = InsertSource::Select(Box::new(select));
        self
    }

    /// Checks that every row of values lines up with the target fields.
    pub fn validate(&self) -> Result<()> {
        match &self.source {
            InsertSource::Values(rows) => {
                if rows.is_empty() {
                    return Err(Error::query_syntax(format!(
                        "insert into `{}` has no rows",
                        self.collection
                    )));
                }

                for row in rows {
                    if row.len() != self.fields.len() {
                        return Err(Error::query_syntax(format!(
                            "insert into `{}` has {} field(s) but a row of {} value(s)",
                            self.collection,
                            self.fields.len(),
                            row.len()
                        )));
                    }
                }
            }
            InsertSource::Select(select) => {
                if !select.fields.is_empty() && select.fields.len() != self.fields.len() {
                    return Err(Error::query_syntax(format!(
                        "insert into `{}` has {} field(s) but selects {}",
                        self.collection,
                        self.fields.len(),
                        select.fields.len()
                    )));
                }
            }
        }

        Ok(())
    }
}
