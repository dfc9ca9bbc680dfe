use super::{Collection, Condition, Field, FieldAs, FieldDirection, Select};

/// A select with grouping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    pub select: Select,

    /// GROUP BY
    pub group_by: Vec<Field>,
}

impl Aggregate {
    pub fn new() -> Aggregate {
        Aggregate::default()
    }

    pub fn from(mut self, collection: impl Into<Collection>) -> Self {
        self.select = self.select.from(collection);
        self
    }

    pub fn fields<T: Into<FieldAs>>(mut self, fields: impl IntoIterator<Item = T>) -> Self {
        self.select = self.select.fields(fields);
        self
    }

    pub fn filter(mut self, condition: impl Into<Condition>) -> Self {
        self.select = self.select.filter(condition);
        self
    }

    pub fn group_by<T: Into<Field>>(mut self, fields: impl IntoIterator<Item = T>) -> Self {
        self.group_by.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn sort(mut self, sort: impl Into<FieldDirection>) -> Self {
        self.select = self.select.sort(sort);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.select = self.select.limit(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.select = self.select.offset(offset);
        self
    }
}
