use super::{update::and_filter, Collection, Comparison, Condition, Expr, Field};

/// Removes matching rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub collection: Collection,

    /// WHERE. Without a filter every row is deleted.
    pub filter: Option<Condition>,
}

impl Delete {
    pub fn new(collection: impl Into<Collection>) -> Delete {
        Delete {
            collection: collection.into(),
            filter: None,
        }
    }

    pub fn filter(mut self, condition: impl Into<Condition>) -> Self {
        self.filter = Some(and_filter(self.filter.take(), condition.into()));
        self
    }

    pub fn eq(self, field: impl Into<Field>, value: impl Into<Expr>) -> Self {
        self.filter(Comparison::eq(field, value))
    }
}
