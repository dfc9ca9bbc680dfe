use super::{BinaryOp, Collection, Comparison, Condition, Expr, Field};
use indexmap::IndexMap;

/// Assigns new values to the fields of matching rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub collection: Collection,

    /// Field name to new value, in assignment order.
    pub assignments: IndexMap<String, Expr>,

    /// WHERE. Without a filter every row is updated.
    pub filter: Option<Condition>,
}

impl Update {
    pub fn new(collection: impl Into<Collection>) -> Update {
        Update {
            collection: collection.into(),
            assignments: IndexMap::new(),
            filter: None,
        }
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Expr>) -> Self {
        self.assignments.insert(field.into(), value.into());
        self
    }

    /// ANDs `condition` into the filter.
    pub fn filter(mut self, condition: impl Into<Condition>) -> Self {
        self.filter = Some(and_filter(self.filter.take(), condition.into()));
        self
    }

    pub fn eq(self, field: impl Into<Field>, value: impl Into<Expr>) -> Self {
        self.filter(Comparison::eq(field, value))
    }
}

pub(super) fn and_filter(existing: Option<Condition>, condition: Condition) -> Condition {
    match existing {
        None => condition,
        Some(Condition::Binary(mut existing)) if existing.op == BinaryOp::And => {
            existing.operands.push(condition);
            Condition::Binary(existing)
        }
        Some(existing) => Condition::and(existing, condition),
    }
}
