use super::{Condition, Query};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

/// Joins the rows of a sub-query, exposed under `alias`.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,

    /// Must be a select, aggregate or union.
    pub query: Box<Query>,

    pub alias: String,
    pub on: Condition,
}

impl Join {
    pub fn inner(query: impl Into<Query>, alias: impl Into<String>, on: impl Into<Condition>) -> Join {
        Join {
            kind: JoinKind::Inner,
            query: Box::new(query.into()),
            alias: alias.into(),
            on: on.into(),
        }
    }

    pub fn left(query: impl Into<Query>, alias: impl Into<String>, on: impl Into<Condition>) -> Join {
        Join {
            kind: JoinKind::Left,
            query: Box::new(query.into()),
            alias: alias.into(),
            on: on.into(),
        }
    }
}
