use super::{FieldDirection, Select};
use crate::{Error, Result};

/// Distinct rows matched by any of several selects.
#[derive(Debug, Clone, PartialEq)]
pub struct Union {
    /// Never empty.
    pub selects: Vec<Select>,

    pub sort: Vec<FieldDirection>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl Union {
    pub fn new(selects: impl IntoIterator<Item = Select>) -> Result<Union> {
        let selects: Vec<_> = selects.into_iter().collect();

        if selects.is_empty() {
            return Err(Error::query_syntax("union requires at least one select"));
        }

        Ok(Union {
            selects,
            sort: vec![],
            offset: None,
            limit: None,
        })
    }

    pub fn sort(mut self, sort: impl Into<FieldDirection>) -> Self {
        self.sort.push(sort.into());
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}
