use super::{
    update::and_filter, Collection, Comparison, Condition, Expr, Field, FieldAs, FieldDirection,
    Join, Query, Union,
};
use crate::{Error, Result};

/// A read query over one collection.
///
/// Built with consuming builder methods:
///
/// ```
/// # use quarry_core::stmt::{self, Field};
/// let query = stmt::select()
///     .from(("Foo", "Bar"))
///     .fields(["id", "title"])
///     .gt("views", 100)
///     .sort(Field::new("id").desc())
///     .limit(10);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Select {
    /// Source collection. Required to compile or execute.
    pub collection: Option<Collection>,

    /// Projection. Empty selects every field.
    pub fields: Vec<FieldAs>,

    pub joins: Vec<Join>,

    /// WHERE
    pub filter: Option<Condition>,

    /// ORDER BY
    pub sort: Vec<FieldDirection>,

    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl Select {
    pub fn new() -> Select {
        Select::default()
    }

    pub fn from(mut self, collection: impl Into<Collection>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn fields<T: Into<FieldAs>>(mut self, fields: impl IntoIterator<Item = T>) -> Self {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
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

    pub fn ne(self, field: impl Into<Field>, value: impl Into<Expr>) -> Self {
        self.filter(Comparison::ne(field, value))
    }

    pub fn gt(self, field: impl Into<Field>, value: impl Into<Expr>) -> Self {
        self.filter(Comparison::gt(field, value))
    }

    pub fn gte(self, field: impl Into<Field>, value: impl Into<Expr>) -> Self {
        self.filter(Comparison::ge(field, value))
    }

    pub fn lt(self, field: impl Into<Field>, value: impl Into<Expr>) -> Self {
        self.filter(Comparison::lt(field, value))
    }

    pub fn lte(self, field: impl Into<Field>, value: impl Into<Expr>) -> Self {
        self.filter(Comparison::le(field, value))
    }

    pub fn begins_with(self, field: impl Into<Field>, prefix: impl Into<Expr>) -> Self {
        self.filter(Comparison::begins_with(field, prefix))
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

    /// Returns the source collection, failing when none was set.
    pub fn collection(&self) -> Result<&Collection> {
        self.collection
            .as_ref()
            .ok_or_else(|| Error::query_syntax("select has no collection"))
    }

    /// True when the select has a sort, offset or limit.
    pub fn is_windowed(&self) -> bool {
        !self.sort.is_empty() || self.offset.is_some() || self.limit.is_some()
    }

    /// Rewrites the select so that no branch filter contains `or`.
    ///
    /// A filter that decomposes into a single conjunction yields a plain
    /// select. Otherwise the result is a union with one select per branch,
    /// and the sort, offset and limit move to the union. Selects with joins
    /// cannot be rewritten this way.
    pub fn into_union(self) -> Result<Query> {
        let Some(filter) = &self.filter else {
            return Ok(Query::Select(self));
        };

        let mut branches = filter.decompose()?;

        if branches.len() == 1 {
            let branch = branches.remove(0);
            return Ok(Query::Select(Select {
                filter: Some(branch.into()),
                ..self
            }));
        }

        if !self.joins.is_empty() {
            return Err(Error::too_complex_query(
                "a select with joins cannot be split into OR-free branches",
            ));
        }

        let selects = branches
            .into_iter()
            .map(|branch| Select {
                collection: self.collection.clone(),
                fields: self.fields.clone(),
                joins: vec![],
                filter: Some(branch.into()),
                sort: vec![],
                offset: None,
                limit: None,
            })
            .collect();

        Ok(Query::Union(Union {
            selects,
            sort: self.sort,
            offset: self.offset,
            limit: self.limit,
        }))
    }
}
