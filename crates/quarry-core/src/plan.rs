//! Plans selects for backends that cannot evaluate `or` natively.
//!
//! A select whose filter contains `or` is split into OR-free branches with
//! [`Condition::decompose`]. Each branch runs on its own and the results are
//! merged: rows are deduplicated by key, then the original sort, offset and
//! limit are applied to the merged set. Every branch keeps the sort and is
//! limited to `offset + limit` rows, so the merged window is exact.

use crate::{
    driver::{Capability, Row},
    stmt::{ComparisonOp, Condition, FieldDirection, Select, Value, Variables},
    Error, Result,
};

use std::cmp::Ordering;

/// Plans selects against one collection.
#[derive(Debug)]
pub struct Planner<'a> {
    capability: &'a Capability,

    /// Name of the single-column primary key, when the collection has one.
    /// Enables point lookups.
    primary_key: Option<&'a str>,

    variables: Option<&'a Variables>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectPlan {
    /// Queries to run. Results are concatenated in this order before the
    /// merge.
    pub branches: Vec<Branch>,

    /// Applied to the deduplicated union of branch results. `None` when
    /// there is a single branch, which then carries the full window itself.
    pub merge: Option<Window>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Branch {
    /// Fetch rows by primary key. The select's filter is exactly the key
    /// predicate.
    GetByKey { select: Select, keys: Vec<Value> },

    /// Evaluate the select's OR-free filter against every row.
    Scan(Select),
}

/// Sort, offset and limit applied to a set of rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Window {
    pub sort: Vec<FieldDirection>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl<'a> Planner<'a> {
    pub fn new(capability: &'a Capability) -> Planner<'a> {
        Planner {
            capability,
            primary_key: None,
            variables: None,
        }
    }

    pub fn primary_key(mut self, primary_key: Option<&'a str>) -> Self {
        self.primary_key = primary_key;
        self
    }

    pub fn variables(mut self, variables: Option<&'a Variables>) -> Self {
        self.variables = variables;
        self
    }

    pub fn plan_select(&self, select: &Select) -> Result<SelectPlan> {
        let collection = select.collection()?;

        if !select.joins.is_empty() && !self.capability.join {
            return Err(Error::query_not_supported("join not supported"));
        }

        let Some(filter) = &select.filter else {
            return Ok(SelectPlan {
                branches: vec![Branch::Scan(select.clone())],
                merge: None,
            });
        };

        let filter = filter.bound(self.variables)?;

        let mut branches = if self.capability.or {
            vec![filter]
        } else {
            filter
                .decompose()?
                .into_iter()
                .map(Condition::Binary)
                .collect()
        };

        if branches.len() == 1 {
            let branch = Select {
                filter: branches.pop(),
                ..select.clone()
            };

            return Ok(SelectPlan {
                branches: vec![self.classify(branch)],
                merge: None,
            });
        }

        tracing::debug!(
            collection = %collection,
            branches = branches.len(),
            "decomposed select into OR-free branches"
        );

        let limit = select
            .limit
            .map(|limit| limit.saturating_add(select.offset.unwrap_or(0)));

        let branches = branches
            .into_iter()
            .map(|filter| {
                self.classify(Select {
                    filter: Some(filter),
                    offset: None,
                    limit,
                    ..select.clone()
                })
            })
            .collect();

        Ok(SelectPlan {
            branches,
            merge: Some(Window::of(select)),
        })
    }

    fn classify(&self, select: Select) -> Branch {
        match self.point_lookup(&select) {
            Some(keys) => Branch::GetByKey { select, keys },
            None => Branch::Scan(select),
        }
    }

    /// Recognizes `eq(pk, literal)` with a limit of one, and
    /// `in_list(pk, literals)`.
    fn point_lookup(&self, select: &Select) -> Option<Vec<Value>> {
        let primary_key = self.primary_key?;

        let comparison = match select.filter.as_ref()? {
            Condition::Comparison(comparison) => comparison,
            Condition::Binary(binary) if binary.operands.len() == 1 => {
                binary.operands[0].as_comparison()?
            }
            Condition::Binary(_) => return None,
        };

        if comparison.field.name != primary_key {
            return None;
        }

        match comparison.op {
            ComparisonOp::Eq if select.limit == Some(1) => {
                Some(vec![comparison.arg()?.as_value()?.clone()])
            }
            ComparisonOp::In => comparison
                .args
                .iter()
                .map(|arg| arg.as_value().cloned())
                .collect(),
            _ => None,
        }
    }
}

impl Branch {
    pub fn select(&self) -> &Select {
        match self {
            Self::GetByKey { select, .. } | Self::Scan(select) => select,
        }
    }

    pub fn is_get_by_key(&self) -> bool {
        matches!(self, Self::GetByKey { .. })
    }
}

impl Window {
    pub fn of(select: &Select) -> Window {
        Window {
            sort: select.sort.clone(),
            offset: select.offset,
            limit: select.limit,
        }
    }

    /// Sorts `rows`, then skips `offset` rows and keeps at most `limit`.
    /// `row` extracts the field values to sort on.
    pub fn apply<T>(&self, mut rows: Vec<T>, row: impl Fn(&T) -> &Row) -> Vec<T> {
        if !self.sort.is_empty() {
            rows.sort_by(|a, b| compare_rows(row(a), row(b), &self.sort));
        }

        let offset = self.offset.unwrap_or(0) as usize;
        let limit = self.limit.map(|limit| limit as usize).unwrap_or(usize::MAX);

        rows.into_iter().skip(offset).take(limit).collect()
    }
}

fn compare_rows(a: &Row, b: &Row, sort: &[FieldDirection]) -> Ordering {
    for field in sort {
        let lhs = a.get(&field.field.name).unwrap_or(&Value::Null);
        let rhs = b.get(&field.field.name).unwrap_or(&Value::Null);

        let ordering = match field.direction.is_desc() {
            true => rhs.sort_cmp(lhs),
            false => lhs.sort_cmp(rhs),
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    Ordering::Equal
}
