use super::store::{Key, Store};

use indexmap::IndexMap;
use quarry_core::{
    driver::{Capability, Row},
    plan::{Branch, Planner, Window},
    stmt::{Expr, FieldAs, Select, Union, Variables},
    Error, Result,
};

impl Store {
    /// Runs a select through the planner: each OR-free branch is fetched by
    /// key or scanned, and the merged rows are windowed before projection.
    pub(crate) fn select(&self, select: &Select, variables: Option<&Variables>) -> Result<Vec<Row>> {
        let table = self.table(select.collection()?)?;

        let plan = Planner::new(&Capability::MEMORY)
            .primary_key(table.primary_key())
            .variables(variables)
            .plan_select(select)?;

        // Deduplicated by key, in the order branches produced them
        let mut matched: IndexMap<&Key, &Row> = IndexMap::new();

        for branch in &plan.branches {
            let rows: Vec<(&Key, &Row)> = match branch {
                Branch::GetByKey { keys, .. } => keys
                    .iter()
                    .filter_map(|key| table.rows.get_key_value(&Key(vec![key.clone()])))
                    .collect(),
                Branch::Scan(select) => {
                    let mut rows = vec![];

                    for (key, row) in &table.rows {
                        let keep = match &select.filter {
                            Some(filter) => filter.eval(row, variables)?,
                            None => true,
                        };

                        if keep {
                            rows.push((key, row));
                        }
                    }

                    rows
                }
            };

            tracing::trace!(
                collection = %table.collection,
                by_key = branch.is_get_by_key(),
                rows = rows.len(),
                "ran select branch"
            );

            for (key, row) in Window::of(branch.select()).apply(rows, |entry| entry.1) {
                matched.entry(key).or_insert(row);
            }
        }

        let rows: Vec<(&Key, &Row)> = matched.into_iter().collect();

        let rows = match &plan.merge {
            Some(window) => window.apply(rows, |entry| entry.1),
            None => rows,
        };

        rows.into_iter()
            .map(|(_, row)| project(&select.fields, row, variables))
            .collect()
    }

    /// Distinct rows across every select of the union, then windowed.
    pub(crate) fn union(&self, union: &Union, variables: Option<&Variables>) -> Result<Vec<Row>> {
        let mut rows: Vec<Row> = vec![];

        for select in &union.selects {
            for row in self.select(select, variables)? {
                if !rows.contains(&row) {
                    rows.push(row);
                }
            }
        }

        let window = Window {
            sort: union.sort.clone(),
            offset: union.offset,
            limit: union.limit,
        };

        Ok(window.apply(rows, |row| row))
    }
}

fn project(fields: &[FieldAs], row: &Row, variables: Option<&Variables>) -> Result<Row> {
    if fields.is_empty() {
        return Ok(row.clone());
    }

    let mut projected = Row::new();

    for field in fields {
        let Some(name) = field.output_name() else {
            return Err(Error::query_syntax("projected expression needs an alias"));
        };

        let value = match &field.expr {
            Expr::Field(f) => row.get(&f.name).cloned().ok_or_else(|| {
                Error::query_syntax(format!("unknown field `{}`", f.name))
            })?,
            Expr::Func(func) => {
                return Err(Error::query_not_supported(format!(
                    "`{}` not supported by the memory driver",
                    func.kind.name()
                )))
            }
            expr => expr.to_value(variables)?,
        };

        projected.insert(name.to_string(), value);
    }

    Ok(projected)
}
