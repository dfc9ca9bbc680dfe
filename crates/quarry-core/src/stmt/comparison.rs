use super::{Expr, Field, Variables};
use crate::{Error, Result};
use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    BeginsWith,
    In,
}

/// A leaf predicate comparing a field against one or more operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub field: Field,
    pub op: ComparisonOp,

    /// Exactly one operand, except for `In` which takes a non-empty list.
    pub args: Vec<Expr>,
}

impl ComparisonOp {
    pub fn is_eq(self) -> bool {
        matches!(self, Self::Eq)
    }

    pub fn is_in(self) -> bool {
        matches!(self, Self::In)
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ComparisonOp::*;

        match self {
            Eq => "=".fmt(f),
            Ne => "!=".fmt(f),
            Gt => ">".fmt(f),
            Ge => ">=".fmt(f),
            Lt => "<".fmt(f),
            Le => "<=".fmt(f),
            BeginsWith => "begins with".fmt(f),
            In => "in".fmt(f),
        }
    }
}

impl fmt::Debug for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Comparison {
    pub fn new(field: impl Into<Field>, op: ComparisonOp, args: Vec<Expr>) -> Result<Comparison> {
        match op {
            ComparisonOp::In if args.is_empty() => {
                return Err(Error::query_syntax("`in` requires at least one value"));
            }
            ComparisonOp::In => {}
            _ if args.len() != 1 => {
                return Err(Error::query_syntax(format!(
                    "`{op}` requires exactly one operand, got {}",
                    args.len()
                )));
            }
            _ => {}
        }

        Ok(Comparison {
            field: field.into(),
            op,
            args,
        })
    }

    pub fn eq(field: impl Into<Field>, value: impl Into<Expr>) -> Comparison {
        Self::single(field, ComparisonOp::Eq, value)
    }

    pub fn ne(field: impl Into<Field>, value: impl Into<Expr>) -> Comparison {
        Self::single(field, ComparisonOp::Ne, value)
    }

    pub fn gt(field: impl Into<Field>, value: impl Into<Expr>) -> Comparison {
        Self::single(field, ComparisonOp::Gt, value)
    }

    pub fn ge(field: impl Into<Field>, value: impl Into<Expr>) -> Comparison {
        Self::single(field, ComparisonOp::Ge, value)
    }

    pub fn lt(field: impl Into<Field>, value: impl Into<Expr>) -> Comparison {
        Self::single(field, ComparisonOp::Lt, value)
    }

    pub fn le(field: impl Into<Field>, value: impl Into<Expr>) -> Comparison {
        Self::single(field, ComparisonOp::Le, value)
    }

    pub fn begins_with(field: impl Into<Field>, prefix: impl Into<Expr>) -> Comparison {
        Self::single(field, ComparisonOp::BeginsWith, prefix)
    }

    pub fn in_list<T: Into<Expr>>(
        field: impl Into<Field>,
        values: impl IntoIterator<Item = T>,
    ) -> Result<Comparison> {
        Comparison::new(
            field,
            ComparisonOp::In,
            values.into_iter().map(Into::into).collect(),
        )
    }

    fn single(field: impl Into<Field>, op: ComparisonOp, arg: impl Into<Expr>) -> Comparison {
        Comparison {
            field: field.into(),
            op,
            args: vec![arg.into()],
        }
    }

    /// Returns the sole operand of a single-operand comparison.
    pub fn arg(&self) -> Option<&Expr> {
        match &self.args[..] {
            [arg] if !self.op.is_in() => Some(arg),
            _ => None,
        }
    }

    pub(crate) fn bind(&self, variables: Option<&Variables>) -> Result<Option<Comparison>> {
        let mut bound: Option<Vec<Expr>> = None;

        for (i, arg) in self.args.iter().enumerate() {
            if let Some(arg) = arg.bind(variables)? {
                bound.get_or_insert_with(|| self.args.clone())[i] = arg;
            }
        }

        Ok(bound.map(|args| Comparison {
            field: self.field.clone(),
            op: self.op,
            args,
        }))
    }
}
