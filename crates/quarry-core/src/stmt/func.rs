use super::{Expr, Variables};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Avg,
    Concat,
    Count,
    Max,
    Min,
    Sub,
    Sum,
}

/// A function call usable in projections.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub kind: FunctionKind,
    pub args: Vec<Expr>,
}

impl FunctionKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Avg => "avg",
            Self::Concat => "concat",
            Self::Count => "count",
            Self::Max => "max",
            Self::Min => "min",
            Self::Sub => "sub",
            Self::Sum => "sum",
        }
    }

    pub fn is_aggregate(self) -> bool {
        matches!(
            self,
            Self::Avg | Self::Count | Self::Max | Self::Min | Self::Sum
        )
    }
}

impl Function {
    /// Builds a function call, checking its arity: `count` takes zero or one
    /// argument, `sub` exactly two, `concat` at least one and the remaining
    /// aggregates exactly one.
    pub fn new(kind: FunctionKind, args: Vec<Expr>) -> Result<Function> {
        let ok = match kind {
            FunctionKind::Count => args.len() <= 1,
            FunctionKind::Sub => args.len() == 2,
            FunctionKind::Concat => !args.is_empty(),
            FunctionKind::Avg | FunctionKind::Max | FunctionKind::Min | FunctionKind::Sum => {
                args.len() == 1
            }
        };

        if !ok {
            return Err(Error::query_syntax(format!(
                "`{}` called with {} argument(s)",
                kind.name(),
                args.len()
            )));
        }

        Ok(Function { kind, args })
    }

    /// `COUNT(*)`
    pub fn count_all() -> Function {
        Function {
            kind: FunctionKind::Count,
            args: vec![],
        }
    }

    pub fn count(arg: impl Into<Expr>) -> Function {
        Self::unary(FunctionKind::Count, arg)
    }

    pub fn avg(arg: impl Into<Expr>) -> Function {
        Self::unary(FunctionKind::Avg, arg)
    }

    pub fn sum(arg: impl Into<Expr>) -> Function {
        Self::unary(FunctionKind::Sum, arg)
    }

    pub fn max(arg: impl Into<Expr>) -> Function {
        Self::unary(FunctionKind::Max, arg)
    }

    pub fn min(arg: impl Into<Expr>) -> Function {
        Self::unary(FunctionKind::Min, arg)
    }

    pub fn sub(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Function {
        Function {
            kind: FunctionKind::Sub,
            args: vec![lhs.into(), rhs.into()],
        }
    }

    pub fn concat<T: Into<Expr>>(args: impl IntoIterator<Item = T>) -> Result<Function> {
        Function::new(
            FunctionKind::Concat,
            args.into_iter().map(Into::into).collect(),
        )
    }

    fn unary(kind: FunctionKind, arg: impl Into<Expr>) -> Function {
        Function {
            kind,
            args: vec![arg.into()],
        }
    }

    pub(crate) fn bind(&self, variables: Option<&Variables>) -> Result<Option<Function>> {
        let mut bound: Option<Vec<Expr>> = None;

        for (i, arg) in self.args.iter().enumerate() {
            if let Some(arg) = arg.bind(variables)? {
                bound.get_or_insert_with(|| self.args.clone())[i] = arg;
            }
        }

        Ok(bound.map(|args| Function {
            kind: self.kind,
            args,
        }))
    }
}
