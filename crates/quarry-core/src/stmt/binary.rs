use super::{Comparison, Condition, Variables};
use crate::{Error, Result};
use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    And,
    Or,
    Xor,
}

/// A boolean combination of one or more conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub op: BinaryOp,

    /// Never empty.
    pub operands: Vec<Condition>,
}

impl BinaryOp {
    pub fn is_and(self) -> bool {
        matches!(self, Self::And)
    }

    pub fn is_or(self) -> bool {
        matches!(self, Self::Or)
    }

    pub fn is_xor(self) -> bool {
        matches!(self, Self::Xor)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => "and".fmt(f),
            Self::Or => "or".fmt(f),
            Self::Xor => "xor".fmt(f),
        }
    }
}

impl fmt::Debug for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Binary {
    pub fn new(op: BinaryOp, operands: Vec<Condition>) -> Result<Binary> {
        if operands.is_empty() {
            return Err(Error::query_syntax(format!("`{op}` requires at least one operand")));
        }

        Ok(Binary { op, operands })
    }

    /// Wraps a condition so the result is always a `Binary`: binaries pass
    /// through and comparisons become a single-operand `and`.
    pub fn wrap(condition: Condition) -> Binary {
        match condition {
            Condition::Binary(binary) => binary,
            Condition::Comparison(comparison) => Binary {
                op: BinaryOp::And,
                operands: vec![comparison.into()],
            },
        }
    }

    /// True when every operand is a comparison.
    pub fn is_leaf(&self) -> bool {
        self.operands.iter().all(Condition::is_comparison)
    }

    /// Iterates the comparisons that are direct operands of this node.
    pub fn comparisons(&self) -> impl Iterator<Item = &Comparison> {
        self.operands.iter().filter_map(Condition::as_comparison)
    }

    /// True when `op` appears on this node or anywhere beneath it.
    pub fn contains_op(&self, op: BinaryOp) -> bool {
        self.op == op
            || self.operands.iter().any(|operand| match operand {
                Condition::Binary(binary) => binary.contains_op(op),
                Condition::Comparison(_) => false,
            })
    }

    pub(crate) fn bind(&self, variables: Option<&Variables>) -> Result<Option<Binary>> {
        let mut bound: Option<Vec<Condition>> = None;

        for (i, operand) in self.operands.iter().enumerate() {
            if let Some(operand) = operand.bind(variables)? {
                bound.get_or_insert_with(|| self.operands.clone())[i] = operand;
            }
        }

        Ok(bound.map(|operands| Binary {
            op: self.op,
            operands,
        }))
    }
}
