use super::{Binary, BinaryOp, Comparison, Variables};
use crate::{Error, Result};

/// A predicate tree: comparisons at the leaves combined by `and`, `or` and
/// `xor` nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Comparison(Comparison),
    Binary(Binary),
}

impl Condition {
    pub fn and(lhs: impl Into<Condition>, rhs: impl Into<Condition>) -> Condition {
        Self::binary(BinaryOp::And, lhs, rhs)
    }

    pub fn or(lhs: impl Into<Condition>, rhs: impl Into<Condition>) -> Condition {
        Self::binary(BinaryOp::Or, lhs, rhs)
    }

    pub fn xor(lhs: impl Into<Condition>, rhs: impl Into<Condition>) -> Condition {
        Self::binary(BinaryOp::Xor, lhs, rhs)
    }

    /// Conjunction of every condition yielded. Fails when there are none.
    pub fn all<T: Into<Condition>>(conditions: impl IntoIterator<Item = T>) -> Result<Condition> {
        Self::many(BinaryOp::And, conditions)
    }

    /// Disjunction of every condition yielded. Fails when there are none.
    pub fn any<T: Into<Condition>>(conditions: impl IntoIterator<Item = T>) -> Result<Condition> {
        Self::many(BinaryOp::Or, conditions)
    }

    fn binary(op: BinaryOp, lhs: impl Into<Condition>, rhs: impl Into<Condition>) -> Condition {
        Condition::Binary(Binary {
            op,
            operands: vec![lhs.into(), rhs.into()],
        })
    }

    fn many<T: Into<Condition>>(
        op: BinaryOp,
        conditions: impl IntoIterator<Item = T>,
    ) -> Result<Condition> {
        let operands: Vec<Condition> = conditions.into_iter().map(Into::into).collect();

        if operands.is_empty() {
            return Err(Error::query_syntax(format!(
                "`{op}` requires at least one operand"
            )));
        }

        Ok(Condition::Binary(Binary { op, operands }))
    }

    pub fn is_comparison(&self) -> bool {
        matches!(self, Self::Comparison(_))
    }

    pub fn as_comparison(&self) -> Option<&Comparison> {
        match self {
            Self::Comparison(comparison) => Some(comparison),
            Self::Binary(_) => None,
        }
    }

    pub fn as_binary(&self) -> Option<&Binary> {
        match self {
            Self::Binary(binary) => Some(binary),
            Self::Comparison(_) => None,
        }
    }

    /// Substitutes every variable in the tree with its supplied value.
    ///
    /// Returns `Ok(None)` when nothing in the tree references a variable.
    /// Fails with a missing variable error when a referenced variable was
    /// not supplied.
    pub fn bind(&self, variables: Option<&Variables>) -> Result<Option<Condition>> {
        Ok(match self {
            Self::Comparison(comparison) => comparison.bind(variables)?.map(Condition::Comparison),
            Self::Binary(binary) => binary.bind(variables)?.map(Condition::Binary),
        })
    }

    /// Like [`Condition::bind`], but always returns the resulting tree.
    pub fn bound(&self, variables: Option<&Variables>) -> Result<Condition> {
        Ok(self.bind(variables)?.unwrap_or_else(|| self.clone()))
    }
}

impl From<Comparison> for Condition {
    fn from(value: Comparison) -> Self {
        Self::Comparison(value)
    }
}

impl From<Binary> for Condition {
    fn from(value: Binary) -> Self {
        Self::Binary(value)
    }
}
