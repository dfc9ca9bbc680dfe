use super::{Binary, BinaryOp, Comparison, ComparisonOp, Condition, Expr, Value, Variables};
use crate::driver::Row;
use crate::{Error, Result};
use std::cmp::Ordering;

impl Condition {
    /// Evaluates the condition against a row.
    ///
    /// Follows SQL semantics for missing data. `eq`/`ne` against a null
    /// operand test for null like `IS NULL` / `IS NOT NULL`. Any other
    /// comparison involving a null (or a field the row does not have) is
    /// false, as is a comparison between values that have no ordering.
    pub fn eval(&self, row: &Row, variables: Option<&Variables>) -> Result<bool> {
        match self {
            Self::Comparison(comparison) => comparison.eval(row, variables),
            Self::Binary(binary) => binary.eval(row, variables),
        }
    }
}

impl Binary {
    pub fn eval(&self, row: &Row, variables: Option<&Variables>) -> Result<bool> {
        match self.op {
            BinaryOp::And => {
                for operand in &self.operands {
                    if !operand.eval(row, variables)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            BinaryOp::Or => {
                for operand in &self.operands {
                    if operand.eval(row, variables)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            BinaryOp::Xor => {
                let mut acc = false;
                for operand in &self.operands {
                    acc ^= operand.eval(row, variables)?;
                }
                Ok(acc)
            }
        }
    }
}

impl Comparison {
    pub fn eval(&self, row: &Row, variables: Option<&Variables>) -> Result<bool> {
        let lhs = row.get(&self.field.name).unwrap_or(&Value::Null);

        if let Some(arg) = self.arg() {
            if is_null_operand(arg, variables)? {
                return Ok(match self.op {
                    ComparisonOp::Eq => lhs.is_null(),
                    ComparisonOp::Ne => !lhs.is_null(),
                    _ => false,
                });
            }
        }

        if lhs.is_null() {
            return Ok(false);
        }

        for arg in &self.args {
            let rhs = operand(arg, row, variables)?;

            let matched = match self.op {
                ComparisonOp::Eq | ComparisonOp::In => lhs.compare(&rhs) == Some(Ordering::Equal),
                ComparisonOp::Ne => matches!(
                    lhs.compare(&rhs),
                    Some(Ordering::Less | Ordering::Greater)
                ),
                ComparisonOp::Gt => lhs.compare(&rhs) == Some(Ordering::Greater),
                ComparisonOp::Ge => matches!(
                    lhs.compare(&rhs),
                    Some(Ordering::Greater | Ordering::Equal)
                ),
                ComparisonOp::Lt => lhs.compare(&rhs) == Some(Ordering::Less),
                ComparisonOp::Le => matches!(
                    lhs.compare(&rhs),
                    Some(Ordering::Less | Ordering::Equal)
                ),
                ComparisonOp::BeginsWith => match (lhs, &rhs) {
                    (Value::String(lhs), Value::String(prefix)) => lhs.starts_with(prefix.as_str()),
                    _ => false,
                },
            };

            if matched {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

/// A literal or bound null, the operands the SQL compiler turns into
/// `IS NULL`.
fn is_null_operand(expr: &Expr, variables: Option<&Variables>) -> Result<bool> {
    Ok(match expr {
        Expr::Value(value) => value.is_null(),
        Expr::Variable(variable) => variable.resolve(variables)?.is_null(),
        Expr::Field(_) | Expr::Func(_) => false,
    })
}

fn operand(expr: &Expr, row: &Row, variables: Option<&Variables>) -> Result<Value> {
    match expr {
        Expr::Value(value) => Ok(value.clone()),
        Expr::Variable(variable) => Ok(variable.resolve(variables)?.clone()),
        Expr::Field(field) => Ok(row.get(&field.name).cloned().unwrap_or_default()),
        Expr::Func(func) => Err(Error::query_not_supported(format!(
            "`{}` cannot be evaluated inside a predicate",
            func.kind.name()
        ))),
    }
}
