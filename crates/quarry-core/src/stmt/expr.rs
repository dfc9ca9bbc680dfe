use super::{Field, Function, Value, Variable, Variables};
use crate::Result;

/// An operand: a field reference, a function call, a literal or a variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Field(Field),
    Func(Function),
    Value(Value),
    Variable(Variable),
}

impl Expr {
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Substitutes variables with the values supplied for them.
    ///
    /// Returns `Ok(None)` when the expression references no variable, so
    /// callers can keep the original without cloning it.
    pub fn bind(&self, variables: Option<&Variables>) -> Result<Option<Expr>> {
        match self {
            Self::Variable(variable) => Ok(Some(Expr::Value(variable.resolve(variables)?.clone()))),
            Self::Func(func) => Ok(func.bind(variables)?.map(Expr::Func)),
            Self::Field(_) | Self::Value(_) => Ok(None),
        }
    }

    /// Resolves the expression to a literal. Field references and function
    /// calls have no value outside of a row and are rejected.
    pub fn to_value(&self, variables: Option<&Variables>) -> Result<Value> {
        match self {
            Self::Value(value) => Ok(value.clone()),
            Self::Variable(variable) => Ok(variable.resolve(variables)?.clone()),
            Self::Field(field) => Err(crate::Error::query_syntax(format!(
                "expected a literal, found field `{}`",
                field.name
            ))),
            Self::Func(func) => Err(crate::Error::query_syntax(format!(
                "expected a literal, found function `{}`",
                func.kind.name()
            ))),
        }
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Field> for Expr {
    fn from(value: Field) -> Self {
        Self::Field(value)
    }
}

impl From<Function> for Expr {
    fn from(value: Function) -> Self {
        Self::Func(value)
    }
}

impl From<Variable> for Expr {
    fn from(value: Variable) -> Self {
        Self::Variable(value)
    }
}

macro_rules! impl_from_literal {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Expr {
                fn from(value: $ty) -> Self {
                    Self::Value(value.into())
                }
            }
        )*
    };
}

impl_from_literal!(bool, i32, i64, f64, &str, String, Vec<u8>, chrono::NaiveDateTime);
