use super::{Comma, Delimited, Flavor, Formatter, Ident, Params, ToSql};

use quarry_core::{
    stmt::{
        Binary, BinaryOp, Comparison, ComparisonOp, Condition, Direction, Expr, Field, FieldAs,
        FieldDirection, Function, FunctionKind, Value,
    },
    Error, Result,
};

impl ToSql for &Expr {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        match self {
            Expr::Field(field) => field.to_sql(f),
            Expr::Func(func) => func.to_sql(f),
            Expr::Value(value) => value.to_sql(f),
            Expr::Variable(variable) => {
                let value = variable.resolve(f.variables)?;
                value.to_sql(f)
            }
        }
    }
}

impl ToSql for &Field {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        match &self.collection {
            Some(collection) => fmt!(f, Ident(collection) "." Ident(&self.name)),
            None => fmt!(f, Ident(&self.name)),
        }
    }
}

impl ToSql for &FieldAs {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let alias = self.alias.as_ref().map(|alias| (" AS ", Ident(alias)));
        fmt!(f, &self.expr alias)
    }
}

impl ToSql for &FieldDirection {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let direction = match self.direction {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        };
        fmt!(f, &self.field direction)
    }
}

impl ToSql for &Function {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let name = match self.kind {
            FunctionKind::Avg => "AVG",
            FunctionKind::Count => "COUNT",
            FunctionKind::Max => "MAX",
            FunctionKind::Min => "MIN",
            FunctionKind::Sum => "SUM",
            FunctionKind::Sub => return fmt!(f, "(" Delimited(&self.args, " - ") ")"),
            FunctionKind::Concat => return fmt!(f, "(" Delimited(&self.args, " || ") ")"),
        };

        if self.args.is_empty() {
            fmt!(f, name "(*)")
        } else {
            fmt!(f, name "(" Comma(&self.args) ")")
        }
    }
}

impl ToSql for &Condition {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        match self {
            Condition::Comparison(comparison) => comparison.to_sql(f),
            Condition::Binary(binary) => binary.to_sql(f),
        }
    }
}

/// An operand of a boolean combinator, parenthesized when it is itself a
/// combinator of more than one operand.
struct Operand<'a>(&'a Condition);

impl ToSql for Operand<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        match self.0 {
            Condition::Binary(binary) if binary.operands.len() > 1 => {
                fmt!(f, "(" binary ")")
            }
            condition => condition.to_sql(f),
        }
    }
}

impl ToSql for &Binary {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let operands = self.operands.iter().map(Operand);

        match self.op {
            BinaryOp::And => fmt!(f, Delimited(operands, " AND ")),
            BinaryOp::Or => fmt!(f, Delimited(operands, " OR ")),
            BinaryOp::Xor => {
                // Neither dialect has a boolean XOR, so operands are chained
                // with `<>`: ((a) <> (b)) <> (c)
                let n = self.operands.len();

                for _ in 2..n {
                    fmt!(f, "(")?;
                }

                let first = &self.operands[0];
                fmt!(f, "(" first ")")?;

                for (i, operand) in self.operands.iter().enumerate().skip(1) {
                    fmt!(f, " <> (" operand ")")?;
                    if i < n - 1 {
                        fmt!(f, ")")?;
                    }
                }

                Ok(())
            }
        }
    }
}

impl ToSql for &Comparison {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let field = &self.field;

        let op = match self.op {
            ComparisonOp::In => return fmt!(f, field " IN (" Comma(&self.args) ")"),
            ComparisonOp::BeginsWith => return begins_with(f, self),
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "<>",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
        };

        let Some(arg) = self.arg() else {
            return Err(Error::query_syntax(format!("`{}` has no operand", self.op)));
        };

        // `= NULL` never matches in SQL
        if is_null(f, arg)? {
            match self.op {
                ComparisonOp::Eq => return fmt!(f, field " IS NULL"),
                ComparisonOp::Ne => return fmt!(f, field " IS NOT NULL"),
                _ => {}
            }
        }

        fmt!(f, field " " op " " arg)
    }
}

fn is_null<P: Params>(f: &Formatter<'_, P>, arg: &Expr) -> Result<bool> {
    Ok(match arg {
        Expr::Value(value) => value.is_null(),
        Expr::Variable(variable) => variable.resolve(f.variables)?.is_null(),
        Expr::Field(_) | Expr::Func(_) => false,
    })
}

/// `begins_with(field, prefix)` is a case-sensitive prefix match. SQLite's
/// LIKE folds ASCII case, so SQLite gets `GLOB 'prefix*'` with `*?[`
/// bracketed; PostgreSQL gets `LIKE 'prefix%'` with `%_\` escaped.
fn begins_with<P: Params>(f: &mut Formatter<'_, P>, comparison: &Comparison) -> Result<()> {
    let prefix = match comparison.arg() {
        Some(arg) => arg.to_value(f.variables)?,
        None => Value::Null,
    };

    let Some(prefix) = prefix.as_str() else {
        return Err(Error::query_syntax(format!(
            "`begins with` on `{}` requires a string operand",
            comparison.field.name
        )));
    };

    let field = &comparison.field;
    let mut pattern = String::with_capacity(prefix.len() + 1);

    match f.serializer.flavor {
        Flavor::Sqlite => {
            for c in prefix.chars() {
                if matches!(c, '*' | '?' | '[') {
                    pattern.push('[');
                    pattern.push(c);
                    pattern.push(']');
                } else {
                    pattern.push(c);
                }
            }
            pattern.push('*');

            let pattern = &Value::String(pattern);
            fmt!(f, field " GLOB " pattern)
        }
        Flavor::Postgresql => {
            for c in prefix.chars() {
                if matches!(c, '%' | '_' | '\\') {
                    pattern.push('\\');
                }
                pattern.push(c);
            }
            pattern.push('%');

            let pattern = &Value::String(pattern);
            fmt!(f, field " LIKE " pattern " ESCAPE '\\'")
        }
    }
}
