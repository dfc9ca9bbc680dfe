use super::{Flavor, Formatter, Params, ToSql};

use quarry_core::{stmt::Value, Error, Result};

/// A value written inline rather than bound as a parameter. DDL statements
/// cannot take parameters.
pub(super) struct Literal<'a>(pub(super) &'a Value);

impl ToSql for &Value {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let placeholder = f.params.push(self);
        fmt!(f, placeholder)
    }
}

impl ToSql for Literal<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        use std::fmt::Write;

        let dst = &mut *f.dst;

        match self.0 {
            Value::Null => dst.push_str("NULL"),
            Value::Bool(true) => dst.push_str("TRUE"),
            Value::Bool(false) => dst.push_str("FALSE"),
            Value::I64(v) => dst.push_str(&v.to_string()),
            Value::F64(v) if v.is_finite() => dst.push_str(&format!("{v:?}")),
            Value::F64(v) => {
                return Err(Error::query_not_supported(format!(
                    "`{v}` cannot be written as a SQL literal"
                )));
            }
            Value::String(v) => quote(dst, v),
            Value::Date(v) => quote(dst, &v.to_string()),
            Value::Bytes(bytes) => {
                let hex = bytes.iter().fold(String::new(), |mut hex, byte| {
                    let _ = write!(hex, "{byte:02x}");
                    hex
                });

                match f.serializer.flavor {
                    Flavor::Sqlite => dst.push_str(&format!("X'{hex}'")),
                    Flavor::Postgresql => dst.push_str(&format!("'\\x{hex}'::bytea")),
                }
            }
        }

        Ok(())
    }
}

fn quote(dst: &mut String, s: &str) {
    dst.push('\'');
    dst.push_str(&s.replace('\'', "''"));
    dst.push('\'');
}
