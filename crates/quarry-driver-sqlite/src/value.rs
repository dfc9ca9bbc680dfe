use quarry_core::{stmt::Value, Error, Result};
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};

/// Binds a query parameter.
#[derive(Debug)]
pub(crate) struct Param<'a>(pub(crate) &'a Value);

/// Converts a SQLite value within a row to a Quarry value.
///
/// Values come back by storage class: booleans read as integers, and dates
/// as the text they were written as.
pub(crate) fn from_sql(value: ValueRef<'_>) -> Result<Value> {
    Ok(match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(value) => Value::I64(value),
        ValueRef::Real(value) => Value::F64(value),
        ValueRef::Text(value) => Value::String(
            std::str::from_utf8(value)
                .map_err(Error::driver)?
                .to_string(),
        ),
        ValueRef::Blob(value) => Value::Bytes(value.to_vec()),
    })
}

impl ToSql for Param<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self.0 {
            Value::Bool(v) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*v))),
            Value::Bytes(v) => ToSqlOutput::Borrowed(ValueRef::Blob(&v[..])),
            Value::Date(v) => ToSqlOutput::Owned(SqlValue::Text(v.to_string())),
            Value::F64(v) => ToSqlOutput::Owned(SqlValue::Real(*v)),
            Value::I64(v) => ToSqlOutput::Owned(SqlValue::Integer(*v)),
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::String(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
        })
    }
}
