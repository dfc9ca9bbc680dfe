use super::{Flavor, Formatter, Params, ToSql};

use quarry_core::{stmt::ColumnType, Result};

/// Storage type of a column: its type and optional size.
pub(super) struct Type(pub(super) ColumnType, pub(super) Option<u32>);

impl ToSql for Type {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let Type(ty, size) = self;

        let name = match (f.serializer.flavor, ty) {
            (_, ColumnType::Boolean) => "BOOLEAN",
            (_, ColumnType::Bit) => "BIT",
            (Flavor::Sqlite, ColumnType::UInt) => "UNSIGNED INTEGER",
            (Flavor::Sqlite, ColumnType::Int) => "INTEGER",
            (Flavor::Sqlite, ColumnType::Float) => "REAL",
            (Flavor::Sqlite, ColumnType::Blob) => "BLOB",
            (Flavor::Sqlite, ColumnType::DateTime) => "DATETIME",
            (Flavor::Postgresql, ColumnType::UInt | ColumnType::Int) => "BIGINT",
            (Flavor::Postgresql, ColumnType::Float) => "DOUBLE PRECISION",
            (Flavor::Postgresql, ColumnType::Blob) => "BYTEA",
            (Flavor::Postgresql, ColumnType::DateTime) => "TIMESTAMP",
            (_, ColumnType::Text) if size.is_some() => "VARCHAR",
            (_, ColumnType::Text) => "TEXT",
            (_, ColumnType::Date) => "DATE",
        };

        fmt!(f, name)?;

        match (ty, size) {
            (ColumnType::Text | ColumnType::Bit, Some(size)) => fmt!(f, "(" u64::from(size) ")"),
            _ => Ok(()),
        }
    }
}
