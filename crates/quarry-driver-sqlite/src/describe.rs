use quarry_core::{
    bail,
    driver::Response,
    stmt::{Collection, Column, ColumnType, Direction, Field, FieldDirection, Index, IndexType, Value},
    Error, Result,
};
use rusqlite::{Connection, OptionalExtension};

/// Name reported for the primary index, which SQLite does not name.
const PRIMARY: &str = "primary";

struct TableColumn {
    name: String,
    decl: String,
    default: Option<String>,

    /// Position in the primary key, starting at 1. Zero when the column is
    /// not part of it.
    pk: i64,
}

/// Reads the columns and indexes of a table back into the definition that
/// created it.
pub(crate) fn describe(connection: &Connection, collection: &Collection) -> Result<Response> {
    let ident = collection.ident();

    let create_sql: Option<String> = connection
        .query_row(
            "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [&ident],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::driver)?;

    let Some(create_sql) = create_sql else {
        return Err(Error::invalid_schema(format!(
            "collection `{collection}` does not exist"
        )));
    };

    let table_columns = table_columns(connection, &ident)?;

    let mut primary_key: Vec<&TableColumn> = table_columns.iter().filter(|c| c.pk > 0).collect();
    primary_key.sort_by_key(|c| c.pk);

    // Only an `INTEGER PRIMARY KEY` column can carry AUTOINCREMENT
    let auto_increment = match &primary_key[..] {
        [column] if declares_autoincrement(&create_sql, &column.name) => Some(column.name.as_str()),
        _ => None,
    };

    let mut columns = vec![];

    for column in &table_columns {
        let (ty, size) = parse_type(&column.decl)?;

        columns.push(Column {
            name: column.name.clone(),
            ty,
            size,
            default: column.default.as_deref().and_then(parse_default),
            auto_increment: auto_increment == Some(column.name.as_str()),
        });
    }

    let mut indexes = vec![];

    if !primary_key.is_empty() {
        indexes.push(Index::primary(
            PRIMARY,
            primary_key.iter().map(|column| column.name.as_str()),
        )?);
    }

    indexes.extend(secondary_indexes(connection, &ident)?);

    tracing::debug!(
        collection = %collection,
        columns = columns.len(),
        indexes = indexes.len(),
        "described collection"
    );

    Ok(Response::Description { columns, indexes })
}

fn table_columns(connection: &Connection, ident: &str) -> Result<Vec<TableColumn>> {
    let mut stmt = connection
        .prepare("SELECT name, type, dflt_value, pk FROM pragma_table_info(?1) ORDER BY cid")
        .map_err(Error::driver)?;

    let rows = stmt
        .query_map([ident], |row| {
            Ok(TableColumn {
                name: row.get(0)?,
                decl: row.get(1)?,
                default: row.get(2)?,
                pk: row.get(3)?,
            })
        })
        .map_err(Error::driver)?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Error::driver)
}

/// Indexes created with `CREATE INDEX`, named relative to the table.
fn secondary_indexes(connection: &Connection, ident: &str) -> Result<Vec<Index>> {
    let mut stmt = connection
        .prepare(
            "SELECT name, \"unique\" FROM pragma_index_list(?1) WHERE origin = 'c' ORDER BY name",
        )
        .map_err(Error::driver)?;

    let listed = stmt
        .query_map([ident], |row| Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?)))
        .map_err(Error::driver)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Error::driver)?;

    let prefix = format!("{ident}_");
    let mut indexes = vec![];

    for (physical, unique) in listed {
        let mut stmt = connection
            .prepare(
                "SELECT name, \"desc\" FROM pragma_index_xinfo(?1) WHERE key = 1 ORDER BY seqno",
            )
            .map_err(Error::driver)?;

        let columns = stmt
            .query_map([&physical], |row| {
                let name: String = row.get(0)?;
                let desc: bool = row.get(1)?;
                let direction = if desc { Direction::Desc } else { Direction::Asc };
                Ok(FieldDirection::new(Field::new(name), direction))
            })
            .map_err(Error::driver)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::driver)?;

        let name = physical.strip_prefix(&prefix).unwrap_or(&physical);
        let ty = if unique { IndexType::Unique } else { IndexType::Index };

        indexes.push(Index::new(name, ty, columns)?);
    }

    Ok(indexes)
}

/// Whether the definition of `column` in `create_sql` reads
/// `PRIMARY KEY AUTOINCREMENT`. The column name is matched quoted, as the
/// serializer and SQLite's column renames write it.
fn declares_autoincrement(create_sql: &str, column: &str) -> bool {
    let quoted = format!("\"{}\"", column.replace('"', "\"\""));

    create_sql.match_indices(&quoted).any(|(at, _)| {
        let starts_definition = create_sql[..at]
            .trim_end()
            .ends_with(|c: char| c == '(' || c == ',');
        if !starts_definition {
            return false;
        }

        let rest = &create_sql[at + quoted.len()..];
        let definition = rest.split(',').next().unwrap_or(rest);
        let words: Vec<String> = definition
            .split_whitespace()
            .map(|word| word.trim_end_matches(')').to_ascii_uppercase())
            .collect();

        words
            .windows(3)
            .any(|w| w[0] == "PRIMARY" && w[1] == "KEY" && w[2] == "AUTOINCREMENT")
    })
}

/// Parses a declared column type, as written by the SQL serializer.
fn parse_type(decl: &str) -> Result<(ColumnType, Option<u32>)> {
    let upper = decl.trim().to_ascii_uppercase();

    let (name, size) = match upper.split_once('(') {
        Some((name, rest)) => {
            let size = rest.trim_end_matches(')').trim().parse::<u32>()?;
            (name.trim(), Some(size))
        }
        None => (upper.as_str(), None),
    };

    let ty = match name {
        "BOOLEAN" => ColumnType::Boolean,
        "BIT" => ColumnType::Bit,
        "UNSIGNED INTEGER" => ColumnType::UInt,
        "INTEGER" => ColumnType::Int,
        "REAL" => ColumnType::Float,
        "TEXT" | "VARCHAR" => ColumnType::Text,
        "BLOB" => ColumnType::Blob,
        "DATE" => ColumnType::Date,
        "DATETIME" => ColumnType::DateTime,
        _ => bail!("unsupported column type `{decl}`"),
    };

    Ok((ty, size))
}

/// Parses a column default written as a SQL literal. Defaults that are not
/// plain literals are left out.
fn parse_default(sql: &str) -> Option<Value> {
    let sql = sql.trim();

    if sql.eq_ignore_ascii_case("NULL") {
        return None;
    }

    if sql.eq_ignore_ascii_case("TRUE") {
        return Some(Value::Bool(true));
    }

    if sql.eq_ignore_ascii_case("FALSE") {
        return Some(Value::Bool(false));
    }

    if let Some(hex) = sql
        .strip_prefix("X'")
        .or_else(|| sql.strip_prefix("x'"))
        .and_then(|hex| hex.strip_suffix('\''))
    {
        return hex
            .as_bytes()
            .chunks(2)
            .map(|pair| {
                let pair = std::str::from_utf8(pair).ok()?;
                u8::from_str_radix(pair, 16).ok()
            })
            .collect::<Option<Vec<u8>>>()
            .map(Value::Bytes);
    }

    if let Some(text) = sql
        .strip_prefix('\'')
        .and_then(|text| text.strip_suffix('\''))
    {
        return Some(Value::String(text.replace("''", "'")));
    }

    if let Ok(value) = sql.parse::<i64>() {
        return Some(Value::I64(value));
    }

    sql.parse::<f64>().ok().map(Value::F64)
}
