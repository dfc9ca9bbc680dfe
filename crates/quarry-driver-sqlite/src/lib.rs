mod describe;

mod value;
use value::Param;

use quarry_core::{
    async_trait, bail,
    driver::{self, Capability, Response, Row},
    schema::Compatibility,
    stmt::{Collection, ColumnType, Query, Value, Variables},
    Error, Result,
};
use quarry_sql::{Compiled, Serializer};
use rusqlite::Connection as RusqliteConnection;
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};
use url::Url;

#[derive(Debug)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver from a connection URL: `sqlite::memory:`
    /// or `sqlite:/path/to.db`.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(|err| {
            Error::invalid_connection_url(format!("{err}; url={url_str}"))
        })?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            )));
        }

        match url.path() {
            ":memory:" => Ok(Self::InMemory),
            "" => Err(Error::invalid_connection_url(format!(
                "connection URL has no database path; url={url_str}"
            ))),
            path => Ok(Self::File(PathBuf::from(path))),
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

#[async_trait]
impl driver::Driver for Sqlite {
    fn url(&self) -> Cow<'_, str> {
        match self {
            Sqlite::InMemory => Cow::Borrowed("sqlite::memory:"),
            Sqlite::File(path) => Cow::Owned(format!("sqlite:{}", path.display())),
        }
    }

    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    /// Each connection to an in-memory database gets a fresh, empty
    /// database.
    async fn connect(&self) -> Result<Box<dyn driver::Connection>> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory => Connection::in_memory()?,
        };
        Ok(Box::new(connection))
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection = RusqliteConnection::open_in_memory().map_err(Error::driver)?;
        Ok(Self { connection })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::driver)?;
        Ok(Self { connection })
    }

    fn exec(&self, query: &Query, variables: Option<&Variables>) -> Result<Response> {
        if let Query::DescribeCollection(describe) = query {
            return describe::describe(&self.connection, &describe.collection);
        }

        let statements = Serializer::sqlite().compile(query, variables)?;

        match query {
            Query::Select(_) | Query::Aggregate(_) | Query::Union(_) => {
                Ok(Response::Rows(self.query(single(&statements)?)?))
            }
            Query::CollectionExists(_) => {
                let rows = self.query(single(&statements)?)?;
                let count = rows
                    .first()
                    .and_then(|row| row.values().next())
                    .and_then(Value::as_i64)
                    .unwrap_or(0);
                Ok(Response::Exists(count > 0))
            }
            Query::ShowCollection(show) => {
                let rows = self.query(single(&statements)?)?;
                let collections = rows
                    .iter()
                    .filter_map(|row| row.values().next()?.as_str())
                    .filter_map(|ident| Collection::from_ident(ident, show.namespace.as_deref()))
                    .collect();
                Ok(Response::Collections(collections))
            }
            Query::Insert(_) => {
                self.run(&statements)?;
                Ok(Response::Inserted {
                    id: Value::I64(self.connection.last_insert_rowid()),
                })
            }
            Query::Update(update) => {
                self.run(&statements)?;

                let data = update
                    .assignments
                    .iter()
                    .filter_map(|(field, expr)| Some((field.clone(), expr.to_value(variables).ok()?)))
                    .collect();
                Ok(Response::Updated { data })
            }
            _ => {
                self.run(&statements)?;
                Ok(Response::Acknowledged)
            }
        }
    }

    fn run(&self, statements: &[Compiled]) -> Result<()> {
        for compiled in statements {
            tracing::debug!(sql = %compiled.sql, params = compiled.params.len(), "executing statement");

            let mut stmt = self
                .connection
                .prepare_cached(&compiled.sql)
                .map_err(Error::driver)?;

            stmt.execute(rusqlite::params_from_iter(compiled.params.iter().map(Param)))
                .map_err(Error::driver)?;
        }

        Ok(())
    }

    fn query(&self, compiled: &Compiled) -> Result<Vec<Row>> {
        tracing::debug!(sql = %compiled.sql, params = compiled.params.len(), "executing query");

        let mut stmt = self
            .connection
            .prepare_cached(&compiled.sql)
            .map_err(Error::driver)?;

        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt
            .query(rusqlite::params_from_iter(compiled.params.iter().map(Param)))
            .map_err(Error::driver)?;

        let mut ret = vec![];

        while let Some(row) = rows.next().map_err(Error::driver)? {
            let mut record = Row::new();

            for (index, name) in names.iter().enumerate() {
                let value = row.get_ref(index).map_err(Error::driver)?;
                record.insert(name.clone(), value::from_sql(value)?);
            }

            ret.push(record);
        }

        Ok(ret)
    }
}

fn single(statements: &[Compiled]) -> Result<&Compiled> {
    match statements {
        [compiled] => Ok(compiled),
        _ => bail!("expected a single statement, got {}", statements.len()),
    }
}

#[async_trait]
impl driver::Connection for Connection {
    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn execute(&mut self, query: &Query, variables: Option<&Variables>) -> Result<Response> {
        self.exec(query, variables)
    }

    async fn transaction<'a>(&'a mut self) -> Result<Box<dyn driver::Transaction + 'a>> {
        self.connection
            .execute_batch("BEGIN")
            .map_err(Error::driver)?;

        Ok(Box::new(Transaction {
            connection: self,
            open: true,
        }))
    }

    fn compare_types(
        &self,
        from: ColumnType,
        _from_size: Option<u32>,
        to: ColumnType,
        _to_size: Option<u32>,
    ) -> Compatibility {
        // SQLite does not enforce sizes, and stores values by the affinity
        // of the declared type.
        if Affinity::of(from) == Affinity::of(to) {
            Compatibility::Castable
        } else {
            Compatibility::Different
        }
    }
}

/// A transaction on a SQLite connection. Rolled back when dropped without a
/// commit.
#[derive(Debug)]
pub struct Transaction<'a> {
    connection: &'a mut Connection,

    /// False once committed or rolled back.
    open: bool,
}

impl Transaction<'_> {
    fn finish(&mut self, sql: &str) -> Result<()> {
        self.open = false;
        tracing::debug!(sql, "finishing transaction");
        self.connection
            .connection
            .execute_batch(sql)
            .map_err(Error::driver)
    }
}

#[async_trait]
impl<'a> driver::Transaction for Transaction<'a> {
    async fn execute(&mut self, query: &Query, variables: Option<&Variables>) -> Result<Response> {
        self.connection.exec(query, variables)
    }

    async fn commit(mut self: Box<Self>) -> Result<()> {
        self.finish("COMMIT")
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        self.finish("ROLLBACK")
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.open {
            if let Err(err) = self.finish("ROLLBACK") {
                tracing::warn!(error = %err, "failed to roll back dropped transaction");
            }
        }
    }
}

/// Storage class preference of a declared type, see
/// <https://www.sqlite.org/datatype3.html#determination_of_column_affinity>
#[derive(Debug, PartialEq, Eq)]
enum Affinity {
    Integer,
    Text,
    Blob,
    Real,
    Numeric,
}

impl Affinity {
    fn of(ty: ColumnType) -> Affinity {
        match ty {
            ColumnType::Int | ColumnType::UInt => Affinity::Integer,
            ColumnType::Text => Affinity::Text,
            ColumnType::Blob => Affinity::Blob,
            ColumnType::Float => Affinity::Real,
            ColumnType::Boolean | ColumnType::Bit | ColumnType::Date | ColumnType::DateTime => {
                Affinity::Numeric
            }
        }
    }
}
