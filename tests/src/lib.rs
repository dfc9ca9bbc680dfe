#[macro_use]
mod macros;

pub mod db;

mod logging_driver;
pub use logging_driver::{LoggingDriver, QueryLog};

use quarry_core::{
    driver::{Capability, Connection, Driver, Response, Row},
    schema::{self, Compatibility, SchemaDiff},
    stmt::{ColumnType, Query},
    Migrator, Result, Schema,
};

/// Namespace every test collection lives in.
pub const NAMESPACE: &str = "app";

pub trait Setup: Send + Sync + 'static {
    fn driver(&self) -> Box<dyn Driver>;
}

/// One connection to a fresh backend, with every query it runs logged.
pub struct DbTest {
    capability: &'static Capability,
    connection: Box<dyn Connection>,
    log: QueryLog,
    migrator: Migrator,
}

impl DbTest {
    pub async fn new(setup: impl Setup) -> DbTest {
        let driver = LoggingDriver::new(setup.driver());
        let log = driver.log_handle();
        let connection = driver.connect().await.unwrap();

        DbTest {
            capability: driver.capability(),
            connection,
            log,
            migrator: Migrator::new(),
        }
    }

    pub fn capability(&self) -> &'static Capability {
        self.capability
    }

    pub fn connection(&mut self) -> &mut dyn Connection {
        &mut *self.connection
    }

    pub async fn exec(&mut self, query: impl Into<Query>) -> Response {
        self.connection.execute(&query.into(), None).await.unwrap()
    }

    pub async fn rows(&mut self, query: impl Into<Query>) -> Vec<Row> {
        self.exec(query).await.into_rows().unwrap()
    }

    /// The live schema of [`NAMESPACE`].
    pub async fn introspect(&mut self) -> Schema {
        Schema::introspect(&mut *self.connection, Some(NAMESPACE))
            .await
            .unwrap()
    }

    pub fn compare_types(
        &self,
        from: ColumnType,
        from_size: Option<u32>,
        to: ColumnType,
        to_size: Option<u32>,
    ) -> Compatibility {
        self.connection.compare_types(from, from_size, to, to_size)
    }

    /// Diffs two schemas using the backend's type comparison.
    pub fn diff(&self, source: &Schema, target: &Schema) -> Vec<SchemaDiff> {
        schema::diff(source, target, |from, from_size, to, to_size| {
            self.compare_types(from, from_size, to, to_size)
        })
    }

    pub async fn migrate(&mut self, source: &Schema, diffs: &[SchemaDiff]) -> Result<()> {
        self.migrator
            .migrate(&mut *self.connection, source, diffs)
            .await
    }

    /// Brings the backend to `target` from whatever it currently holds.
    pub async fn migrate_to(&mut self, target: &Schema) {
        let live = self.introspect().await;
        let diffs = self.diff(&live, target);
        self.migrate(&live, &diffs).await.unwrap();
    }

    /// Returns the queries run so far and clears the log.
    pub fn take_log(&self) -> Vec<Query> {
        std::mem::take(&mut *self.log.lock().expect("Failed to acquire query log lock"))
    }
}
