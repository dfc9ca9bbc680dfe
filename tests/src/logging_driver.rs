use quarry_core::{
    async_trait,
    driver::{Capability, Connection, Driver, Response, Transaction},
    schema::Compatibility,
    stmt::{ColumnType, Query, Variables},
    Result,
};
use std::{
    borrow::Cow,
    sync::{Arc, Mutex},
};

/// Log of every query sent to the backend, including the ones run inside a
/// transaction.
pub type QueryLog = Arc<Mutex<Vec<Query>>>;

#[derive(Debug)]
pub struct LoggingDriver {
    inner: Box<dyn Driver>,
    log: QueryLog,
}

impl LoggingDriver {
    pub fn new(driver: Box<dyn Driver>) -> Self {
        Self {
            inner: driver,
            log: QueryLog::default(),
        }
    }

    /// Get a handle to access the query log
    pub fn log_handle(&self) -> QueryLog {
        self.log.clone()
    }
}

#[async_trait]
impl Driver for LoggingDriver {
    fn url(&self) -> Cow<'_, str> {
        self.inner.url()
    }

    fn capability(&self) -> &'static Capability {
        self.inner.capability()
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(LoggingConnection {
            inner: self.inner.connect().await?,
            log: self.log_handle(),
        }))
    }
}

#[derive(Debug)]
pub struct LoggingConnection {
    inner: Box<dyn Connection>,
    log: QueryLog,
}

fn record(log: &QueryLog, query: &Query) {
    log.lock()
        .expect("Failed to acquire query log lock")
        .push(query.clone());
}

#[async_trait]
impl Connection for LoggingConnection {
    fn capability(&self) -> &'static Capability {
        self.inner.capability()
    }

    async fn execute(&mut self, query: &Query, variables: Option<&Variables>) -> Result<Response> {
        record(&self.log, query);
        self.inner.execute(query, variables).await
    }

    async fn transaction<'a>(&'a mut self) -> Result<Box<dyn Transaction + 'a>> {
        let log = self.log.clone();
        let inner = self.inner.transaction().await?;
        Ok(Box::new(LoggingTransaction { inner, log }))
    }

    fn compare_types(
        &self,
        from: ColumnType,
        from_size: Option<u32>,
        to: ColumnType,
        to_size: Option<u32>,
    ) -> Compatibility {
        self.inner.compare_types(from, from_size, to, to_size)
    }
}

struct LoggingTransaction<'a> {
    inner: Box<dyn Transaction + 'a>,
    log: QueryLog,
}

#[async_trait]
impl<'a> Transaction for LoggingTransaction<'a> {
    async fn execute(&mut self, query: &Query, variables: Option<&Variables>) -> Result<Response> {
        record(&self.log, query);
        self.inner.execute(query, variables).await
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.inner.commit().await
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.inner.rollback().await
    }
}
