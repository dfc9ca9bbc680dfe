//! An in-memory key-value backend.
//!
//! The store cannot evaluate `or` or joins natively. Selects go through the
//! decomposition planner, which splits OR filters into branches that are
//! fetched by primary key or scanned, then merged.

mod select;

mod store;
use store::Store;

use quarry_core::{
    async_trait,
    driver::{self, Capability, Response},
    stmt::{Query, Variables},
    Error, Result,
};
use std::{borrow::Cow, sync::Arc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use url::Url;

/// Connections made by the same driver share one store.
#[derive(Debug, Default, Clone)]
pub struct Memory {
    store: Arc<Mutex<Store>>,
}

impl Memory {
    /// Create a new memory driver from a `memory://` connection URL.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(|err| {
            Error::invalid_connection_url(format!("{err}; url={url_str}"))
        })?;

        if url.scheme() != "memory" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `memory` scheme; url={url_str}"
            )));
        }

        Ok(Self::default())
    }
}

#[async_trait]
impl driver::Driver for Memory {
    fn url(&self) -> Cow<'_, str> {
        Cow::Borrowed("memory://")
    }

    fn capability(&self) -> &'static Capability {
        &Capability::MEMORY
    }

    async fn connect(&self) -> Result<Box<dyn driver::Connection>> {
        Ok(Box::new(Connection {
            store: self.store.clone(),
        }))
    }
}

#[derive(Debug)]
pub struct Connection {
    store: Arc<Mutex<Store>>,
}

#[async_trait]
impl driver::Connection for Connection {
    fn capability(&self) -> &'static Capability {
        &Capability::MEMORY
    }

    async fn execute(&mut self, query: &Query, variables: Option<&Variables>) -> Result<Response> {
        self.store.lock().await.execute(query, variables)
    }

    /// Holds the store's lock until the transaction ends, so other
    /// connections wait for it.
    async fn transaction<'a>(&'a mut self) -> Result<Box<dyn driver::Transaction + 'a>> {
        let store = self.store.clone().lock_owned().await;
        let snapshot = Store::clone(&store);

        Ok(Box::new(Transaction {
            store,
            snapshot: Some(snapshot),
        }))
    }
}

/// Writes go straight to the store; rolling back restores the snapshot taken
/// when the transaction started. Dropping an open transaction rolls it back.
#[derive(Debug)]
pub struct Transaction {
    store: OwnedMutexGuard<Store>,

    /// `None` once committed or rolled back.
    snapshot: Option<Store>,
}

impl Transaction {
    fn restore(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.store = snapshot;
        }
    }
}

#[async_trait]
impl driver::Transaction for Transaction {
    async fn execute(&mut self, query: &Query, variables: Option<&Variables>) -> Result<Response> {
        self.store.execute(query, variables)
    }

    async fn commit(mut self: Box<Self>) -> Result<()> {
        self.snapshot = None;
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        self.restore();
        Ok(())
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        self.restore();
    }
}
