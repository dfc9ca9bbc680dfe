mod capability;
pub use capability::{Capability, SchemaMutations};

mod response;
pub use response::{Response, Row};

use crate::{
    async_trait,
    schema::Compatibility,
    stmt::{ColumnType, Query, Variables},
    Result,
};

use std::{borrow::Cow, fmt::Debug};

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Returns the URL this driver connects to.
    fn url(&self) -> Cow<'_, str>;

    /// Describes the driver's capability, which informs the query planner and
    /// the migrator.
    fn capability(&self) -> &'static Capability;

    /// Opens a new connection to the backend.
    async fn connect(&self) -> Result<Box<dyn Connection>>;
}

#[async_trait]
pub trait Connection: Debug + Send + 'static {
    fn capability(&self) -> &'static Capability;

    /// Executes a single query, substituting `variables` into it.
    async fn execute(&mut self, query: &Query, variables: Option<&Variables>) -> Result<Response>;

    /// Starts a transaction. Queries run through the returned handle are
    /// applied atomically once it is committed.
    async fn transaction<'a>(&'a mut self) -> Result<Box<dyn Transaction + 'a>>;

    /// Decides whether a column of type `from` can hold the data of a column
    /// of type `to` without a schema change. Used when diffing schemas.
    fn compare_types(
        &self,
        from: ColumnType,
        from_size: Option<u32>,
        to: ColumnType,
        to_size: Option<u32>,
    ) -> Compatibility {
        Compatibility::strict(from, from_size, to, to_size)
    }
}

#[async_trait]
pub trait Transaction: Send {
    async fn execute(&mut self, query: &Query, variables: Option<&Variables>) -> Result<Response>;

    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}
