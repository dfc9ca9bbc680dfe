use quarry_core::driver::{Capability, Response, Transaction};
use quarry_core::schema::{diff, CollectionSchema, Compatibility, FieldSchema, Schema};
use quarry_core::stmt::{ColumnType, Query, Variables};
use quarry_core::{async_trait, err, Connection, Error, Migrator, Result};

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// A connection whose transactions fail every statement, optionally failing
/// the rollback too.
#[derive(Debug, Default)]
struct Failing {
    rollback_fails: bool,
    rollbacks: Arc<AtomicUsize>,
}

struct FailingTransaction {
    rollback_fails: bool,
    rollbacks: Arc<AtomicUsize>,
}

#[async_trait]
impl Connection for Failing {
    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn execute(&mut self, _: &Query, _: Option<&Variables>) -> Result<Response> {
        Ok(Response::Acknowledged)
    }

    async fn transaction<'a>(&'a mut self) -> Result<Box<dyn Transaction + 'a>> {
        Ok(Box::new(FailingTransaction {
            rollback_fails: self.rollback_fails,
            rollbacks: self.rollbacks.clone(),
        }))
    }
}

#[async_trait]
impl Transaction for FailingTransaction {
    async fn execute(&mut self, _: &Query, _: Option<&Variables>) -> Result<Response> {
        Err(Error::query_syntax("table already exists"))
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        if self.rollback_fails {
            return Err(err!("connection lost"));
        }
        Ok(())
    }
}

fn strict(
    from: ColumnType,
    from_size: Option<u32>,
    to: ColumnType,
    to_size: Option<u32>,
) -> Compatibility {
    Compatibility::strict(from, from_size, to, to_size)
}

async fn migrate(connection: &mut Failing) -> Result<()> {
    let source = Schema::default();
    let target = Schema {
        namespace: None,
        collections: vec![CollectionSchema::new("users")
            .field(FieldSchema::new("id", ColumnType::Int).auto_increment())],
    };

    let diffs = diff(&source, &target, strict);
    Migrator::new().migrate(connection, &source, &diffs).await
}

#[tokio::test]
async fn failed_statement_rolls_back() {
    let mut connection = Failing::default();

    let err = migrate(&mut connection).await.unwrap_err();
    assert!(err.is_query_syntax());
    assert_eq!(connection.rollbacks.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_rollback_keeps_the_statement_error() {
    let mut connection = Failing {
        rollback_fails: true,
        ..Failing::default()
    };

    let err = migrate(&mut connection).await.unwrap_err();
    assert!(err.is_query_syntax());
    assert!(!err.to_string().contains("connection lost"));
    assert_eq!(connection.rollbacks.load(Ordering::SeqCst), 1);
}
