use quarry_core::driver::Driver;
use quarry_driver_sqlite::Sqlite;

use crate::Setup;

pub struct SetupSqlite;

impl Setup for SetupSqlite {
    fn driver(&self) -> Box<dyn Driver> {
        Box::new(Sqlite::in_memory())
    }
}
