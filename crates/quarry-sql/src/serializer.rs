#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Delimited};

mod flavor;
use flavor::Flavor;

mod ident;
use ident::{Ident, IndexName};

mod params;
pub use params::{Params, Placeholder};

// Fragment serializers
mod column_def;
mod expr;
mod statement;
mod ty;
mod value;

use crate::stmt::Statement;

use quarry_core::{
    driver::Capability,
    stmt::{Query, Value, Variables},
    Result,
};

/// A SQL string and the values bound to its placeholders, in placeholder
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Serialize a statement to a SQL string
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    /// The database flavor handles the differences between SQL dialects and
    /// supported features.
    flavor: Flavor,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,

    /// Values for the query's variables
    variables: Option<&'a Variables>,
}

impl Serializer {
    /// Compiles `query` into one or more statements, each with its own
    /// parameter list.
    pub fn compile(&self, query: &Query, variables: Option<&Variables>) -> Result<Vec<Compiled>> {
        Statement::lower(query, &self.capability().schema_mutations)?
            .iter()
            .map(|stmt| -> Result<Compiled> {
                let mut params = vec![];
                let sql = self.serialize(stmt, &mut params, variables)?;
                Ok(Compiled { sql, params })
            })
            .collect()
    }

    pub fn serialize(
        &self,
        stmt: &Statement<'_>,
        params: &mut impl Params,
        variables: Option<&Variables>,
    ) -> Result<String> {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
            variables,
        };

        stmt.to_sql(&mut fmt)?;

        ret.push(';');
        Ok(ret)
    }

    /// The capability of the backend this serializer targets.
    pub fn capability(&self) -> &'static Capability {
        match self.flavor {
            Flavor::Postgresql => &Capability::POSTGRESQL,
            Flavor::Sqlite => &Capability::SQLITE,
        }
    }

    fn is_sqlite(&self) -> bool {
        matches!(self.flavor, Flavor::Sqlite)
    }
}
