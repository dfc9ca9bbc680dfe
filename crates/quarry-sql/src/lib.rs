pub mod serializer;
pub use serializer::{Compiled, Params, Placeholder, Serializer};

pub mod stmt;
pub use stmt::Statement;

use quarry_core::{
    stmt::{Query, Variables},
    Result,
};

/// Compiles `query` to SQLite statements.
///
/// Shorthand for `Serializer::sqlite().compile(query, variables)`.
pub fn compile(query: &Query, variables: Option<&Variables>) -> Result<Vec<Compiled>> {
    Serializer::sqlite().compile(query, variables)
}
