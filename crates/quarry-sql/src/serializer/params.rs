use super::{Flavor, Formatter, ToSql};

use quarry_core::{stmt::Value, Result};

pub trait Params {
    fn push(&mut self, param: &Value) -> Placeholder;
}

/// One-based position of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder(pub usize);

impl Params for Vec<Value> {
    fn push(&mut self, value: &Value) -> Placeholder {
        self.push(value.clone());
        Placeholder(self.len())
    }
}

impl ToSql for Placeholder {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let prefix = match f.serializer.flavor {
            Flavor::Postgresql => '$',
            Flavor::Sqlite => '?',
        };

        f.dst.push(prefix);
        f.dst.push_str(&self.0.to_string());
        Ok(())
    }
}
