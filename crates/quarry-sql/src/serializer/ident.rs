use super::{Formatter, Params, ToSql};

use quarry_core::{stmt::Collection, Result};

/// A double-quoted identifier.
pub(super) struct Ident<S>(pub(super) S);

/// Physical name of a secondary index: the table identifier and the index
/// name joined by an underscore.
pub(super) struct IndexName<'a>(pub(super) &'a Collection, pub(super) &'a str);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        f.dst.push('"');
        for c in self.0.as_ref().chars() {
            if c == '"' {
                f.dst.push('"');
            }
            f.dst.push(c);
        }
        f.dst.push('"');
        Ok(())
    }
}

impl ToSql for &Collection {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        Ident(self.ident()).to_sql(f)
    }
}

impl ToSql for IndexName<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        Ident(format!("{}_{}", self.0.ident(), self.1)).to_sql(f)
    }
}
