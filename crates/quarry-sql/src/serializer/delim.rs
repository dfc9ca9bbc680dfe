use super::{Formatter, Params, ToSql};

use quarry_core::Result;

/// Comma delimited
pub(super) struct Comma<L>(pub(super) L);

pub(super) struct Delimited<L>(pub(super) L, pub(super) &'static str);

impl<L> ToSql for Comma<L>
where
    L: IntoIterator,
    L::Item: ToSql,
{
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        Delimited(self.0, ", ").to_sql(f)
    }
}

impl<L> ToSql for Delimited<L>
where
    L: IntoIterator,
    L::Item: ToSql,
{
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let mut s = "";
        for i in self.0 {
            fmt!(f, s i)?;
            s = self.1;
        }
        Ok(())
    }
}
