use super::{Formatter, Params};

use quarry_core::Result;

/// Serializes each fragment in turn, returning early on the first error.
/// Evaluates to `Ok(())`.
macro_rules! fmt {
    ($f:expr, $( $fragments:expr )*) => {{
        $(
            $fragments.to_sql($f)?;
        )*
        Ok::<(), quarry_core::Error>(())
    }};
}

pub(super) trait ToSql {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()>;
}

impl ToSql for &str {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        f.dst.push_str(self);
        Ok(())
    }
}

impl ToSql for &String {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        f.dst.push_str(self);
        Ok(())
    }
}

impl ToSql for u64 {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        f.dst.push_str(&self.to_string());
        Ok(())
    }
}

impl<T: ToSql> ToSql for Option<T> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        match self {
            Some(fragment) => fragment.to_sql(f),
            None => Ok(()),
        }
    }
}

impl<T1: ToSql, T2: ToSql> ToSql for (T1, T2) {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        fmt!(f, self.0 self.1)
    }
}

impl<T1: ToSql, T2: ToSql, T3: ToSql> ToSql for (T1, T2, T3) {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        fmt!(f, self.0 self.1 self.2)
    }
}
