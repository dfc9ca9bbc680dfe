use super::{value::Literal, Flavor, Formatter, Ident, Params, ToSql};

use quarry_core::{stmt::Column, Result};

impl ToSql for &Column {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let name = Ident(&self.name);

        if self.auto_increment {
            // The auto-increment column is always the whole primary key
            return match f.serializer.flavor {
                Flavor::Sqlite => fmt!(f, name " INTEGER PRIMARY KEY AUTOINCREMENT"),
                Flavor::Postgresql => {
                    fmt!(f, name " BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY")
                }
            };
        }

        let default = self.default.as_ref().map(|value| (" DEFAULT ", Literal(value)));

        fmt!(f, name " " super::ty::Type(self.ty, self.size) default)
    }
}
