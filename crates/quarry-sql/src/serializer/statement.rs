use super::{value::Literal, Comma, Flavor, Formatter, Ident, IndexName, Params, ToSql};

use crate::stmt::{AlterTable, AlterTableAction, CreateIndex, DropIndex, Statement};

use quarry_core::{
    stmt::{
        Aggregate, Collection, Column, CreateCollection, Delete, Field, Insert, InsertSource, JoinKind,
        Query, Select, Union, Update, Value,
    },
    Error, Result,
};

impl ToSql for &Statement<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        match self {
            Statement::Select(select) => SelectBody::plain(select).to_sql(f),
            Statement::Aggregate(aggregate) => SelectBody::aggregate(aggregate).to_sql(f),
            Statement::Union(union) => union.to_sql(f),
            Statement::Insert(insert) => insert.to_sql(f),
            Statement::Update(update) => update.to_sql(f),
            Statement::Delete(delete) => delete.to_sql(f),
            Statement::CreateTable(create) => create.to_sql(f),
            Statement::CreateIndex(create) => create.to_sql(f),
            Statement::AlterTable(alter) => alter.to_sql(f),
            Statement::DropTable(table) => drop_table(f, table),
            Statement::DropIndex(drop) => drop.to_sql(f),
            Statement::TableExists(table) => table_exists(f, table),
            Statement::ShowTables(namespace) => show_tables(f, *namespace),
        }
    }
}

/// The body of a select or an aggregate: everything from `SELECT` through
/// `LIMIT`.
struct SelectBody<'a> {
    select: &'a Select,
    group_by: &'a [Field],
}

impl<'a> SelectBody<'a> {
    fn plain(select: &'a Select) -> SelectBody<'a> {
        SelectBody {
            select,
            group_by: &[],
        }
    }

    fn aggregate(aggregate: &'a Aggregate) -> SelectBody<'a> {
        SelectBody {
            select: &aggregate.select,
            group_by: &aggregate.group_by,
        }
    }
}

impl ToSql for SelectBody<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let select = self.select;
        let collection = select.collection()?;

        if select.fields.is_empty() {
            fmt!(f, "SELECT * FROM " collection)?;
        } else {
            fmt!(f, "SELECT " Comma(&select.fields) " FROM " collection)?;
        }

        for join in &select.joins {
            let kind = match join.kind {
                JoinKind::Inner => " INNER JOIN (",
                JoinKind::Left => " LEFT JOIN (",
            };

            // The joined query is emitted first so its parameters come first
            let on = &join.on;
            fmt!(f, kind Subquery(&join.query) ") AS " Ident(&join.alias) " ON " on)?;
        }

        let filter = select.filter.as_ref().map(|filter| (" WHERE ", filter));
        let group_by = (!self.group_by.is_empty()).then(|| (" GROUP BY ", Comma(self.group_by)));
        let sort = (!select.sort.is_empty()).then(|| (" ORDER BY ", Comma(&select.sort)));

        fmt!(f, filter group_by sort Window(select.offset, select.limit))
    }
}

/// A read query nested inside another statement.
struct Subquery<'a>(&'a Query);

impl ToSql for Subquery<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        match self.0 {
            Query::Select(select) => SelectBody::plain(select).to_sql(f),
            Query::Aggregate(aggregate) => SelectBody::aggregate(aggregate).to_sql(f),
            Query::Union(union) => union.to_sql(f),
            query => Err(Error::query_syntax(format!(
                "only reads can be joined, found {query:?}"
            ))),
        }
    }
}

/// `LIMIT` and `OFFSET`.
struct Window(Option<u64>, Option<u64>);

impl ToSql for Window {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let Window(offset, limit) = self;

        match (limit, offset) {
            (Some(limit), offset) => {
                fmt!(f, " LIMIT " limit offset.map(|offset| (" OFFSET ", offset)))
            }
            // SQLite only accepts OFFSET after a LIMIT
            (None, Some(offset)) if f.serializer.is_sqlite() => {
                fmt!(f, " LIMIT -1 OFFSET " offset)
            }
            (None, Some(offset)) => fmt!(f, " OFFSET " offset),
            (None, None) => Ok(()),
        }
    }
}

impl ToSql for &Union {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        if self.selects.is_empty() {
            return Err(Error::query_syntax("union requires at least one select"));
        }

        for (i, select) in self.selects.iter().enumerate() {
            if i > 0 {
                fmt!(f, " UNION ")?;
            }

            // Compound members cannot carry their own ORDER BY or LIMIT
            if select.is_windowed() {
                let alias = Ident(format!("_u{i}"));
                fmt!(f, "SELECT * FROM (" SelectBody::plain(select) ") AS " alias)?;
            } else {
                SelectBody::plain(select).to_sql(f)?;
            }
        }

        let sort = (!self.sort.is_empty()).then(|| (" ORDER BY ", Comma(&self.sort)));

        fmt!(f, sort Window(self.offset, self.limit))
    }
}

impl ToSql for &Insert {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let table = &self.collection;
        fmt!(f, "INSERT INTO " table)?;

        match &self.source {
            InsertSource::Values(rows) if self.fields.is_empty() => match &rows[..] {
                [row] if row.is_empty() => fmt!(f, " DEFAULT VALUES"),
                _ => Err(Error::query_syntax(format!(
                    "insert into `{}` without fields can only insert a single default row",
                    self.collection
                ))),
            },
            InsertSource::Values(rows) => {
                let rows = rows.iter().map(|row| ("(", Comma(row), ")"));
                fmt!(f, " (" Comma(&self.fields) ") VALUES " Comma(rows))
            }
            InsertSource::Select(select) => {
                let fields = (!self.fields.is_empty()).then(|| (" (", Comma(&self.fields), ")"));
                fmt!(f, fields " " SelectBody::plain(select))
            }
        }
    }
}

impl ToSql for &Update {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        if self.assignments.is_empty() {
            return Err(Error::query_syntax(format!(
                "update of `{}` assigns no fields",
                self.collection
            )));
        }

        let assignments = self
            .assignments
            .iter()
            .map(|(field, value)| (Ident(field), " = ", value));
        let filter = self.filter.as_ref().map(|filter| (" WHERE ", filter));

        let table = &self.collection;
        fmt!(f, "UPDATE " table " SET " Comma(assignments) filter)
    }
}

impl ToSql for &Delete {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let filter = self.filter.as_ref().map(|filter| (" WHERE ", filter));
        let table = &self.collection;
        fmt!(f, "DELETE FROM " table filter)
    }
}

impl ToSql for &CreateCollection {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let table = &self.collection;
        fmt!(f, "CREATE TABLE " table " (" Comma(&self.columns))?;

        // An auto-increment column declares the primary key inline
        if self.auto_increment_column().is_none() {
            if let Some(primary) = self.primary_index() {
                let columns = primary.columns.iter().map(|column| Ident(&column.field.name));
                fmt!(f, ", PRIMARY KEY (" Comma(columns) ")")?;
            }
        }

        fmt!(f, ")")
    }
}

impl ToSql for &CreateIndex<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let index = self.index;
        let name = IndexName(self.on, &index.name);
        let unique = if index.ty.is_unique() { "UNIQUE " } else { "" };

        fmt!(f, "CREATE " unique "INDEX " name " ON " self.on " (" Comma(&index.columns) ")")
    }
}

impl ToSql for &DropIndex<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        fmt!(f, "DROP INDEX " IndexName(self.on, self.name))
    }
}

impl ToSql for &AlterTable<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) -> Result<()> {
        let table = self.table;

        match &self.action {
            AlterTableAction::RenameTo(to) => {
                let to: &Collection = to;
                fmt!(f, "ALTER TABLE " table " RENAME TO " to)
            }
            AlterTableAction::AddColumn(column) if column.auto_increment => {
                Err(Error::query_not_supported(format!(
                    "cannot add auto-increment column `{}` to existing table `{table}`",
                    column.name
                )))
            }
            AlterTableAction::AddColumn(column) => {
                let column: &Column = column;
                fmt!(f, "ALTER TABLE " table " ADD COLUMN " column)
            }
            AlterTableAction::RenameColumn { from, to } => {
                fmt!(f, "ALTER TABLE " table " RENAME COLUMN " Ident(from) " TO " Ident(to))
            }
            AlterTableAction::AlterColumn(column) => {
                if f.serializer.flavor != Flavor::Postgresql {
                    return Err(Error::query_not_supported(format!(
                        "SQLite cannot redefine column `{}` of `{table}` in place",
                        column.name
                    )));
                }

                let name = Ident(&column.name);
                let ty = super::ty::Type(column.ty, column.size);

                fmt!(f, "ALTER TABLE " table " ALTER COLUMN " name " TYPE " ty)?;

                let name = Ident(&column.name);
                match &column.default {
                    Some(value) => {
                        fmt!(f, ", ALTER COLUMN " name " SET DEFAULT " Literal(value))
                    }
                    None => fmt!(f, ", ALTER COLUMN " name " DROP DEFAULT"),
                }
            }
            AlterTableAction::DropColumn(name) => {
                fmt!(f, "ALTER TABLE " table " DROP COLUMN " Ident(name))
            }
        }
    }
}

fn drop_table<P: Params>(f: &mut Formatter<'_, P>, table: &Collection) -> Result<()> {
    fmt!(f, "DROP TABLE " table)
}

fn table_exists<P: Params>(f: &mut Formatter<'_, P>, table: &Collection) -> Result<()> {
    let name = &Value::String(table.ident());

    match f.serializer.flavor {
        Flavor::Sqlite => fmt!(
            f,
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = " name
        ),
        Flavor::Postgresql => fmt!(
            f,
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = current_schema() AND table_name = " name
        ),
    }
}

fn show_tables<P: Params>(f: &mut Formatter<'_, P>, namespace: Option<&str>) -> Result<()> {
    match f.serializer.flavor {
        Flavor::Sqlite => fmt!(
            f,
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\'"
        )?,
        Flavor::Postgresql => fmt!(
            f,
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = current_schema()"
        )?,
    }

    let Some(namespace) = namespace else {
        return fmt!(f, " ORDER BY 1");
    };

    let mut pattern = String::new();
    for c in namespace.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push_str("\\_%");

    let column = if f.serializer.is_sqlite() { "name" } else { "table_name" };
    let pattern = &Value::String(pattern);

    fmt!(f, " AND " column " LIKE " pattern " ESCAPE '\\' ORDER BY 1")
}
