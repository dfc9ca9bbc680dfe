mod alter_table;
pub use alter_table::{AlterTable, AlterTableAction};

mod create_index;
pub use create_index::CreateIndex;

mod drop_index;
pub use drop_index::DropIndex;

use quarry_core::{
    driver::SchemaMutations,
    stmt::{
        Aggregate, Change, Collection, CreateCollection, Delete, Insert, Query, Select, Union,
        Update,
    },
    Error, Result,
};

/// A single SQL statement.
///
/// Some queries need more than one statement: a create with secondary
/// indexes, or an alter carrying several changes. [`Statement::lower`]
/// performs that split.
#[derive(Debug, Clone)]
pub enum Statement<'a> {
    Select(&'a Select),
    Aggregate(&'a Aggregate),
    Union(&'a Union),
    Insert(&'a Insert),
    Update(&'a Update),
    Delete(&'a Delete),
    CreateTable(&'a CreateCollection),
    CreateIndex(CreateIndex<'a>),
    AlterTable(AlterTable<'a>),
    DropTable(&'a Collection),
    DropIndex(DropIndex<'a>),

    /// Counts the tables named like the collection.
    TableExists(&'a Collection),

    /// Lists table names, optionally restricted to a namespace.
    ShowTables(Option<&'a str>),
}

impl<'a> Statement<'a> {
    /// Splits `query` into the SQL statements that carry it out, in execution
    /// order.
    ///
    /// `mutations` tells whether the backend can redefine a column in place.
    /// When it cannot, an altered column may only change its name and the
    /// rest of its definition is taken to be unchanged.
    pub fn lower(query: &'a Query, mutations: &SchemaMutations) -> Result<Vec<Statement<'a>>> {
        Ok(match query {
            Query::Select(select) => vec![Statement::Select(select)],
            Query::Aggregate(aggregate) => vec![Statement::Aggregate(aggregate)],
            Query::Union(union) => vec![Statement::Union(union)],
            Query::Insert(insert) => {
                insert.validate()?;
                vec![Statement::Insert(insert)]
            }
            Query::Update(update) => vec![Statement::Update(update)],
            Query::Delete(delete) => vec![Statement::Delete(delete)],
            Query::CreateCollection(create) => {
                create.validate()?;

                let mut statements = vec![Statement::CreateTable(create)];
                statements.extend(
                    create
                        .secondary_indexes()
                        .map(|index| Statement::create_index(&create.collection, index)),
                );
                statements
            }
            Query::AlterCollection(alter) => {
                let mut statements = vec![];
                let table = alter.target();

                if let Some(to) = &alter.rename {
                    statements.push(Statement::alter_table(
                        &alter.collection,
                        AlterTableAction::RenameTo(to),
                    ));
                }

                for change in &alter.changes {
                    let statement = match change {
                        Change::AddColumn(column) => {
                            Statement::alter_table(table, AlterTableAction::AddColumn(column))
                        }
                        Change::AlterColumn { name, column } => {
                            let renamed = *name != column.name;

                            if !renamed && !mutations.alter_column {
                                return Err(Error::query_not_supported(format!(
                                    "column `{name}` of `{table}` cannot be redefined in place"
                                )));
                            }

                            if renamed {
                                statements.push(Statement::alter_table(
                                    table,
                                    AlterTableAction::RenameColumn {
                                        from: name,
                                        to: &column.name,
                                    },
                                ));
                            }

                            // Identity columns keep their type
                            if !mutations.alter_column || column.auto_increment {
                                continue;
                            }

                            Statement::alter_table(table, AlterTableAction::AlterColumn(column))
                        }
                        Change::DropColumn(name) => {
                            Statement::alter_table(table, AlterTableAction::DropColumn(name))
                        }
                        Change::AddIndex(index) if index.is_primary() => {
                            return Err(Error::query_not_supported(format!(
                                "cannot add primary index `{}` to existing table `{table}`",
                                index.name
                            )));
                        }
                        Change::AddIndex(index) => Statement::create_index(table, index),
                        Change::DropIndex(name) => Statement::drop_index(table, name),
                    };

                    statements.push(statement);
                }

                statements
            }
            Query::DropCollection(drop) => vec![Statement::DropTable(&drop.collection)],
            Query::CollectionExists(exists) => vec![Statement::TableExists(&exists.collection)],
            Query::ShowCollection(show) => vec![Statement::ShowTables(show.namespace.as_deref())],
            Query::DescribeCollection(describe) => {
                return Err(Error::query_not_supported(format!(
                    "describing `{}` has no portable SQL form; drivers introspect it directly",
                    describe.collection
                )));
            }
        })
    }
}
