use super::Statement;

use quarry_core::stmt::{Collection, Column};

/// A statement to alter a SQL table.
#[derive(Debug, Clone)]
pub struct AlterTable<'a> {
    /// Current name of the table.
    pub table: &'a Collection,

    /// The alteration to apply.
    pub action: AlterTableAction<'a>,
}

/// The action to perform in an ALTER TABLE statement.
#[derive(Debug, Clone)]
pub enum AlterTableAction<'a> {
    /// Rename the table to a new name.
    RenameTo(&'a Collection),

    AddColumn(&'a Column),

    RenameColumn { from: &'a str, to: &'a str },

    /// Set the type and default of the column named `column.name`.
    AlterColumn(&'a Column),

    DropColumn(&'a str),
}

impl<'a> Statement<'a> {
    pub fn alter_table(table: &'a Collection, action: AlterTableAction<'a>) -> Self {
        AlterTable { table, action }.into()
    }
}

impl<'a> From<AlterTable<'a>> for Statement<'a> {
    fn from(value: AlterTable<'a>) -> Self {
        Self::AlterTable(value)
    }
}
