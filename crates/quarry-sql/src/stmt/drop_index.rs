use super::Statement;

use quarry_core::stmt::Collection;

#[derive(Debug, Clone)]
pub struct DropIndex<'a> {
    /// Table the index was created on. Index names are scoped to it.
    pub on: &'a Collection,

    /// Logical index name
    pub name: &'a str,
}

impl<'a> Statement<'a> {
    pub fn drop_index(on: &'a Collection, name: &'a str) -> Self {
        DropIndex { on, name }.into()
    }
}

impl<'a> From<DropIndex<'a>> for Statement<'a> {
    fn from(value: DropIndex<'a>) -> Self {
        Self::DropIndex(value)
    }
}
