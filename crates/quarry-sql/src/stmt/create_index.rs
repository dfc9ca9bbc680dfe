use super::Statement;

use quarry_core::stmt::{Collection, Index};

#[derive(Debug, Clone)]
pub struct CreateIndex<'a> {
    /// Which table to index
    pub on: &'a Collection,

    pub index: &'a Index,
}

impl<'a> Statement<'a> {
    pub fn create_index(on: &'a Collection, index: &'a Index) -> Self {
        CreateIndex { on, index }.into()
    }
}

impl<'a> From<CreateIndex<'a>> for Statement<'a> {
    fn from(value: CreateIndex<'a>) -> Self {
        Self::CreateIndex(value)
    }
}
