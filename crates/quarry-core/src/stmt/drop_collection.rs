use super::Collection;

#[derive(Debug, Clone, PartialEq)]
pub struct DropCollection {
    pub collection: Collection,
}

impl DropCollection {
    pub fn new(collection: impl Into<Collection>) -> DropCollection {
        DropCollection {
            collection: collection.into(),
        }
    }
}
