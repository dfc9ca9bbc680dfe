use super::Collection;

/// Reads back the columns and indexes of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct DescribeCollection {
    pub collection: Collection,
}

/// Checks whether a collection exists.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionExists {
    pub collection: Collection,
}

/// Lists the collections in a namespace, or every collection when no
/// namespace is given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowCollection {
    pub namespace: Option<String>,
}

impl DescribeCollection {
    pub fn new(collection: impl Into<Collection>) -> DescribeCollection {
        DescribeCollection {
            collection: collection.into(),
        }
    }
}

impl CollectionExists {
    pub fn new(collection: impl Into<Collection>) -> CollectionExists {
        CollectionExists {
            collection: collection.into(),
        }
    }
}

impl ShowCollection {
    pub fn new(namespace: Option<&str>) -> ShowCollection {
        ShowCollection {
            namespace: namespace.map(str::to_string),
        }
    }
}
