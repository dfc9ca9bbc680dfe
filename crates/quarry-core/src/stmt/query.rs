use super::{
    Aggregate, AlterCollection, Collection, CollectionExists, CreateCollection, Delete,
    DescribeCollection, DropCollection, Insert, Select, ShowCollection, Union, Update,
};

/// Every query shape a backend can be asked to run.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Select(Select),
    Aggregate(Aggregate),
    Union(Union),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
    CreateCollection(CreateCollection),
    AlterCollection(AlterCollection),
    DropCollection(DropCollection),
    DescribeCollection(DescribeCollection),
    CollectionExists(CollectionExists),
    ShowCollection(ShowCollection),
}

impl Query {
    /// True for statements that read rows.
    pub fn is_read(&self) -> bool {
        matches!(self, Self::Select(_) | Self::Aggregate(_) | Self::Union(_))
    }

    /// True for statements that change the shape of a collection.
    pub fn is_ddl(&self) -> bool {
        matches!(
            self,
            Self::CreateCollection(_) | Self::AlterCollection(_) | Self::DropCollection(_)
        )
    }

    /// The collection the query targets, if it targets exactly one.
    pub fn collection(&self) -> Option<&Collection> {
        match self {
            Self::Select(select) => select.collection.as_ref(),
            Self::Aggregate(aggregate) => aggregate.select.collection.as_ref(),
            Self::Union(_) | Self::ShowCollection(_) => None,
            Self::Insert(insert) => Some(&insert.collection),
            Self::Update(update) => Some(&update.collection),
            Self::Delete(delete) => Some(&delete.collection),
            Self::CreateCollection(create) => Some(&create.collection),
            Self::AlterCollection(alter) => Some(&alter.collection),
            Self::DropCollection(drop) => Some(&drop.collection),
            Self::DescribeCollection(describe) => Some(&describe.collection),
            Self::CollectionExists(exists) => Some(&exists.collection),
        }
    }

    pub fn as_select(&self) -> Option<&Select> {
        match self {
            Self::Select(select) => Some(select),
            _ => None,
        }
    }
}

macro_rules! impl_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Query {
                fn from(value: $variant) -> Self {
                    Query::$variant(value)
                }
            }
        )*
    };
}

impl_from!(
    Select,
    Aggregate,
    Union,
    Insert,
    Update,
    Delete,
    CreateCollection,
    AlterCollection,
    DropCollection,
    DescribeCollection,
    CollectionExists,
    ShowCollection
);
