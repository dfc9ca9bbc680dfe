mod collection;
pub use collection::{CollectionSchema, FieldSchema, IndexFieldSchema, IndexSchema};

mod compare;
pub use compare::Compatibility;

mod diff;
pub use diff::{detect_collection_renames, diff, diff_with_hints, SchemaDiff};

mod rename_hints;
pub use rename_hints::RenameHints;

use crate::{
    driver::Connection,
    stmt::{self, Collection},
    Result,
};

/// The declared shape of every collection in a namespace.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schema {
    /// Prefix applied to every collection's backend identifier.
    #[cfg_attr(feature = "serde", serde(default))]
    pub namespace: Option<String>,

    pub collections: Vec<CollectionSchema>,
}

impl Schema {
    pub fn new(namespace: Option<&str>) -> Schema {
        Schema {
            namespace: namespace.map(str::to_string),
            collections: vec![],
        }
    }

    pub fn collection(&self, handle: &str) -> Option<&CollectionSchema> {
        self.collections
            .iter()
            .find(|collection| collection.handle == handle)
    }

    /// The collection reference for `handle` in this schema's namespace.
    pub fn collection_ref(&self, handle: &str) -> Collection {
        Collection::in_namespace(handle, self.namespace.as_deref())
    }

    /// Reads the live schema of `namespace` from a backend.
    pub async fn introspect(
        connection: &mut dyn Connection,
        namespace: Option<&str>,
    ) -> Result<Schema> {
        let collections = connection
            .execute(&stmt::show_collection(namespace).into(), None)
            .await?
            .into_collections()?;

        let mut schema = Schema::new(namespace);

        for collection in collections {
            let (columns, indexes) = connection
                .execute(&stmt::describe_collection(&collection).into(), None)
                .await?
                .into_description()?;

            schema.collections.push(CollectionSchema::from_definition(
                collection.name,
                &columns,
                &indexes,
            ));
        }

        Ok(schema)
    }
}
