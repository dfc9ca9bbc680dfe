use std::collections::BTreeMap;

/// Tells the differ which collections and fields were renamed, so they are
/// altered in place instead of dropped and re-created.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenameHints {
    /// Old collection handle to new handle.
    collections: BTreeMap<String, String>,

    /// (new collection handle, new field handle) to old field handle.
    fields: BTreeMap<(String, String), String>,
}

impl RenameHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_collection_hint(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.collections.insert(from.into(), to.into());
    }

    /// Records that `from` was renamed to `to` within the collection whose
    /// new handle is `collection`.
    pub fn add_field_hint(
        &mut self,
        collection: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) {
        self.fields
            .insert((collection.into(), to.into()), from.into());
    }

    pub fn get_collection(&self, from: &str) -> Option<&str> {
        self.collections.get(from).map(String::as_str)
    }

    /// The old handle of a collection now called `to`.
    pub fn collection_renamed_from(&self, to: &str) -> Option<&str> {
        self.collections
            .iter()
            .find(|(_, new)| *new == to)
            .map(|(old, _)| old.as_str())
    }

    /// The old handle of the field now called `to` in `collection`.
    pub fn field_renamed_from(&self, collection: &str, to: &str) -> Option<&str> {
        self.fields
            .get(&(collection.to_string(), to.to_string()))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty() && self.fields.is_empty()
    }
}
