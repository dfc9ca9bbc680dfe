use std::fmt;

/// Separates the namespace from the collection name in the physical
/// identifier.
pub const SEPARATOR: char = '_';

/// A named collection, optionally scoped by a namespace.
///
/// The backend identifier is `<namespace>_<name>`, or just `<name>` when no
/// namespace is set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Collection {
    pub name: String,
    pub namespace: Option<String>,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }

    pub fn namespaced(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
        }
    }

    /// Builds a collection in `namespace`, or an unscoped one when `None`.
    pub fn in_namespace(name: impl Into<String>, namespace: Option<&str>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.map(str::to_string),
        }
    }

    /// The identifier the backend knows this collection by.
    pub fn ident(&self) -> String {
        self.to_string()
    }

    /// Recovers a collection from a backend identifier, relative to the
    /// namespace the caller is working in.
    ///
    /// Returns `None` when `namespace` is set and the identifier does not
    /// belong to it.
    pub fn from_ident(ident: &str, namespace: Option<&str>) -> Option<Collection> {
        match namespace {
            Some(namespace) => {
                let name = ident
                    .strip_prefix(namespace)?
                    .strip_prefix(SEPARATOR)
                    .filter(|name| !name.is_empty())?;
                Some(Collection::namespaced(name, namespace))
            }
            None => Some(Collection::new(ident)),
        }
    }

    /// Same namespace, different name.
    pub fn with_name(&self, name: impl Into<String>) -> Collection {
        Collection {
            name: name.into(),
            namespace: self.namespace.clone(),
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{namespace}{SEPARATOR}{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl From<&str> for Collection {
    fn from(value: &str) -> Self {
        Collection::new(value)
    }
}

impl From<String> for Collection {
    fn from(value: String) -> Self {
        Collection::new(value)
    }
}

/// `(name, namespace)`
impl From<(&str, &str)> for Collection {
    fn from((name, namespace): (&str, &str)) -> Self {
        Collection::namespaced(name, namespace)
    }
}

impl From<&Collection> for Collection {
    fn from(value: &Collection) -> Self {
        value.clone()
    }
}
