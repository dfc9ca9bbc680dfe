use super::Value;
use crate::{Error, Result};
use std::collections::HashMap;

/// Values supplied for the variables a query references, keyed by name.
pub type Variables = HashMap<String, Value>;

/// A named placeholder whose value is supplied at compile or execute time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    pub name: String,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Looks the variable up, failing with a missing variable error when it
    /// was not supplied.
    pub fn resolve<'a>(&self, variables: Option<&'a Variables>) -> Result<&'a Value> {
        variables
            .and_then(|variables| variables.get(&self.name))
            .ok_or_else(|| Error::missing_variable(&self.name))
    }
}
