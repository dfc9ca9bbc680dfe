use super::Error;

/// Error when a query references a variable that was not supplied.
#[derive(Debug)]
pub(super) struct MissingVariable {
    name: Box<str>,
}

impl std::error::Error for MissingVariable {}

impl core::fmt::Display for MissingVariable {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "missing query variable `{}`", self.name)
    }
}

impl Error {
    /// Creates a missing variable error for the variable `name`.
    pub fn missing_variable(name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MissingVariable(MissingVariable {
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is a missing variable error.
    pub fn is_missing_variable(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MissingVariable(_))
    }
}
