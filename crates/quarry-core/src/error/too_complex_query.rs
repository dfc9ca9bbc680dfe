use super::Error;

/// Error when a condition cannot be rewritten into OR-free branches.
#[derive(Debug)]
pub(super) struct TooComplexQuery {
    message: Box<str>,
}

impl std::error::Error for TooComplexQuery {}

impl core::fmt::Display for TooComplexQuery {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "query too complex: {}", self.message)
    }
}

impl Error {
    /// Creates a too complex query error.
    pub fn too_complex_query(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::TooComplexQuery(TooComplexQuery {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a too complex query error.
    pub fn is_too_complex_query(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TooComplexQuery(_))
    }
}
