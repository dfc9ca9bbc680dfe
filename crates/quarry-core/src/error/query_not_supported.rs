use super::Error;

/// Error when a backend cannot execute a query it was handed.
///
/// Joins on a backend without join support, aggregates on the memory
/// backend and in-place column rewrites on SQLite all end up here.
#[derive(Debug)]
pub(super) struct QueryNotSupported {
    message: Box<str>,
}

impl std::error::Error for QueryNotSupported {}

impl core::fmt::Display for QueryNotSupported {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "query not supported: {}", self.message)
    }
}

impl Error {
    /// Creates a query not supported error.
    pub fn query_not_supported(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::QueryNotSupported(QueryNotSupported {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a query not supported error.
    pub fn is_query_not_supported(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::QueryNotSupported(_))
    }
}
